//! Main cleaning pipeline module.
//!
//! This module provides the `Pipeline` struct, its builder, and the
//! [`clean`] convenience function.

use crate::cleaner::{ColumnPruner, Deduplicator};
use crate::config::{CleaningConfig, ConfigValidationError};
use crate::dataset::Dataset;
use crate::error::{CleaningError, Result, ResultExt};
use crate::imputers::{ImputationOutcome, ImputationRecord, StatisticalImputer};
use crate::pipeline::progress::{
    ClosureProgressReporter, CleaningStage, ProgressReporter, ProgressUpdate,
};
use crate::quality::MissingValueAnalyzer;
use crate::reporting::Comparator;
use crate::types::{
    ActionType, CleaningAction, CleaningResult, ColumnRole, ColumnSummary, MissingStatistics,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Clean a dataset with the given threshold and column vocabularies.
///
/// Runs pruning, imputation, deduplication and comparison in that order on
/// a copy of `dataset`; the input is never modified. Fails with
/// [`CleaningError::EmptyDataset`] on zero rows and
/// [`CleaningError::SchemaMismatch`] when rows disagree on their columns.
pub fn clean(
    dataset: &Dataset,
    threshold: f64,
    numeric_columns: &[String],
    categorical_columns: &[String],
) -> Result<CleaningResult> {
    let config = CleaningConfig::builder()
        .missing_column_threshold(threshold)
        .numeric_columns(numeric_columns.iter().cloned())
        .categorical_columns(categorical_columns.iter().cloned())
        .build()?;

    Pipeline::builder().config(config).build()?.process(dataset)
}

/// The cleaning pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use lex_cleaning::{CleaningConfig, Pipeline};
///
/// let result = Pipeline::builder()
///     .config(CleaningConfig::builder().missing_column_threshold(0.4).build()?)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .process(&dataset)?;
/// ```
pub struct Pipeline {
    config: CleaningConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    pruner: ColumnPruner,
}

// Independent requests may run on worker threads sharing one pipeline.
static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Run the pipeline on a copy of `dataset`.
    pub fn process(&self, dataset: &Dataset) -> Result<CleaningResult> {
        match self.process_internal(dataset) {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete("Cleaning completed successfully"));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn process_internal(&self, dataset: &Dataset) -> Result<CleaningResult> {
        info!("Starting cleaning pipeline...");
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Initializing,
            0.0,
            "Validating dataset...",
        ));

        if dataset.is_empty() {
            return Err(CleaningError::EmptyDataset);
        }
        dataset.validate_schema()?;
        let working = dataset.clone();

        let mut actions = Vec::new();
        let mut warnings = Vec::new();

        // Step 1: Missing-value analysis
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Analyzing,
            0.0,
            "Analyzing missing values...",
        ));
        info!("Step 1: Analyzing missing values...");
        let missing_before =
            MissingValueAnalyzer::analyze(dataset).context("Analyzing missing values")?;
        debug!(
            "{} missing values across {} columns",
            missing_before.total_missing(),
            missing_before.len()
        );

        // Step 2: Column pruning
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Pruning,
            0.0,
            "Pruning columns...",
        ));
        info!(
            "Step 2: Dropping columns with more than {:.0}% missing...",
            self.pruner.threshold() * 100.0
        );
        let pruned = self.pruner.prune(working);
        let dropped_columns = pruned.dropped_columns;
        let mut working = pruned.dataset;

        for column in &dropped_columns {
            let pct = missing_before.get(column).map_or(0.0, |m| m.percentage);
            actions.push(
                CleaningAction::new(
                    ActionType::ColumnRemoved,
                    column,
                    format!("Dropped column with {:.1}% missing values", pct),
                )
                .with_details(format!(
                    "threshold: {:.1}%",
                    self.pruner.threshold() * 100.0
                )),
            );
        }
        if !dropped_columns.is_empty() {
            info!("Dropped {} column(s): {:?}", dropped_columns.len(), dropped_columns);
        }

        // Step 3: Imputation
        info!("Step 3: Imputing missing values...");
        let surviving = working.columns();
        let imputable: Vec<(&String, ColumnRole)> = surviving
            .iter()
            .map(|c| (c, self.role_of(c)))
            .filter(|(_, role)| *role != ColumnRole::PassThrough)
            .collect();

        let mut records: HashMap<String, ImputationRecord> = HashMap::new();
        for (index, (column, role)) in imputable.iter().enumerate() {
            let record = match role {
                ColumnRole::Numeric => {
                    StatisticalImputer::apply_numeric_median(&mut working, column)
                }
                _ => StatisticalImputer::apply_mode_imputation(&mut working, column),
            };
            debug!("{}", record.step());

            self.report_progress(ProgressUpdate::with_items(
                CleaningStage::Imputation,
                format!("Column: {}", column),
                index + 1,
                imputable.len(),
                format!("Imputed column {}", column),
            ));

            Self::record_imputation(&record, &mut actions, &mut warnings);
            records.insert(record.column.clone(), record);
        }

        for column in surviving
            .iter()
            .filter(|c| self.role_of(c) == ColumnRole::PassThrough)
        {
            let missing = working.missing_in_column(column);
            if missing > 0 {
                warn!(
                    "Column '{}' is not declared numeric or categorical; {} missing values left as is",
                    column, missing
                );
                warnings.push(format!(
                    "Column '{}' is not declared numeric or categorical; {} missing values left as is",
                    column, missing
                ));
            }
        }

        // Step 4: Deduplication
        let cleaned = if self.config.remove_duplicates {
            self.report_progress(ProgressUpdate::new(
                CleaningStage::Deduplication,
                0.0,
                "Removing duplicate rows...",
            ));
            info!("Step 4: Removing duplicate rows...");
            let outcome = Deduplicator::deduplicate(working);
            if outcome.removed > 0 {
                actions.push(CleaningAction::new(
                    ActionType::DuplicatesRemoved,
                    "dataset",
                    format!("Removed {} duplicate rows", outcome.removed),
                ));
            }
            outcome.dataset
        } else {
            info!("Step 4: Skipping duplicate removal (disabled)");
            working
        };

        // Step 5: Comparison
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Comparison,
            0.0,
            "Comparing before and after...",
        ));
        info!("Step 5: Comparing before and after...");
        let stats = Comparator::compare(dataset, &cleaned, &dropped_columns);
        let missing_after = if cleaned.is_empty() {
            MissingStatistics::new()
        } else {
            MissingValueAnalyzer::analyze(&cleaned).context("Analyzing cleaned dataset")?
        };

        let column_summaries =
            self.build_column_summaries(dataset, &missing_before, &missing_after, &dropped_columns, &records);

        info!(
            "Cleaning complete: {}x{} -> {}x{}, completeness {:.1}% -> {:.1}%",
            stats.row_count_before,
            stats.column_count_before,
            stats.row_count_after,
            stats.column_count_after,
            stats.completeness_before,
            stats.completeness_after
        );

        Ok(CleaningResult {
            cleaned,
            stats,
            dropped_columns,
            missing_before,
            missing_after,
            actions,
            column_summaries,
            warnings,
        })
    }

    /// Role of a column by vocabulary membership.
    fn role_of(&self, column: &str) -> ColumnRole {
        if self.config.numeric_columns.iter().any(|c| c == column) {
            ColumnRole::Numeric
        } else if self.config.categorical_columns.iter().any(|c| c == column) {
            ColumnRole::Categorical
        } else {
            ColumnRole::PassThrough
        }
    }

    fn record_imputation(
        record: &ImputationRecord,
        actions: &mut Vec<CleaningAction>,
        warnings: &mut Vec<String>,
    ) {
        match &record.outcome {
            ImputationOutcome::Filled { value, count } if *count > 0 => {
                actions.push(
                    CleaningAction::new(
                        ActionType::ValueImputed,
                        &record.column,
                        format!("Imputed {} missing values", count),
                    )
                    .with_details(format!("{}: {}", record.method.as_str(), value)),
                );
            }
            ImputationOutcome::Filled { .. } => {}
            ImputationOutcome::Skipped { missing } => {
                actions.push(CleaningAction::new(
                    ActionType::ImputationSkipped,
                    &record.column,
                    format!(
                        "Imputation skipped, {}; {} missing values left as is",
                        record.skip_reason(),
                        missing
                    ),
                ));
                warnings.push(format!(
                    "Column '{}' has {}; {} imputation skipped",
                    record.column,
                    record.skip_reason(),
                    record.method.as_str()
                ));
            }
        }

        if record.non_numeric > 0 {
            warnings.push(format!(
                "Numeric column '{}' holds {} non-numeric values; they were left unchanged",
                record.column, record.non_numeric
            ));
        }
    }

    fn build_column_summaries(
        &self,
        original: &Dataset,
        missing_before: &MissingStatistics,
        missing_after: &MissingStatistics,
        dropped_columns: &[String],
        records: &HashMap<String, ImputationRecord>,
    ) -> Vec<ColumnSummary> {
        original
            .columns()
            .into_iter()
            .map(|column| {
                let mut summary = ColumnSummary::new(&column, self.role_of(&column));
                summary.missing_before = missing_before.get(&column).map_or(0, |m| m.count);

                if dropped_columns.contains(&column) {
                    return summary.mark_removed(format!(
                        "Missing ratio above {:.1}%",
                        self.pruner.threshold() * 100.0
                    ));
                }

                summary.missing_after = missing_after.get(&column).map_or(0, |m| m.count);
                if let Some(record) = records.get(&column) {
                    summary.imputation_method = Some(record.method.as_str().to_string());
                    summary.fill_value = record.fill_value().map(|v| v.to_string());
                }
                summary
            })
            .collect()
    }
}

/// Builder for creating a [`Pipeline`] instance.
///
/// Use [`Pipeline::builder()`] to get started.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<CleaningConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: CleaningConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// This is a convenience method for simple progress handling.
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let pruner = ColumnPruner::new(config.missing_column_threshold);

        Ok(Pipeline {
            config,
            progress_reporter: self.progress_reporter,
            pruner,
        })
    }
}
