use crate::dataset::Dataset;
use crate::error::{Result, ResultExt};
use crate::types::{CleaningAction, CleaningResult, ColumnSummary, ComparisonStats, MissingStatistics};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Default file name (without extension) for the cleaned dataset.
pub const DEFAULT_OUTPUT_NAME: &str = "cleaned_dataset";

// ============================================================================
// Report Types
// ============================================================================

/// Full report of one cleaning run.
///
/// Used both for JSON output (`--json`) and file writing (`--emit-report`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file, or a description of a generated dataset
    pub input_file: String,
    /// Path to the output file (if written)
    pub output_file: Option<String>,

    /// Before/after statistics
    pub comparison: ComparisonStats,
    pub summary: ReportSummary,

    /// Missing values per column in the input
    pub missing_before: MissingStatistics,
    /// Missing values per column in the cleaned dataset
    pub missing_after: MissingStatistics,

    pub actions: Vec<CleaningAction>,
    pub column_summaries: Vec<ColumnSummary>,
    pub warnings: Vec<String>,

    pub validation: ValidationSummary,
}

/// Derived before/after figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub rows_removed: usize,
    pub columns_removed: usize,
    pub values_filled: usize,
    /// Completeness gain in percentage points
    pub completeness_improvement: f64,
}

/// State of the cleaned dataset after the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// True when no missing cell remains
    pub fully_imputed: bool,
    pub remaining_missing: usize,
    /// Columns still holding missing cells (pass-through or skipped columns)
    pub columns_with_missing: Vec<String>,
}

// ============================================================================
// Generator
// ============================================================================

/// Writes cleaned datasets and JSON reports to an output directory.
pub struct ReportGenerator {
    output_dir: PathBuf,
    output_name: Option<String>,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./outputs"),
            output_name: None,
        }
    }
}

impl ReportGenerator {
    /// Create a new ReportGenerator with custom output settings.
    pub fn new(output_dir: PathBuf, output_name: Option<String>) -> Self {
        Self {
            output_dir,
            output_name,
        }
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    /// Path the cleaned dataset is written to.
    pub fn dataset_path(&self) -> PathBuf {
        let name = self.output_name.as_deref().unwrap_or(DEFAULT_OUTPUT_NAME);
        self.output_dir.join(format!("{}.csv", name))
    }

    /// Build the report for one cleaning run.
    pub fn build_report(
        input_file: &str,
        output_file: Option<&str>,
        result: &CleaningResult,
    ) -> CleaningReport {
        let stats = &result.stats;

        let summary = ReportSummary {
            rows_removed: stats.rows_removed(),
            columns_removed: stats.columns_removed(),
            values_filled: stats.values_filled(),
            completeness_improvement: stats.completeness_improvement(),
        };

        let validation = ValidationSummary {
            fully_imputed: result.fully_imputed(),
            remaining_missing: stats.missing_count_after,
            columns_with_missing: result
                .missing_after
                .columns_with_missing()
                .into_iter()
                .map(String::from)
                .collect(),
        };

        CleaningReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            output_file: output_file.map(String::from),
            comparison: stats.clone(),
            summary,
            missing_before: result.missing_before.clone(),
            missing_after: result.missing_after.clone(),
            actions: result.actions.clone(),
            column_summaries: result.column_summaries.clone(),
            warnings: result.warnings.clone(),
            validation,
        }
    }

    /// Write the cleaned dataset as CSV and return its path.
    pub fn write_dataset(&self, dataset: &Dataset) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .context(format!("Creating {}", self.output_dir.display()))?;

        let output_path = self.dataset_path();
        crate::io::write_csv(dataset, &output_path)?;

        info!("Dataset saved: {}", output_path.display());
        Ok(output_path)
    }

    /// Write a report to `<output_dir>/<report_base_name>_report.json`.
    pub fn write_report_to_file(
        &self,
        report: &CleaningReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .context(format!("Creating {}", self.output_dir.display()))?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}
