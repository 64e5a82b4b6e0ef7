use crate::dataset::Dataset;
use crate::error::{CleaningError, Result};
use crate::types::{ColumnMissing, MissingSeverity, MissingStatistics};
use crate::utils::{percentage, round_one_decimal};
use tracing::debug;

/// Per-column missing-value counts and percentages.
pub struct MissingValueAnalyzer;

impl MissingValueAnalyzer {
    /// Count missing cells per schema column.
    ///
    /// Percentages are `count / rows * 100` rounded to one decimal.
    /// Fails with [`CleaningError::EmptyDataset`] when there are no rows.
    pub fn analyze(dataset: &Dataset) -> Result<MissingStatistics> {
        if dataset.is_empty() {
            return Err(CleaningError::EmptyDataset);
        }

        let rows = dataset.len();
        let mut stats = MissingStatistics::new();

        for column in dataset.columns() {
            let count = dataset.missing_in_column(&column);
            let pct = round_one_decimal(percentage(count, rows).unwrap_or(0.0));
            let severity = MissingSeverity::from_percentage(pct);

            debug!(
                "Column '{}': {} missing ({:.1}%, {})",
                column,
                count,
                pct,
                severity.display_name()
            );

            stats.insert(
                column,
                ColumnMissing {
                    count,
                    percentage: pct,
                    severity,
                },
            );
        }

        Ok(stats)
    }

    /// Total missing cells across the dataset; zero for an empty dataset.
    pub fn total_missing(dataset: &Dataset) -> usize {
        dataset.missing_count()
    }

    /// Schema columns holding at least one missing cell, in schema order.
    pub fn columns_with_missing(dataset: &Dataset) -> Vec<String> {
        dataset
            .columns()
            .into_iter()
            .filter(|c| dataset.missing_in_column(c) > 0)
            .collect()
    }
}
