use crate::dataset::Dataset;
use crate::types::ComparisonStats;
use crate::utils::round_one_decimal;

/// Computes before/after statistics for a cleaning run.
pub struct Comparator;

impl Comparator {
    /// Compare the original dataset with its cleaned counterpart.
    ///
    /// The cleaned column count comes from the cleaned schema, so it is
    /// correct even when `dropped_columns` is not the full difference.
    pub fn compare(original: &Dataset, cleaned: &Dataset, dropped_columns: &[String]) -> ComparisonStats {
        ComparisonStats {
            row_count_before: original.len(),
            row_count_after: cleaned.len(),
            column_count_before: original.column_count(),
            column_count_after: cleaned.column_count(),
            missing_count_before: original.missing_count(),
            missing_count_after: cleaned.missing_count(),
            completeness_before: Self::completeness(original),
            completeness_after: Self::completeness(cleaned),
            dropped_columns: dropped_columns.to_vec(),
        }
    }

    /// Percentage of non-missing cells, rounded to one decimal.
    ///
    /// A dataset with no cells (zero rows or zero columns) is reported as
    /// 100.0: nothing in it is missing.
    pub fn completeness(dataset: &Dataset) -> f64 {
        let cells = dataset.len() * dataset.column_count();
        if cells == 0 {
            return 100.0;
        }
        let missing = dataset.missing_count() as f64;
        round_one_decimal((1.0 - missing / cells as f64) * 100.0)
    }
}
