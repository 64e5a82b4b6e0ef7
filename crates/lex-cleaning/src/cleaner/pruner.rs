use crate::dataset::Dataset;
use tracing::debug;

/// Result of a pruning pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PruneOutcome {
    pub dataset: Dataset,
    /// Dropped column names, in schema order.
    pub dropped_columns: Vec<String>,
}

/// Drops columns whose missing ratio is strictly above a threshold.
#[derive(Debug, Clone, Copy)]
pub struct ColumnPruner {
    threshold: f64,
}

impl Default for ColumnPruner {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MISSING_COLUMN_THRESHOLD)
    }
}

impl ColumnPruner {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether `missing` out of `rows` exceeds the threshold.
    #[inline]
    pub fn should_drop(&self, missing: usize, rows: usize) -> bool {
        rows > 0 && (missing as f64 / rows as f64) > self.threshold
    }

    /// Columns that [`prune`](Self::prune) would drop, in schema order.
    ///
    /// Every ratio uses the row count before any column is removed, so one
    /// column's removal never influences another's decision.
    pub fn columns_to_drop(&self, dataset: &Dataset) -> Vec<String> {
        let rows = dataset.len();
        dataset
            .columns()
            .into_iter()
            .filter(|column| {
                let missing = dataset.missing_in_column(column);
                let drop = self.should_drop(missing, rows);
                debug!(
                    "Column '{}': {}/{} missing, drop = {}",
                    column, missing, rows, drop
                );
                drop
            })
            .collect()
    }

    /// Remove every column over the threshold.
    ///
    /// Dropping all columns is allowed: the rows remain, each with an empty schema.
    pub fn prune(&self, mut dataset: Dataset) -> PruneOutcome {
        let dropped_columns = self.columns_to_drop(&dataset);
        dataset.drop_columns(&dropped_columns);

        PruneOutcome {
            dataset,
            dropped_columns,
        }
    }
}
