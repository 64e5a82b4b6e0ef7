use crate::dataset::{CellKey, Dataset, Row};
use std::collections::HashSet;
use tracing::debug;

/// Result of a deduplication pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DedupOutcome {
    pub dataset: Dataset,
    /// Number of rows removed.
    pub removed: usize,
}

fn row_key<'a>(row: &'a Row, columns: &[String]) -> Vec<CellKey<'a>> {
    columns
        .iter()
        .map(|c| row.get(c).map_or(CellKey::Missing, CellKey::from))
        .collect()
}

/// Removes rows that are structurally equal to an earlier row.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deduplicator;

impl Deduplicator {
    /// Keep the first occurrence of each distinct row, preserving order.
    pub fn deduplicate(dataset: Dataset) -> DedupOutcome {
        let keep = Self::first_occurrences(&dataset);
        let before = keep.len();

        let rows: Vec<Row> = dataset
            .into_rows()
            .into_iter()
            .zip(keep)
            .filter_map(|(row, keep)| keep.then_some(row))
            .collect();

        let removed = before - rows.len();
        debug!("Removed {} duplicate rows out of {}", removed, before);

        DedupOutcome {
            dataset: Dataset::from_rows(rows),
            removed,
        }
    }

    /// Number of rows that [`deduplicate`](Self::deduplicate) would remove.
    pub fn count_duplicates(dataset: &Dataset) -> usize {
        Self::first_occurrences(dataset)
            .into_iter()
            .filter(|keep| !keep)
            .count()
    }

    fn first_occurrences(dataset: &Dataset) -> Vec<bool> {
        let columns = dataset.columns();
        let mut seen = HashSet::with_capacity(dataset.len());
        dataset
            .rows()
            .iter()
            .map(|row| seen.insert(row_key(row, &columns)))
            .collect()
    }
}
