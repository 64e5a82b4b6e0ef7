//! Statistical imputation methods.
//!
//! Numeric columns are filled with the lower median, categorical columns
//! with the mode. Which columns belong to which class is decided by the
//! caller, never by looking at the values.

use crate::dataset::{CellKey, CellValue, Dataset};
use crate::utils::parse_numeric_string;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Statistic used to fill a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationMethod {
    Median,
    Mode,
}

impl ImputationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Median => "median",
            Self::Mode => "mode",
        }
    }
}

/// What the imputer did with one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImputationOutcome {
    /// Every missing cell was replaced with `value`.
    Filled { value: CellValue, count: usize },
    /// No observed value to compute a statistic from; cells left missing.
    Skipped { missing: usize },
}

/// Per-column imputation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputationRecord {
    pub column: String,
    pub method: ImputationMethod,
    pub outcome: ImputationOutcome,
    /// Text cells found in a numeric column; left unchanged and ignored by the median.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub non_numeric: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl ImputationRecord {
    /// Number of cells filled.
    pub fn filled(&self) -> usize {
        match &self.outcome {
            ImputationOutcome::Filled { count, .. } => *count,
            ImputationOutcome::Skipped { .. } => 0,
        }
    }

    pub fn fill_value(&self) -> Option<&CellValue> {
        match &self.outcome {
            ImputationOutcome::Filled { value, .. } => Some(value),
            ImputationOutcome::Skipped { .. } => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, ImputationOutcome::Skipped { .. })
    }

    /// Human-readable processing step.
    pub fn step(&self) -> String {
        match (&self.outcome, self.method) {
            (ImputationOutcome::Filled { value, .. }, ImputationMethod::Median) => {
                let median = value.as_number().unwrap_or(f64::NAN);
                format!("Filled '{}' with median: {:.2}", self.column, median)
            }
            (ImputationOutcome::Filled { value, .. }, ImputationMethod::Mode) => {
                format!("Filled '{}' with mode: '{}'", self.column, value)
            }
            (ImputationOutcome::Skipped { missing }, method) => format!(
                "Skipped '{}': {} for {} ({} missing left)",
                self.column,
                self.skip_reason(),
                method.as_str(),
                missing
            ),
        }
    }

    /// Why a skipped column could not be filled.
    pub fn skip_reason(&self) -> &'static str {
        if self.non_numeric > 0 {
            "no numeric values"
        } else {
            "no observed values"
        }
    }
}

/// Lower median: sort ascending and take index `floor(n / 2)`.
///
/// For even `n` this is the upper of the two middle values
/// (`[1, 2, 3, 4]` gives `3`). Returns `None` for an empty slice.
pub fn lower_median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(sorted[sorted.len() / 2])
}

/// Most frequent non-missing value; ties go to the value seen first.
///
/// The returned cell keeps its original variant.
pub fn mode(values: &[CellValue]) -> Option<CellValue> {
    let mut counts: IndexMap<CellKey<'_>, (usize, &CellValue)> = IndexMap::new();
    for value in values.iter().filter(|v| !v.is_missing()) {
        counts.entry(CellKey::from(value)).or_insert((0, value)).0 += 1;
    }

    let mut best: Option<(usize, &CellValue)> = None;
    for (count, value) in counts.into_values() {
        if best.is_none_or(|(top, _)| count > top) {
            best = Some((count, value));
        }
    }
    best.map(|(_, value)| value.clone())
}

/// Median/mode imputation for declared numeric and categorical columns.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill missing cells in place.
    ///
    /// Columns named in neither list are untouched. Names that are not in
    /// the dataset schema are ignored. Returns one record per imputed
    /// column, numeric columns first, each group in the order given.
    pub fn impute(
        dataset: &mut Dataset,
        numeric: &[String],
        categorical: &[String],
    ) -> Vec<ImputationRecord> {
        let mut records = Vec::with_capacity(numeric.len() + categorical.len());

        for column in numeric {
            if !dataset.has_column(column) {
                continue;
            }
            records.push(Self::apply_numeric_median(dataset, column));
        }
        for column in categorical {
            if !dataset.has_column(column) {
                continue;
            }
            records.push(Self::apply_mode_imputation(dataset, column));
        }

        records
    }

    /// Fill one numeric column with its lower median.
    ///
    /// Text cells that parse as numbers (a column read as strings because of
    /// one stray label) count as observed values. Other text is left
    /// unchanged and reported in `non_numeric`.
    pub fn apply_numeric_median(dataset: &mut Dataset, column: &str) -> ImputationRecord {
        let mut observed = Vec::new();
        let mut non_numeric = 0;
        for value in dataset.column_values(column) {
            match value {
                CellValue::Number(n) => observed.push(*n),
                CellValue::Text(text) => match parse_numeric_string(text) {
                    Some(n) => observed.push(n),
                    None => non_numeric += 1,
                },
                CellValue::Missing => {}
            }
        }

        if non_numeric > 0 {
            warn!(
                "Numeric column '{}' holds {} non-numeric values; they were left unchanged",
                column, non_numeric
            );
        }

        let fill = lower_median(&observed).map(CellValue::Number);
        let mut record = Self::fill_with_value(dataset, column, fill, ImputationMethod::Median);
        record.non_numeric = non_numeric;
        record
    }

    /// Fill one categorical column with its mode.
    pub fn apply_mode_imputation(dataset: &mut Dataset, column: &str) -> ImputationRecord {
        let values: Vec<CellValue> = dataset.column_values(column).cloned().collect();
        let fill = mode(&values);
        Self::fill_with_value(dataset, column, fill, ImputationMethod::Mode)
    }

    fn fill_with_value(
        dataset: &mut Dataset,
        column: &str,
        fill: Option<CellValue>,
        method: ImputationMethod,
    ) -> ImputationRecord {
        let Some(value) = fill else {
            let missing = dataset.missing_in_column(column);
            if missing == dataset.len() {
                warn!(
                    "Column '{}' has no observed values; {} imputation skipped",
                    column,
                    method.as_str()
                );
            } else {
                warn!(
                    "Column '{}' has no numeric values; {} imputation skipped",
                    column,
                    method.as_str()
                );
            }
            return ImputationRecord {
                column: column.to_string(),
                method,
                outcome: ImputationOutcome::Skipped { missing },
                non_numeric: 0,
            };
        };

        let mut count = 0;
        for row in dataset.rows_mut() {
            if let Some(cell) = row.get_mut(column)
                && cell.is_missing()
            {
                *cell = value.clone();
                count += 1;
            }
        }

        debug!(
            "Filled {} missing values in '{}' with {}: {}",
            count,
            column,
            method.as_str(),
            value
        );

        ImputationRecord {
            column: column.to_string(),
            method,
            outcome: ImputationOutcome::Filled { value, count },
            non_numeric: 0,
        }
    }
}
