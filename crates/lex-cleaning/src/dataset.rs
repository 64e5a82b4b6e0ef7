//! Row-oriented dataset model.
//!
//! A [`Dataset`] is an ordered list of [`Row`]s. Each row maps column names
//! to a tagged [`CellValue`]; column insertion order is part of the row and
//! drives display and CSV order. The column schema is the first row's keys.

use crate::error::{CleaningError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell of a dataset.
///
/// `Missing` is the missing-marker. It is distinct from `Text("")`,
/// `Number(0.0)` and every other valid value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Numeric observation.
    Number(f64),
    /// Free text or categorical label.
    Text(String),
    /// Absent observation (serialized as `null`).
    #[default]
    Missing,
}

impl CellValue {
    /// Whether this cell holds the missing-marker.
    #[inline]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Numeric payload, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Text payload, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Render the cell as a CSV field: missing cells become an empty field.
    pub fn to_field(&self) -> String {
        match self {
            Self::Missing => String::new(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{}", value),
            Self::Text(value) => f.write_str(value),
            Self::Missing => f.write_str("NULL"),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

/// Hashable view of a cell, used for structural equality.
///
/// Numbers are keyed by their bit pattern with `-0.0` folded into `0.0`
/// and every NaN folded into one canonical NaN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum CellKey<'a> {
    Number(u64),
    Text(&'a str),
    Missing,
}

impl<'a> From<&'a CellValue> for CellKey<'a> {
    fn from(cell: &'a CellValue) -> Self {
        match cell {
            CellValue::Number(value) => {
                let normalized = if *value == 0.0 {
                    0.0
                } else if value.is_nan() {
                    f64::NAN
                } else {
                    *value
                };
                CellKey::Number(normalized.to_bits())
            }
            CellValue::Text(text) => CellKey::Text(text.as_str()),
            CellValue::Missing => CellKey::Missing,
        }
    }
}

/// Mapping from column name to cell, in column order.
pub type Row = IndexMap<String, CellValue>;

/// Ordered sequence of rows sharing one column schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    rows: Vec<Row>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap already-built rows.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Build a dataset from a header and positional records.
    ///
    /// Fails with [`CleaningError::SchemaMismatch`] if a record's length
    /// differs from the header's.
    pub fn from_records<S: AsRef<str>>(
        columns: &[S],
        records: Vec<Vec<CellValue>>,
    ) -> Result<Self> {
        let header: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
        let mut rows = Vec::with_capacity(records.len());

        for (index, record) in records.into_iter().enumerate() {
            if record.len() != header.len() {
                return Err(CleaningError::SchemaMismatch {
                    row: index,
                    expected: header.clone(),
                    found: header.iter().take(record.len()).cloned().collect(),
                });
            }
            rows.push(header.iter().cloned().zip(record).collect());
        }

        Ok(Self { rows })
    }

    /// Append a row.
    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Column schema, taken from the first row.
    ///
    /// An empty dataset has no schema and returns an empty list.
    pub fn columns(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of columns in the schema.
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, |row| row.len())
    }

    /// Whether the schema contains `column`.
    pub fn has_column(&self, column: &str) -> bool {
        self.rows
            .first()
            .is_some_and(|row| row.contains_key(column))
    }

    /// Iterate over the cells of one column; rows lacking it yield `Missing`.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a CellValue> + 'a {
        self.rows
            .iter()
            .map(move |row| row.get(column).unwrap_or(&CellValue::Missing))
    }

    /// Count missing cells in one column.
    pub fn missing_in_column(&self, column: &str) -> usize {
        self.column_values(column).filter(|v| v.is_missing()).count()
    }

    /// Count missing cells across the whole dataset.
    pub fn missing_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.values())
            .filter(|v| v.is_missing())
            .count()
    }

    /// Check that every row has the same column set as the first row.
    pub fn validate_schema(&self) -> Result<()> {
        let Some(first) = self.rows.first() else {
            return Ok(());
        };

        for (index, row) in self.rows.iter().enumerate().skip(1) {
            let same = row.len() == first.len() && first.keys().all(|k| row.contains_key(k));
            if !same {
                return Err(CleaningError::SchemaMismatch {
                    row: index,
                    expected: first.keys().cloned().collect(),
                    found: row.keys().cloned().collect(),
                });
            }
        }

        Ok(())
    }

    /// Remove the given columns from every row, preserving the order of the rest.
    pub fn drop_columns(&mut self, columns: &[String]) {
        if columns.is_empty() {
            return;
        }
        for row in &mut self.rows {
            for column in columns {
                row.shift_remove(column);
            }
        }
    }
}

impl From<Vec<Row>> for Dataset {
    fn from(rows: Vec<Row>) -> Self {
        Self::from_rows(rows)
    }
}
