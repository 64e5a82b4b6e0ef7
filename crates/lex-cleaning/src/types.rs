use crate::dataset::Dataset;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ============================================================================
// Missing-value statistics
// ============================================================================

/// Severity band of a column's missing percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingSeverity {
    /// 20% or less.
    Low,
    /// Above 20%, up to 50%.
    Moderate,
    /// Above 50%.
    High,
}

impl MissingSeverity {
    /// Classify a percentage in `[0, 100]`.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage > 50.0 {
            Self::High
        } else if percentage > 20.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

/// Missing-value count for one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissing {
    /// Rows whose cell is missing.
    pub count: usize,
    /// `count / rows * 100`, rounded to one decimal.
    pub percentage: f64,
    pub severity: MissingSeverity,
}

/// Per-column missing counts, in schema order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissingStatistics {
    columns: IndexMap<String, ColumnMissing>,
}

impl MissingStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, missing: ColumnMissing) {
        self.columns.insert(column.into(), missing);
    }

    pub fn get(&self, column: &str) -> Option<&ColumnMissing> {
        self.columns.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ColumnMissing)> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Sum of missing cells over all columns.
    pub fn total_missing(&self) -> usize {
        self.columns.values().map(|m| m.count).sum()
    }

    /// Names of columns holding at least one missing cell.
    pub fn columns_with_missing(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|(_, m)| m.count > 0)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

// ============================================================================
// Before/after comparison
// ============================================================================

/// Before/after statistics of one cleaning run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComparisonStats {
    pub row_count_before: usize,
    pub row_count_after: usize,
    pub column_count_before: usize,
    pub column_count_after: usize,
    pub missing_count_before: usize,
    pub missing_count_after: usize,
    /// Percentage of non-missing cells in the original (0 - 100).
    pub completeness_before: f64,
    /// Percentage of non-missing cells in the cleaned dataset (0 - 100).
    pub completeness_after: f64,
    pub dropped_columns: Vec<String>,
}

impl ComparisonStats {
    /// Rows removed by deduplication.
    pub fn rows_removed(&self) -> usize {
        self.row_count_before.saturating_sub(self.row_count_after)
    }

    pub fn columns_removed(&self) -> usize {
        self.column_count_before.saturating_sub(self.column_count_after)
    }

    /// Net decrease in missing cells (includes cells that vanished with dropped columns).
    pub fn values_filled(&self) -> usize {
        self.missing_count_before
            .saturating_sub(self.missing_count_after)
    }

    /// Completeness gain in percentage points.
    pub fn completeness_improvement(&self) -> f64 {
        self.completeness_after - self.completeness_before
    }
}

// ============================================================================
// Audit trail
// ============================================================================

/// One action taken during cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningAction {
    pub action_type: ActionType,
    /// Column name, or "dataset".
    pub target: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl CleaningAction {
    pub fn new(
        action_type: ActionType,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            action_type,
            target: target.into(),
            description: description.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// A column was dropped for exceeding the missing threshold.
    ColumnRemoved,
    /// Missing cells of a column were filled.
    ValueImputed,
    /// A column had no observed values to impute from.
    ImputationSkipped,
    /// Duplicate rows were removed.
    DuplicatesRemoved,
}

impl ActionType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ColumnRemoved => "Column Removed",
            Self::ValueImputed => "Value Imputed",
            Self::ImputationSkipped => "Imputation Skipped",
            Self::DuplicatesRemoved => "Duplicates Removed",
        }
    }
}

/// How the pipeline treated a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Numeric,
    Categorical,
    /// In neither vocabulary; copied through without imputation.
    PassThrough,
}

/// What happened to one column of the original dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub role: ColumnRole,
    pub missing_before: usize,
    pub missing_after: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imputation_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_value: Option<String>,
    pub was_removed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removal_reason: Option<String>,
}

impl ColumnSummary {
    pub fn new(name: impl Into<String>, role: ColumnRole) -> Self {
        Self {
            name: name.into(),
            role,
            missing_before: 0,
            missing_after: 0,
            imputation_method: None,
            fill_value: None,
            was_removed: false,
            removal_reason: None,
        }
    }

    pub fn mark_removed(mut self, reason: impl Into<String>) -> Self {
        self.was_removed = true;
        self.removal_reason = Some(reason.into());
        self
    }

    /// Share of the column's missing cells that were filled, in percent.
    pub fn imputation_percentage(&self) -> f64 {
        if self.missing_before == 0 {
            0.0
        } else {
            let imputed = self.missing_before.saturating_sub(self.missing_after);
            (imputed as f64 / self.missing_before as f64) * 100.0
        }
    }
}

// ============================================================================
// Pipeline result
// ============================================================================

/// Everything one cleaning run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningResult {
    pub cleaned: Dataset,
    pub stats: ComparisonStats,
    pub dropped_columns: Vec<String>,
    /// Analyzer output for the input dataset.
    pub missing_before: MissingStatistics,
    /// Analyzer output for the cleaned dataset (empty if no rows survive).
    pub missing_after: MissingStatistics,
    pub actions: Vec<CleaningAction>,
    pub column_summaries: Vec<ColumnSummary>,
    pub warnings: Vec<String>,
}

impl CleaningResult {
    /// Whether the cleaned dataset holds no missing cell at all.
    pub fn fully_imputed(&self) -> bool {
        self.stats.missing_count_after == 0
    }
}
