//! Configuration types for the cleaning pipeline.
//!
//! This module provides [`CleaningConfig`] and a fluent builder that
//! validates on `build()`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Column names imputed with the lower median.
pub const DEFAULT_NUMERIC_COLUMNS: &[&str] = &["age", "salary", "experience", "performance"];

/// Column names imputed with the mode.
pub const DEFAULT_CATEGORICAL_COLUMNS: &[&str] = &["department", "city", "education"];

/// Default missing ratio above which a column is dropped.
pub const DEFAULT_MISSING_COLUMN_THRESHOLD: f64 = 0.5;

fn default_numeric_columns() -> Vec<String> {
    DEFAULT_NUMERIC_COLUMNS.iter().map(|s| s.to_string()).collect()
}

fn default_categorical_columns() -> Vec<String> {
    DEFAULT_CATEGORICAL_COLUMNS.iter().map(|s| s.to_string()).collect()
}

/// Configuration for the cleaning pipeline.
///
/// Use [`CleaningConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lex_cleaning::CleaningConfig;
///
/// let config = CleaningConfig::builder()
///     .missing_column_threshold(0.4)
///     .remove_duplicates(false)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Columns whose missing ratio is strictly above this value are dropped.
    /// Values above 1.0 disable pruning entirely.
    /// Default: 0.5
    pub missing_column_threshold: f64,

    /// Column names treated as numeric (lower-median imputation).
    /// Default: age, salary, experience, performance
    pub numeric_columns: Vec<String>,

    /// Column names treated as categorical (mode imputation).
    /// Default: department, city, education
    pub categorical_columns: Vec<String>,

    /// Whether to remove duplicate rows.
    /// Default: true
    pub remove_duplicates: bool,

    /// Output directory for the cleaned CSV and reports.
    /// Default: "./outputs"
    pub output_dir: PathBuf,

    /// Custom output file name (without extension).
    /// If None, uses "cleaned_dataset".
    pub output_name: Option<String>,

    /// Whether to write a JSON report next to the cleaned data.
    /// Default: false
    pub generate_reports: bool,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            missing_column_threshold: DEFAULT_MISSING_COLUMN_THRESHOLD,
            numeric_columns: default_numeric_columns(),
            categorical_columns: default_categorical_columns(),
            remove_duplicates: true,
            output_dir: PathBuf::from("./outputs"),
            output_name: None,
            generate_reports: false,
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.missing_column_threshold.is_finite() || self.missing_column_threshold < 0.0 {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "missing_column_threshold".to_string(),
                value: self.missing_column_threshold,
            });
        }

        if let Some(column) = self
            .numeric_columns
            .iter()
            .find(|c| self.categorical_columns.contains(c))
        {
            return Err(ConfigValidationError::OverlappingColumn(column.clone()));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be a finite value >= 0.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Column '{0}' is declared both numeric and categorical")]
    OverlappingColumn(String),
}

impl From<ConfigValidationError> for crate::error::CleaningError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::CleaningError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    missing_column_threshold: Option<f64>,
    numeric_columns: Option<Vec<String>>,
    categorical_columns: Option<Vec<String>>,
    remove_duplicates: Option<bool>,
    output_dir: Option<PathBuf>,
    output_name: Option<String>,
    generate_reports: Option<bool>,
}

impl CleaningConfigBuilder {
    /// Set the threshold for dropping columns with missing values.
    ///
    /// # Arguments
    /// * `threshold` - Missing ratio (e.g., 0.5 = 50%); the comparison is strict
    pub fn missing_column_threshold(mut self, threshold: f64) -> Self {
        self.missing_column_threshold = Some(threshold);
        self
    }

    /// Replace the numeric vocabulary.
    pub fn numeric_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the categorical vocabulary.
    pub fn categorical_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categorical_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Enable or disable duplicate row removal.
    pub fn remove_duplicates(mut self, remove: bool) -> Self {
        self.remove_duplicates = Some(remove);
        self
    }

    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set a custom output file name (without extension).
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    pub fn generate_reports(mut self, generate: bool) -> Self {
        self.generate_reports = Some(generate);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let config = CleaningConfig {
            missing_column_threshold: self
                .missing_column_threshold
                .unwrap_or(DEFAULT_MISSING_COLUMN_THRESHOLD),
            numeric_columns: self.numeric_columns.unwrap_or_else(default_numeric_columns),
            categorical_columns: self
                .categorical_columns
                .unwrap_or_else(default_categorical_columns),
            remove_duplicates: self.remove_duplicates.unwrap_or(true),
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from("./outputs")),
            output_name: self.output_name,
            generate_reports: self.generate_reports.unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CleaningConfig::default();
        assert_eq!(config.missing_column_threshold, 0.5);
        assert_eq!(
            config.numeric_columns,
            vec!["age", "salary", "experience", "performance"]
        );
        assert_eq!(config.categorical_columns, vec!["department", "city", "education"]);
        assert!(config.remove_duplicates);
        assert!(!config.generate_reports);
    }

    #[test]
    fn test_builder_defaults_match_default() {
        let config = CleaningConfig::builder().build().unwrap();
        assert_eq!(config, CleaningConfig::default());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = CleaningConfig::builder()
            .missing_column_threshold(0.3)
            .numeric_columns(["score"])
            .categorical_columns(vec!["team".to_string()])
            .remove_duplicates(false)
            .output_name("run_1")
            .build()
            .unwrap();

        assert_eq!(config.missing_column_threshold, 0.3);
        assert_eq!(config.numeric_columns, vec!["score"]);
        assert_eq!(config.categorical_columns, vec!["team"]);
        assert!(!config.remove_duplicates);
        assert_eq!(config.output_name.as_deref(), Some("run_1"));
    }

    #[test]
    fn test_threshold_above_one_is_allowed() {
        let config = CleaningConfig::builder()
            .missing_column_threshold(1.5)
            .build()
            .unwrap();
        assert_eq!(config.missing_column_threshold, 1.5);
    }

    #[test]
    fn test_validation_negative_threshold() {
        let result = CleaningConfig::builder().missing_column_threshold(-0.1).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidThreshold { .. }
        ));
    }

    #[test]
    fn test_validation_nan_threshold() {
        let result = CleaningConfig::builder()
            .missing_column_threshold(f64::NAN)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_overlapping_vocabulary() {
        let result = CleaningConfig::builder()
            .numeric_columns(["age", "city"])
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::OverlappingColumn(ref c) if c == "city"
        ));
    }

    #[test]
    fn test_config_from_partial_json() {
        let json = r#"{ "missing_column_threshold": 0.8, "remove_duplicates": false }"#;
        let config: CleaningConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.missing_column_threshold, 0.8);
        assert!(!config.remove_duplicates);
        assert_eq!(config.numeric_columns.len(), 4);
    }
}
