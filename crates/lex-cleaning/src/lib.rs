//! Dataset Cleaning Library
//!
//! Missing-value analysis, column pruning, statistical imputation and
//! duplicate removal for small tabular datasets.
//!
//! # Overview
//!
//! A run of the cleaning pipeline takes a [`Dataset`] (rows of named cells)
//! through a fixed sequence of stages:
//!
//! - **Analysis**: missing-value count, percentage and severity per column
//! - **Pruning**: columns whose missing ratio is strictly above the threshold are dropped
//! - **Imputation**: lower median for numeric columns, mode for categorical ones
//! - **Deduplication**: structurally identical rows collapse to their first occurrence
//! - **Comparison**: before/after rows, columns, missing cells and completeness
//!
//! The core is pure and synchronous: the input is never mutated, and the same
//! input always yields the same output.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_cleaning::{clean, io};
//!
//! let dataset = io::read_csv("data.csv")?;
//! let numeric = vec!["age".to_string(), "salary".to_string()];
//! let categorical = vec!["department".to_string()];
//!
//! let result = clean(&dataset, 0.5, &numeric, &categorical)?;
//! println!("Dropped: {:?}", result.dropped_columns);
//! println!("Completeness: {}% -> {}%",
//!     result.stats.completeness_before,
//!     result.stats.completeness_after);
//! ```
//!
//! # Configuration
//!
//! Use [`CleaningConfig`] and the [`Pipeline`] builder for the configurable form:
//!
//! ```rust,ignore
//! use lex_cleaning::{CleaningConfig, Pipeline};
//!
//! let config = CleaningConfig::builder()
//!     .missing_column_threshold(0.7)      // Drop columns with >70% missing
//!     .numeric_columns(["age", "salary"])
//!     .categorical_columns(["city"])
//!     .remove_duplicates(true)
//!     .build()?;
//!
//! let result = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .process(&dataset)?;
//! ```

pub mod cleaner;
pub mod config;
pub mod dataset;
pub mod error;
pub mod imputers;
pub mod io;
pub mod pipeline;
pub mod quality;
pub mod reporting;
pub mod sample;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{ColumnPruner, DedupOutcome, Deduplicator, PruneOutcome};
pub use config::{CleaningConfig, CleaningConfigBuilder, ConfigValidationError};
pub use dataset::{CellValue, Dataset, Row};
pub use error::{CleaningError, Result, ResultExt};
pub use imputers::{ImputationMethod, ImputationOutcome, ImputationRecord, StatisticalImputer};
pub use pipeline::{
    CleaningStage, ClosureProgressReporter, Pipeline, PipelineBuilder, ProgressReporter,
    ProgressUpdate, clean,
};
pub use quality::MissingValueAnalyzer;
pub use reporting::{CleaningReport, Comparator, ReportGenerator};
pub use sample::SampleGenerator;
pub use types::{
    ActionType, CleaningAction, CleaningResult, ColumnMissing, ColumnRole, ColumnSummary,
    ComparisonStats, MissingSeverity, MissingStatistics,
};
