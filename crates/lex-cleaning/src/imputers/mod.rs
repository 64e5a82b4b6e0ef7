//! Imputation module for handling missing values.
//!
//! This module provides statistical imputation:
//! - Lower median for numeric columns
//! - Mode (first-seen tie-break) for categorical columns

mod statistical;

pub use statistical::{
    ImputationMethod, ImputationOutcome, ImputationRecord, StatisticalImputer, lower_median, mode,
};
