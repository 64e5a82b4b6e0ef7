//! Shared utilities for the cleaning pipeline.
//!
//! Rounding and percentage helpers used by the analyzer and comparator, plus
//! the dtype classification used when moving between polars and [`Dataset`].
//!
//! [`Dataset`]: crate::dataset::Dataset

use polars::prelude::*;

// =============================================================================
// Numeric Utilities
// =============================================================================

/// Round to one decimal place, half away from zero.
#[inline]
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `part / whole * 100`, or `None` when `whole` is zero.
#[inline]
pub fn percentage(part: usize, whole: usize) -> Option<f64> {
    if whole == 0 {
        None
    } else {
        Some(part as f64 / whole as f64 * 100.0)
    }
}

/// Whether a finite value has no fractional part and fits in an `i64`.
#[inline]
pub fn is_integral(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64
}

/// Try to parse a text cell as a finite number.
///
/// Surrounding whitespace is ignored. `NaN` and infinities are rejected.
pub fn parse_numeric_string(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

// =============================================================================
// Data Type Utilities
// =============================================================================

/// How a polars column maps onto [`CellValue`](crate::dataset::CellValue).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers, read as `Number`.
    Numeric,
    /// Booleans, read as `Text("true" | "false")`.
    Boolean,
    /// Everything else, cast to string and read as `Text`.
    Text,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else {
        DtypeCategory::Text
    }
}
