//! Shared utilities for the analysis engine.
//!
//! This module contains dtype helpers and value formatting used across the
//! loader, profiler, charts and summary modules.

use crate::error::{AnalysisError, Result};
use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a polars data type as seen by the column classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Signed or unsigned integers
    Integer,
    /// Floating point numbers
    Float,
    /// String/text type
    String,
    /// Anything else (boolean, dates, nested types)
    Other,
}

/// Check if a DataType is an integer type.
#[inline]
pub fn is_integer_dtype(dtype: &DataType) -> bool {
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
    )
}

/// Check if a DataType is a floating point type.
#[inline]
pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    is_integer_dtype(dtype) || is_float_dtype(dtype)
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_integer_dtype(dtype) {
        DtypeCategory::Integer
    } else if is_float_dtype(dtype) {
        DtypeCategory::Float
    } else if matches!(dtype, DataType::String) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

// =============================================================================
// String Utilities
// =============================================================================

/// Cell contents read as missing when loading delimited files.
pub const MISSING_MARKERS: [&str; 10] = [
    "NA", "N/A", "n/a", "NaN", "nan", "NULL", "null", "None", "#N/A", "<NA>",
];

/// Format a float the way a spreadsheet user expects: integral values
/// without a trailing `.0`, everything else with its shortest representation.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Round a value to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Truncate a label for display, appending an ellipsis when shortened.
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        label.to_string()
    } else {
        let kept: String = label.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

// =============================================================================
// Worksheet Utilities
// =============================================================================

/// Most characters a worksheet cell accepts.
pub const CELL_TEXT_LIMIT: usize = 32_767;

/// Text shortened to fit one worksheet cell.
pub fn cell_text(text: &str) -> String {
    truncate_label(text, CELL_TEXT_LIMIT)
}

/// Convert a zero-based table position into worksheet `(row, column)` indices.
pub fn cell_position(row: usize, col: usize) -> Result<(u32, u16)> {
    let row = u32::try_from(row)
        .map_err(|_| AnalysisError::SheetLimit(format!("row {row} out of range")))?;
    let col = u16::try_from(col)
        .map_err(|_| AnalysisError::SheetLimit(format!("column {col} out of range")))?;
    Ok((row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_category() {
        assert_eq!(get_dtype_category(&DataType::Int64), DtypeCategory::Integer);
        assert_eq!(get_dtype_category(&DataType::UInt8), DtypeCategory::Integer);
        assert_eq!(get_dtype_category(&DataType::Float32), DtypeCategory::Float);
        assert_eq!(get_dtype_category(&DataType::String), DtypeCategory::String);
        assert_eq!(get_dtype_category(&DataType::Boolean), DtypeCategory::Other);
    }

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int32));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-12.0), "-12");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(3.14159, 4), 3.1416);
        assert_eq!(round_to(2.0, 4), 2.0);
        assert_eq!(round_to(-0.123456, 2), -0.12);
    }

    #[test]
    fn test_cell_position() {
        assert_eq!(cell_position(3, 7).unwrap(), (3, 7));
        assert!(matches!(
            cell_position(0, 70_000),
            Err(AnalysisError::SheetLimit(_))
        ));
    }

    #[test]
    fn test_cell_text_fits_worksheet_limit() {
        assert_eq!(cell_text("Oslo"), "Oslo");

        let long = "é".repeat(CELL_TEXT_LIMIT + 10);
        let capped = cell_text(&long);
        assert_eq!(capped.chars().count(), CELL_TEXT_LIMIT);
        assert!(capped.ends_with('…'));
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("short", 10), "short");
        assert_eq!(truncate_label("a very long category", 8), "a very …");
    }
}
