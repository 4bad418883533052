//! Custom error types for the analysis engine.
//!
//! This module provides the error hierarchy using `thiserror`. Every fallible
//! operation of the engine returns [`AnalysisError`]; the boolean-returning
//! [`Analyzer`](crate::Analyzer) facade converts it into `false` after logging.
//!
//! Errors are serializable so a front end can receive them as
//! `{ "code": ..., "message": ... }`.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the analysis engine.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Operation was cancelled by the user.
    #[error("Operation cancelled")]
    Cancelled,

    /// No dataset has been loaded yet.
    #[error("No data loaded")]
    NoDataLoaded,

    /// The loaded dataset has no rows or no columns.
    #[error("Dataset is empty")]
    EmptyDataset,

    /// The input file extension is not one of the supported formats.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Correlation and scatter plots need at least two numeric columns.
    #[error("Insufficient numeric data: found {found} numeric column(s), need at least 2")]
    InsufficientNumericColumns { found: usize },

    /// Pie charts and histograms need at least one categorical column.
    #[error("No categorical columns available")]
    NoCategoricalColumns,

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// The output root directory does not exist or is not a directory.
    #[error("Output directory does not exist: {0}")]
    OutputDirMissing(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A table does not fit in a worksheet.
    #[error("Worksheet limit exceeded: {0}")]
    SheetLimit(String),

    /// Chart rasterization failed.
    #[error("Failed to render chart: {0}")]
    Render(String),

    /// Writing a spreadsheet failed.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    /// Reading a workbook failed.
    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalysisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for front-end handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Cancelled => "CANCELLED",
            Self::NoDataLoaded => "NO_DATA_LOADED",
            Self::EmptyDataset => "EMPTY_DATASET",
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::InsufficientNumericColumns { .. } => "INSUFFICIENT_NUMERIC_DATA",
            Self::NoCategoricalColumns => "NO_CATEGORICAL_COLUMNS",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::OutputDirMissing(_) => "OUTPUT_DIR_MISSING",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::SheetLimit(_) => "SHEET_LIMIT",
            Self::Render(_) => "RENDER_FAILED",
            Self::Spreadsheet(_) => "SPREADSHEET_ERROR",
            Self::Workbook(_) => "WORKBOOK_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error represents a cancellation.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Cancelled => true,
            Self::WithContext { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }

    /// Check if this error was raised by a precondition check, before any
    /// artifact was created.
    pub fn is_precondition(&self) -> bool {
        match self {
            Self::NoDataLoaded
            | Self::EmptyDataset
            | Self::InsufficientNumericColumns { .. }
            | Self::NoCategoricalColumns
            | Self::OutputDirMissing(_) => true,
            Self::WithContext { source, .. } => source.is_precondition(),
            _ => false,
        }
    }
}

/// Serialize implementation for front-end IPC.
///
/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for AnalysisError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalysisError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Io(e).with_context(context))
    }
}
