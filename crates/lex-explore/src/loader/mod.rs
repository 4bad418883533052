//! Reading input files into a classified [`Dataset`].
//!
//! Delimited text goes through the polars CSV reader; spreadsheet formats are
//! read with calamine. The format is chosen from the file extension alone.

mod delimited;
mod workbook;

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result, ResultExt};
use crate::profiler::Dataset;
use polars::prelude::DataFrame;
use std::path::Path;
use tracing::info;

pub use delimited::sniff_separator;

/// Input formats understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `.csv`
    Delimited,
    /// `.xlsx`, `.xls`, `.xlsm`, `.ods`
    Workbook,
}

impl SourceFormat {
    /// Pick the format from the extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(Self::Delimited),
            "xlsx" | "xls" | "xlsm" | "ods" => Ok(Self::Workbook),
            _ => Err(AnalysisError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Read a file into a raw frame without classification.
pub fn read_frame(path: &Path, config: &AnalysisConfig) -> Result<DataFrame> {
    let format = SourceFormat::from_path(path)?;
    if !path.is_file() {
        return Err(AnalysisError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }

    match format {
        SourceFormat::Delimited => delimited::read_delimited(path, config.infer_schema_length),
        SourceFormat::Workbook => workbook::read_first_sheet(path),
    }
    .context(format!("Loading {}", path.display()))
}

/// Read and classify a file.
pub fn load_dataset(path: &Path, config: &AnalysisConfig) -> Result<Dataset> {
    let frame = read_frame(path, config)?;
    let dataset = Dataset::from_frame(frame)?;
    info!(
        "Loaded {} ({} rows x {} columns; {} numeric, {} categorical)",
        path.display(),
        dataset.height(),
        dataset.width(),
        dataset.numeric_columns().len(),
        dataset.categorical_columns().len()
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_extension() {
        let cases = [
            ("data.csv", Some(SourceFormat::Delimited)),
            ("DATA.CSV", Some(SourceFormat::Delimited)),
            ("book.xlsx", Some(SourceFormat::Workbook)),
            ("book.XLS", Some(SourceFormat::Workbook)),
            ("book.ods", Some(SourceFormat::Workbook)),
            ("notes.txt", None),
            ("no_extension", None),
        ];

        for (name, expected) in cases {
            let format = SourceFormat::from_path(&PathBuf::from(name)).ok();
            assert_eq!(format, expected, "{name}");
        }
    }

    #[test]
    fn test_unsupported_is_rejected_before_reading() {
        let err = read_frame(Path::new("missing.txt"), &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = read_frame(Path::new("missing.csv"), &AnalysisConfig::default()).unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
    }
}
