//! Dataset summary: one row of descriptive statistics per column, written to
//! `dataset_analysis_<timestamp>.xlsx`.
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_explore::reporting::{DatasetSummarizer, write_summary_table};
//!
//! let summaries = DatasetSummarizer::new(5).summarize(&dataset, &token)?;
//! write_summary_table(&summaries, Path::new("out/summary.xlsx"))?;
//! ```

mod summary;
mod writer;

use crate::error::{AnalysisError, Result};
use crate::naming::output_file_path;
use crate::pipeline::progress::CancellationToken;
use crate::profiler::Dataset;
use std::path::{Path, PathBuf};
use tracing::info;

pub use summary::DatasetSummarizer;
pub use writer::{
    NOT_APPLICABLE, SUMMARY_HEADERS, SUMMARY_SHEET, format_examples, write_summary_table,
};

/// File prefix of the summary workbook.
pub const SUMMARY_PREFIX: &str = "dataset_analysis";

/// Summarize every column and write the workbook under `output_dir`.
pub fn write_dataset_summary(
    dataset: &Dataset,
    output_dir: &Path,
    example_count: usize,
    token: &CancellationToken,
) -> Result<PathBuf> {
    if dataset.is_empty() {
        return Err(AnalysisError::EmptyDataset);
    }
    let path = output_file_path(output_dir, SUMMARY_PREFIX, "xlsx")?;

    let summaries = DatasetSummarizer::new(example_count).summarize(dataset, token)?;
    write_summary_table(&summaries, &path)?;

    info!(
        "Summary of {} columns written to {}",
        summaries.len(),
        path.display()
    );
    Ok(path)
}
