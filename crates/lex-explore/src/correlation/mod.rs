//! Pearson correlation over the numeric columns of a dataset.
//!
//! The matrix is recomputed on every request. Undefined coefficients (zero
//! variance or fewer than two complete pairs) are NaN, and the diagonal is
//! exactly 1.0 for every column that varies.

pub mod colors;
mod writer;

use crate::error::{AnalysisError, Result};
use crate::naming::output_file_path;
use crate::pipeline::progress::CancellationToken;
use crate::profiler::Dataset;
use crate::profiler::statistics::pearson;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub use colors::{CORRELATION_COLOR_RULES, ColorRule, HexColor, RuleBounds, colorize};
pub use writer::{CORRELATION_SHEET, write_correlation_table};

/// File prefix of the correlation workbook.
pub const CORRELATION_PREFIX: &str = "correlation_table";

/// Square, symmetric matrix indexed by numeric column labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    labels: Vec<String>,
    values: Vec<Vec<f64>>,
}

/// A numeric pair whose coefficient reached a threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelatedPair {
    pub first: String,
    pub second: String,
    pub coefficient: f64,
}

impl CorrelationMatrix {
    /// Correlate every numeric column of `dataset`, in dataset order.
    pub fn compute(dataset: &Dataset) -> Result<Self> {
        let labels = dataset.numeric_columns();
        if labels.len() < 2 {
            return Err(AnalysisError::InsufficientNumericColumns {
                found: labels.len(),
            });
        }

        let columns = labels
            .iter()
            .map(|label| dataset.numeric_values(label))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::from_columns(labels, &columns))
    }

    /// Build the matrix from already extracted columns.
    pub fn from_columns(labels: Vec<String>, columns: &[Vec<Option<f64>>]) -> Self {
        let n = columns.len();
        let mut values = vec![vec![f64::NAN; n]; n];

        for i in 0..n {
            for j in i..n {
                let r = pearson(&columns[i], &columns[j]);
                // Pearson of a varying column with itself is 1 up to rounding
                let r = if i == j && !r.is_nan() { 1.0 } else { r };
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        Self { labels, values }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn size(&self) -> usize {
        self.labels.len()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Coefficient between two labelled columns.
    pub fn value(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == a)?;
        let j = self.labels.iter().position(|l| l == b)?;
        Some(self.values[i][j])
    }

    /// Unordered pairs (first before second in dataset order) with
    /// `|r| >= threshold`. NaN never qualifies.
    pub fn strong_pairs(&self, threshold: f64) -> Vec<CorrelatedPair> {
        let mut pairs = Vec::new();
        for i in 0..self.size() {
            for j in (i + 1)..self.size() {
                let r = self.values[i][j];
                if !r.is_nan() && r.abs() >= threshold {
                    pairs.push(CorrelatedPair {
                        first: self.labels[i].clone(),
                        second: self.labels[j].clone(),
                        coefficient: r,
                    });
                }
            }
        }
        pairs
    }

    /// Display color of every cell.
    pub fn color_grid(&self) -> Vec<Vec<HexColor>> {
        self.values
            .iter()
            .map(|row| row.iter().map(|r| colorize(*r)).collect())
            .collect()
    }
}

/// Compute the matrix and write `correlation_table_<ts>.xlsx` under `output_dir`.
pub fn build_correlation_table(
    dataset: &Dataset,
    output_dir: &Path,
    token: &CancellationToken,
) -> Result<PathBuf> {
    if dataset.is_empty() {
        return Err(AnalysisError::EmptyDataset);
    }
    let matrix = CorrelationMatrix::compute(dataset)?;
    let path = output_file_path(output_dir, CORRELATION_PREFIX, "xlsx")?;

    token.checkpoint()?;
    write_correlation_table(&matrix, &path)?;
    info!(
        "Correlation table for {} numeric columns written to {}",
        matrix.size(),
        path.display()
    );
    Ok(path)
}
