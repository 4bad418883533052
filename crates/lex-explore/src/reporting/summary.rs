//! Per-column descriptive statistics.

use crate::error::Result;
use crate::pipeline::progress::CancellationToken;
use crate::profiler::Dataset;
use crate::profiler::statistics::{
    distinct_count, distinct_in_order, max, mean, median, min, numeric_mode, present, text_mode,
};
use crate::types::{ColumnClass, ColumnSummary};
use crate::utils::{format_number, round_to};
use rand::seq::SliceRandom;
use tracing::debug;

/// Decimal places kept for mean and median.
const STAT_DECIMALS: i32 = 4;

/// Builds one [`ColumnSummary`] per column.
#[derive(Debug, Clone)]
pub struct DatasetSummarizer {
    example_count: usize,
}

impl Default for DatasetSummarizer {
    fn default() -> Self {
        Self::new(5)
    }
}

impl DatasetSummarizer {
    /// `example_count` caps the random sample listed for numeric columns.
    pub fn new(example_count: usize) -> Self {
        Self { example_count }
    }

    /// Summaries of every column in file order, checking `token` between
    /// columns.
    pub fn summarize(
        &self,
        dataset: &Dataset,
        token: &CancellationToken,
    ) -> Result<Vec<ColumnSummary>> {
        dataset
            .column_names()
            .iter()
            .map(|name| {
                token.checkpoint()?;
                self.summarize_column(dataset, name)
            })
            .collect()
    }

    pub fn summarize_column(&self, dataset: &Dataset, name: &str) -> Result<ColumnSummary> {
        let dtype = dataset.dtype_name(name)?;
        let summary = match dataset.column_class(name)? {
            Some(ColumnClass::Numeric) => self.numeric_summary(dataset, name, dtype)?,
            // Categorical columns and columns of neither class share the text path
            _ => Self::text_summary(dataset, name, dtype)?,
        };
        debug!(
            "Summarized '{}' ({} non-null, {} unique)",
            name, summary.non_null, summary.unique_values
        );
        Ok(summary)
    }

    fn numeric_summary(&self, dataset: &Dataset, name: &str, dtype: String) -> Result<ColumnSummary> {
        let values = present(&dataset.numeric_values(name)?);
        let examples = values
            .choose_multiple(&mut rand::thread_rng(), self.example_count)
            .map(|v| format_number(*v))
            .collect();

        Ok(ColumnSummary {
            column: name.to_string(),
            dtype,
            unique_values: distinct_count(&values),
            non_null: values.len(),
            min: min(&values),
            max: max(&values),
            mean: mean(&values).map(|v| round_to(v, STAT_DECIMALS)),
            median: median(&values).map(|v| round_to(v, STAT_DECIMALS)),
            mode: numeric_mode(&values).map(format_number),
            examples,
        })
    }

    fn text_summary(dataset: &Dataset, name: &str, dtype: String) -> Result<ColumnSummary> {
        let values: Vec<String> = dataset.text_values(name)?.into_iter().flatten().collect();
        let distinct: Vec<String> = distinct_in_order(&values).into_iter().cloned().collect();

        Ok(ColumnSummary {
            column: name.to_string(),
            dtype,
            unique_values: distinct.len(),
            non_null: values.len(),
            min: None,
            max: None,
            mean: None,
            median: None,
            mode: text_mode(&values),
            examples: distinct,
        })
    }
}
