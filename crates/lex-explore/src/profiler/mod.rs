//! Dataset model and column profiling.
//!
//! A [`Dataset`] is a loaded [`DataFrame`] after classification. It answers
//! the questions every analysis asks: which columns are numeric, which are
//! categorical, and what their values are with missing entries removed.

pub(crate) mod classifier;
pub(crate) mod statistics;

use crate::error::{AnalysisError, Result};
use crate::types::{ColumnClass, PhysicalType};
use crate::utils::{DtypeCategory, get_dtype_category};
use polars::prelude::*;
use std::collections::BTreeSet;

pub use classifier::{ORDINAL_CODES, ORDINAL_LEVELS};

/// A classified table held by the [`Analyzer`](crate::Analyzer).
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
}

impl Dataset {
    /// Classify a freshly loaded frame.
    pub fn from_frame(mut frame: DataFrame) -> Result<Self> {
        classifier::remap_ordinal_columns(&mut frame)?;
        Ok(Self { frame })
    }

    /// The underlying frame, after classification.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    /// No rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.height() == 0 || self.width() == 0
    }

    /// Column labels in file order.
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    fn series(&self, name: &str) -> Result<&Series> {
        self.frame
            .column(name)
            .map(|column| column.as_materialized_series())
            .map_err(|_| AnalysisError::ColumnNotFound(name.to_string()))
    }

    /// Storage type of a column.
    pub fn physical_type(&self, name: &str) -> Result<PhysicalType> {
        let series = self.series(name)?;
        if matches!(series.dtype(), DataType::Enum(..)) {
            return Ok(PhysicalType::Ordinal);
        }
        Ok(match get_dtype_category(series.dtype()) {
            DtypeCategory::Integer => PhysicalType::Integer,
            DtypeCategory::Float => PhysicalType::Float,
            DtypeCategory::String => PhysicalType::Text,
            DtypeCategory::Other => PhysicalType::Other,
        })
    }

    /// Semantic class of a column, `None` for booleans and dates.
    pub fn column_class(&self, name: &str) -> Result<Option<ColumnClass>> {
        Ok(self.physical_type(name)?.class())
    }

    /// Type name shown in the summary, e.g. `Int64`, `Float64`, `Categorical`.
    pub fn dtype_name(&self, name: &str) -> Result<String> {
        let series = self.series(name)?;
        if matches!(series.dtype(), DataType::Enum(..)) {
            return Ok("Categorical".to_string());
        }
        Ok(format!("{:?}", series.dtype()))
    }

    fn columns_of_class(&self, class: ColumnClass) -> Vec<String> {
        self.column_names()
            .into_iter()
            .filter(|name| matches!(self.column_class(name), Ok(Some(c)) if c == class))
            .collect()
    }

    /// Numeric columns in file order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns_of_class(ColumnClass::Numeric)
    }

    /// Categorical columns in file order.
    pub fn categorical_columns(&self) -> Vec<String> {
        self.columns_of_class(ColumnClass::Categorical)
    }

    /// Level order of a remapped skill-scale column.
    pub fn ordinal_levels(&self, name: &str) -> Option<Vec<String>> {
        let series = self.series(name).ok()?;
        classifier::enum_levels(series.dtype())
    }

    /// Values of a numeric column as floats, one entry per row.
    ///
    /// Nulls and NaN are both returned as `None`.
    pub fn numeric_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let casted = self.series(name)?.cast(&DataType::Float64)?;
        Ok(casted
            .f64()?
            .into_iter()
            .map(|value| value.filter(|v| !v.is_nan()))
            .collect())
    }

    /// Values of any column rendered as text, one entry per row.
    pub fn text_values(&self, name: &str) -> Result<Vec<Option<String>>> {
        let casted = self.series(name)?.cast(&DataType::String)?;
        Ok(casted
            .str()?
            .into_iter()
            .map(|value| value.map(str::to_string))
            .collect())
    }

    /// Category levels in display order.
    ///
    /// Skill-scale columns use their registered order; other columns use
    /// their sorted distinct values.
    pub fn category_levels(&self, name: &str) -> Result<Vec<String>> {
        if let Some(levels) = self.ordinal_levels(name) {
            return Ok(levels);
        }
        let distinct: BTreeSet<String> = self.text_values(name)?.into_iter().flatten().collect();
        Ok(distinct.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        let df = df![
            "score" => [1i64, 2, 3, 2],
            "age" => [Some(23.0f64), Some(35.0), None, Some(f64::NAN)],
            "dept" => ["IT", "HR", "IT", "Sales"],
            "active" => [true, false, true, true],
        ]
        .unwrap();
        Dataset::from_frame(df).unwrap()
    }

    #[test]
    fn test_classification() {
        let dataset = sample();
        assert_eq!(dataset.numeric_columns(), vec!["age"]);
        assert_eq!(dataset.categorical_columns(), vec!["score", "dept"]);
        assert_eq!(dataset.physical_type("score").unwrap(), PhysicalType::Ordinal);
        assert_eq!(dataset.physical_type("active").unwrap(), PhysicalType::Other);
        assert_eq!(dataset.column_class("active").unwrap(), None);
    }

    #[test]
    fn test_dtype_names() {
        let dataset = sample();
        assert_eq!(dataset.dtype_name("score").unwrap(), "Categorical");
        assert_eq!(dataset.dtype_name("age").unwrap(), "Float64");
        assert_eq!(dataset.dtype_name("dept").unwrap(), "String");
    }

    #[test]
    fn test_numeric_values_drop_nan() {
        let dataset = sample();
        assert_eq!(
            dataset.numeric_values("age").unwrap(),
            vec![Some(23.0), Some(35.0), None, None]
        );
    }

    #[test]
    fn test_category_levels() {
        let dataset = sample();
        assert_eq!(
            dataset.category_levels("score").unwrap(),
            vec!["Beginner", "Medium", "Expert"]
        );
        assert_eq!(
            dataset.category_levels("dept").unwrap(),
            vec!["HR", "IT", "Sales"]
        );
    }

    #[test]
    fn test_ordinal_column_keeps_labels() {
        let dataset = sample();
        assert_eq!(
            dataset.text_values("score").unwrap(),
            vec![
                Some("Beginner".to_string()),
                Some("Medium".to_string()),
                Some("Expert".to_string()),
                Some("Medium".to_string()),
            ]
        );
        assert_eq!(dataset.ordinal_levels("dept"), None);
    }

    #[test]
    fn test_gapped_scale_stays_numeric() {
        let df = df![
            "level" => [1i64, 2, 4, 2],
            "hours" => [3.5f64, 4.0, 7.5, 2.0],
        ]
        .unwrap();
        let dataset = Dataset::from_frame(df).unwrap();
        assert_eq!(dataset.numeric_columns(), vec!["level", "hours"]);
        assert_eq!(dataset.physical_type("level").unwrap(), PhysicalType::Integer);
        assert_eq!(dataset.ordinal_levels("level"), None);
    }

    #[test]
    fn test_missing_column() {
        let dataset = sample();
        assert!(matches!(
            dataset.numeric_values("nope"),
            Err(AnalysisError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = Dataset::from_frame(DataFrame::empty()).unwrap();
        assert!(dataset.is_empty());
        assert!(dataset.numeric_columns().is_empty());
    }
}
