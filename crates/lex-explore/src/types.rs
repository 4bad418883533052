//! Shared types of the analysis engine.

use crate::config::{DEFAULT_HISTOGRAM_BINS, DEFAULT_SCATTER_THRESHOLD};
use crate::pipeline::progress::AnalysisStage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storage type of a column after loading and classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicalType {
    Integer,
    Float,
    Text,
    /// Ordered category registered by the classifier (e.g. Beginner < Medium < Expert)
    Ordinal,
    /// Boolean, temporal and nested columns
    Other,
}

impl PhysicalType {
    /// Semantic class derived from the physical type.
    pub fn class(&self) -> Option<ColumnClass> {
        match self {
            Self::Integer | Self::Float => Some(ColumnClass::Numeric),
            Self::Text | Self::Ordinal => Some(ColumnClass::Categorical),
            Self::Other => None,
        }
    }
}

/// Semantic class used to decide which analyses apply to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnClass {
    Numeric,
    Categorical,
}

/// One row of the dataset summary sheet.
///
/// `None` statistics are written as `N/A`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: String,
    pub dtype: String,
    pub unique_values: usize,
    pub non_null: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub mode: Option<String>,
    pub examples: Vec<String>,
}

/// Which chart family to generate, with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartKind {
    /// One scatter plot per numeric pair with |r| >= threshold
    Scatter { threshold: f64 },
    /// One pie chart per categorical column
    Pie,
    /// Category-split histograms followed by cross-tabulation bar charts
    Histogram { bins: usize },
}

impl ChartKind {
    /// Scatter plots with the default threshold.
    pub fn scatter() -> Self {
        Self::Scatter {
            threshold: DEFAULT_SCATTER_THRESHOLD,
        }
    }

    /// Histograms with the default bin count.
    pub fn histogram() -> Self {
        Self::Histogram {
            bins: DEFAULT_HISTOGRAM_BINS,
        }
    }

    /// Prefix of the timestamped output directory.
    pub fn dir_prefix(&self) -> &'static str {
        match self {
            Self::Scatter { .. } => "scatter_plot",
            Self::Pie => "pie_chart",
            Self::Histogram { .. } => "histogram_by_category",
        }
    }

    /// Stage reported while this chart family renders.
    pub fn stage(&self) -> AnalysisStage {
        match self {
            Self::Scatter { .. } => AnalysisStage::ScatterPlots,
            Self::Pie => AnalysisStage::PieCharts,
            Self::Histogram { .. } => AnalysisStage::Histograms,
        }
    }
}

/// Files written by one chart generator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartOutput {
    /// The timestamped directory created for this run
    pub directory: PathBuf,
    /// Every image written, in generation order
    pub files: Vec<PathBuf>,
}
