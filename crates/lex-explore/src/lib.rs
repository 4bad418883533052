//! Exploratory Data Analysis Library
//!
//! Point the engine at a spreadsheet or delimited file and it writes, without
//! any code on the caller's side, a color-coded correlation table, a set of
//! exploratory charts and a per-column statistical summary.
//!
//! # Overview
//!
//! - **Loading**: `.csv` (separator sniffed, lossy UTF-8 fallback) and
//!   `.xlsx`/`.xls`/`.xlsm`/`.ods` through calamine
//! - **Classification**: numeric vs. categorical columns; integer columns
//!   holding exactly `{1, 2, 3}` become the ordered scale
//!   `Beginner < Medium < Expert`
//! - **Correlation**: pairwise Pearson matrix written as a filled `.xlsx`
//! - **Charts**: scatter plots, pie charts, category-split histograms and
//!   cross-tab bar charts as PNG files
//! - **Summary**: descriptive statistics per column in one `.xlsx`
//! - **Progress Reporting**: per-chart progress with cooperative cancellation
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_explore::{Analyzer, ChartKind};
//!
//! let analyzer = Analyzer::new();
//! if !analyzer.load("survey.xlsx") {
//!     eprintln!("could not load survey.xlsx");
//!     return;
//! }
//!
//! analyzer.build_correlation("out");
//! analyzer.build_charts("out", ChartKind::scatter());
//! analyzer.build_charts("out", ChartKind::Pie);
//! analyzer.build_charts("out", ChartKind::histogram());
//! analyzer.summarize("out");
//! ```
//!
//! Every boolean operation has a `try_*` twin returning
//! [`Result`](error::Result) with the written paths:
//!
//! ```rust,ignore
//! let output = analyzer.try_build_pie("out")?;
//! for file in &output.files {
//!     println!("{}", file.display());
//! }
//! ```
//!
//! # Cancellation
//!
//! ```rust,ignore
//! use lex_explore::{Analyzer, CancellationToken};
//!
//! let token = CancellationToken::new();
//! let analyzer = Analyzer::builder().cancellation_token(token.clone()).build()?;
//!
//! // From the UI thread
//! token.cancel();
//!
//! // The running generator stops before its next chart and reports failure;
//! // charts already written stay on disk. Clear the flag before the next run.
//! analyzer.reset();
//! ```

pub mod charts;
pub mod config;
pub mod correlation;
pub mod error;
pub mod loader;
pub mod naming;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use charts::{ChartContext, generate_charts};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError};
pub use correlation::{CorrelationMatrix, HexColor, colorize};
pub use error::{AnalysisError, Result as AnalysisResult, ResultExt};
pub use loader::{SourceFormat, load_dataset};
pub use naming::sanitize_filename;
pub use pipeline::{
    AnalysisStage, Analyzer, AnalyzerBuilder, CancellationToken, ClosureProgressReporter,
    ProgressReporter, ProgressUpdate,
};
pub use profiler::Dataset;
pub use reporting::DatasetSummarizer;
pub use types::{ChartKind, ChartOutput, ColumnClass, ColumnSummary, PhysicalType};
pub use utils::{DtypeCategory, get_dtype_category, is_numeric_dtype};
