//! Pipeline module.
//!
//! This module provides the [`Analyzer`] facade together with progress
//! reporting and cancellation.

mod analyzer;
pub mod progress;

pub use analyzer::{Analyzer, AnalyzerBuilder};
pub use progress::{
    AnalysisStage, CancellationToken, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
