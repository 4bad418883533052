//! Progress reporting and cancellation support for the analysis engine.
//!
//! This module provides types for tracking operation progress and supporting
//! cancellation from external threads (e.g., a UI cancel button).
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_explore::{Analyzer, CancellationToken};
//!
//! let token = CancellationToken::new();
//! let analyzer = Analyzer::builder()
//!     .cancellation_token(token.clone())
//!     .on_progress(|update| println!("[{:?}] {}", update.stage, update.message))
//!     .build()?;
//!
//! // In another thread
//! std::thread::spawn(move || {
//!     std::thread::sleep(std::time::Duration::from_secs(5));
//!     token.cancel();
//! });
//!
//! analyzer.build_pie("out");
//! ```

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Stages reported by the engine.
///
/// Every operation reports under its own stage; the histogram generator
/// switches from `Histograms` to `Crosstabs` for its second phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    /// Reading and classifying an input file
    Loading,
    /// Computing and writing the correlation table
    Correlation,
    /// Rendering scatter plots
    ScatterPlots,
    /// Rendering pie charts
    PieCharts,
    /// Rendering category-split histograms
    Histograms,
    /// Rendering cross-tabulation bar charts
    Crosstabs,
    /// Writing the dataset summary
    Summary,
    /// Operation completed successfully
    Complete,
    /// Operation was cancelled by user
    Cancelled,
    /// Operation failed with an error
    Failed,
}

impl AnalysisStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading Dataset",
            Self::Correlation => "Building Correlation Table",
            Self::ScatterPlots => "Drawing Scatter Plots",
            Self::PieCharts => "Drawing Pie Charts",
            Self::Histograms => "Drawing Histograms",
            Self::Crosstabs => "Drawing Cross-Tabulations",
            Self::Summary => "Summarizing Dataset",
            Self::Complete => "Complete",
            Self::Cancelled => "Cancelled",
            Self::Failed => "Failed",
        }
    }

    /// Whether the stage ends an operation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Cancelled | Self::Failed)
    }
}

/// Progress update with optional item counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Current stage
    pub stage: AnalysisStage,

    /// Optional sub-stage description (e.g., "age_vs_income")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_stage: Option<String>,

    /// Progress within the current stage (0.0 - 1.0)
    pub progress: f32,

    /// Human-readable message describing current activity
    pub message: String,

    /// Number of items processed in current stage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_processed: Option<usize>,

    /// Total items in current stage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_total: Option<usize>,
}

impl ProgressUpdate {
    /// Creates a new progress update for a stage without item counts.
    pub fn new(stage: AnalysisStage, progress: f32, message: impl Into<String>) -> Self {
        Self {
            stage,
            sub_stage: None,
            progress: progress.clamp(0.0, 1.0),
            message: message.into(),
            items_processed: None,
            items_total: None,
        }
    }

    /// Creates a new progress update with item counts.
    pub fn with_items(
        stage: AnalysisStage,
        sub_stage: impl Into<String>,
        current: usize,
        total: usize,
        message: impl Into<String>,
    ) -> Self {
        let progress = if total > 0 {
            current as f32 / total as f32
        } else {
            0.0
        };
        Self {
            stage,
            sub_stage: Some(sub_stage.into()),
            progress: progress.clamp(0.0, 1.0),
            message: message.into(),
            items_processed: Some(current),
            items_total: Some(total),
        }
    }

    /// Creates a completion progress update.
    pub fn complete(message: impl Into<String>) -> Self {
        Self::new(AnalysisStage::Complete, 1.0, message)
    }

    /// Creates a cancelled progress update.
    pub fn cancelled() -> Self {
        Self::new(AnalysisStage::Cancelled, 0.0, "Operation cancelled by user")
    }

    /// Creates a failed progress update.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(AnalysisStage::Failed, 0.0, message)
    }
}

/// Trait for receiving progress updates from the engine.
///
/// Implementations must be `Send + Sync`: operations run on a worker thread
/// while the updates usually end up on a UI thread.
///
/// # Example
///
/// ```rust,ignore
/// use lex_explore::{ProgressReporter, ProgressUpdate};
/// use std::sync::mpsc::Sender;
/// use parking_lot::Mutex;
///
/// struct ChannelReporter(Mutex<Sender<ProgressUpdate>>);
///
/// impl ProgressReporter for ChannelReporter {
///     fn report(&self, update: ProgressUpdate) {
///         self.0.lock().send(update).ok();
///     }
/// }
/// ```
pub trait ProgressReporter: Send + Sync {
    /// Called after each written artifact and once when an operation ends.
    ///
    /// Implementations should be cheap and non-blocking.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

/// Single-slot cancellation flag shared between the caller and a running
/// operation.
///
/// Clones share the slot, so a [`cancel()`](Self::cancel) from the UI thread
/// is seen by the worker at its next [`checkpoint()`](Self::checkpoint). The
/// flag stays set until [`reset()`](Self::reset).
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

static_assertions::assert_impl_all!(CancellationToken: Send, Sync);
static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Allowed while idle: the next operation then
    /// stops at its first checkpoint.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Clear the flag before starting a new operation.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }

    /// `Err(Cancelled)` once cancellation has been requested.
    ///
    /// Generators call this before every subplot and propagate with `?`.
    pub fn checkpoint(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(AnalysisError::Cancelled)
        } else {
            Ok(())
        }
    }
}
