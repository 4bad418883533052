//! The analysis engine facade.
//!
//! [`Analyzer`] owns the loaded dataset, the cancellation token and the
//! optional progress reporter. Each operation comes in two forms: a
//! `try_*` method returning [`Result`] with the written artifact(s), and a
//! boolean method for shells that only need success or failure.

use crate::charts::{ChartContext, generate_charts};
use crate::config::AnalysisConfig;
use crate::correlation::build_correlation_table;
use crate::error::{AnalysisError, Result};
use crate::loader::load_dataset;
use crate::pipeline::progress::{
    AnalysisStage, CancellationToken, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
use crate::profiler::Dataset;
use crate::reporting::{DatasetSummarizer, write_dataset_summary};
use crate::types::{ChartKind, ChartOutput, ColumnSummary};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Exploratory analysis over one loaded dataset.
///
/// # Example
///
/// ```rust,ignore
/// use lex_explore::{Analyzer, CancellationToken, ChartKind};
///
/// let token = CancellationToken::new();
/// let analyzer = Analyzer::builder()
///     .cancellation_token(token.clone())
///     .on_progress(|update| println!("[{:.0}%] {}", update.progress * 100.0, update.message))
///     .build()?;
///
/// if analyzer.load("survey.csv") {
///     analyzer.reset();
///     analyzer.build_correlation("out");
///     analyzer.reset();
///     analyzer.build_charts("out", ChartKind::Pie);
/// }
/// ```
pub struct Analyzer {
    config: AnalysisConfig,
    dataset: RwLock<Option<Dataset>>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    cancellation_token: CancellationToken,
}

// Operations run on a worker thread while the shell keeps a handle to cancel.
static_assertions::assert_impl_all!(Analyzer: Send, Sync);

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    /// Analyzer with the default configuration and its own token.
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
            dataset: RwLock::new(None),
            progress_reporter: None,
            cancellation_token: CancellationToken::new(),
        }
    }

    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::default()
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Cancellation
    // -------------------------------------------------------------------------

    /// A handle sharing this analyzer's cancellation flag.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    /// Request that the running (or next) operation stop at its next checkpoint.
    pub fn cancel(&self) {
        info!("Cancellation requested");
        self.cancellation_token.cancel();
    }

    /// Clear the cancellation flag. Call before starting an operation.
    pub fn reset(&self) {
        self.cancellation_token.reset();
    }

    // -------------------------------------------------------------------------
    // Dataset
    // -------------------------------------------------------------------------

    /// Load and classify a file, replacing the current dataset.
    ///
    /// On failure the previous dataset stays loaded.
    pub fn load(&self, path: impl AsRef<Path>) -> bool {
        self.try_load(path).is_ok()
    }

    /// Like [`load`](Self::load), returning `(rows, columns)`.
    pub fn try_load(&self, path: impl AsRef<Path>) -> Result<(usize, usize)> {
        let path = path.as_ref();
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Loading,
            0.0,
            format!("Loading {}", path.display()),
        ));

        let result = load_dataset(path, &self.config).map(|dataset| {
            let shape = (dataset.height(), dataset.width());
            *self.dataset.write() = Some(dataset);
            shape
        });
        self.finish(AnalysisStage::Loading, result)
    }

    /// Drop the loaded dataset.
    pub fn unload(&self) {
        self.dataset.write().take();
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.read().is_some()
    }

    /// `(rows, columns)` of the loaded dataset.
    pub fn shape(&self) -> Option<(usize, usize)> {
        self.dataset
            .read()
            .as_ref()
            .map(|dataset| (dataset.height(), dataset.width()))
    }

    /// Numeric column labels; empty when nothing is loaded.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.dataset
            .read()
            .as_ref()
            .map(Dataset::numeric_columns)
            .unwrap_or_default()
    }

    /// Categorical column labels; empty when nothing is loaded.
    pub fn categorical_columns(&self) -> Vec<String> {
        self.dataset
            .read()
            .as_ref()
            .map(Dataset::categorical_columns)
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    pub fn build_correlation(&self, output_dir: impl AsRef<Path>) -> bool {
        self.try_build_correlation(output_dir).is_ok()
    }

    /// Write `correlation_table_<ts>.xlsx` and return its path.
    pub fn try_build_correlation(&self, output_dir: impl AsRef<Path>) -> Result<PathBuf> {
        let result = self.with_dataset(|dataset| {
            build_correlation_table(dataset, output_dir.as_ref(), &self.cancellation_token)
        });
        self.finish(AnalysisStage::Correlation, result)
    }

    pub fn build_scatter(&self, output_dir: impl AsRef<Path>, threshold: f64) -> bool {
        self.try_build_scatter(output_dir, threshold).is_ok()
    }

    pub fn try_build_scatter(
        &self,
        output_dir: impl AsRef<Path>,
        threshold: f64,
    ) -> Result<ChartOutput> {
        self.try_build_charts(output_dir, ChartKind::Scatter { threshold })
    }

    pub fn build_pie(&self, output_dir: impl AsRef<Path>) -> bool {
        self.try_build_pie(output_dir).is_ok()
    }

    pub fn try_build_pie(&self, output_dir: impl AsRef<Path>) -> Result<ChartOutput> {
        self.try_build_charts(output_dir, ChartKind::Pie)
    }

    pub fn build_histograms(&self, output_dir: impl AsRef<Path>, bins: usize) -> bool {
        self.try_build_histograms(output_dir, bins).is_ok()
    }

    pub fn try_build_histograms(
        &self,
        output_dir: impl AsRef<Path>,
        bins: usize,
    ) -> Result<ChartOutput> {
        self.try_build_charts(output_dir, ChartKind::Histogram { bins })
    }

    pub fn build_charts(&self, output_dir: impl AsRef<Path>, kind: ChartKind) -> bool {
        self.try_build_charts(output_dir, kind).is_ok()
    }

    /// Run one chart generator and return the directory and files it wrote.
    pub fn try_build_charts(
        &self,
        output_dir: impl AsRef<Path>,
        kind: ChartKind,
    ) -> Result<ChartOutput> {
        let ctx = ChartContext::new(&self.cancellation_token)
            .with_reporter(self.progress_reporter.as_deref())
            .with_image_size(self.config.image_size());

        let result =
            self.with_dataset(|dataset| generate_charts(dataset, output_dir.as_ref(), kind, &ctx));
        self.finish(kind.stage(), result)
    }

    pub fn summarize(&self, output_dir: impl AsRef<Path>) -> bool {
        self.try_summarize(output_dir).is_ok()
    }

    /// Write `dataset_analysis_<ts>.xlsx` and return its path.
    pub fn try_summarize(&self, output_dir: impl AsRef<Path>) -> Result<PathBuf> {
        let result = self.with_dataset(|dataset| {
            write_dataset_summary(
                dataset,
                output_dir.as_ref(),
                self.config.example_count,
                &self.cancellation_token,
            )
        });
        self.finish(AnalysisStage::Summary, result)
    }

    /// Column summaries without writing a file.
    pub fn column_summaries(&self) -> Result<Vec<ColumnSummary>> {
        self.with_dataset(|dataset| {
            DatasetSummarizer::new(self.config.example_count)
                .summarize(dataset, &self.cancellation_token)
        })
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn with_dataset<T>(&self, operation: impl FnOnce(&Dataset) -> Result<T>) -> Result<T> {
        let guard = self.dataset.read();
        let dataset = guard.as_ref().ok_or(AnalysisError::NoDataLoaded)?;
        operation(dataset)
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    /// Log and report the outcome of an operation.
    fn finish<T>(&self, stage: AnalysisStage, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => {
                self.report_progress(ProgressUpdate::complete(format!(
                    "{} finished",
                    stage.display_name()
                )));
            }
            Err(e) if e.is_cancelled() => {
                warn!("{} cancelled", stage.display_name());
                self.report_progress(ProgressUpdate::cancelled());
            }
            Err(e) => {
                error!("{} failed: {}", stage.display_name(), e);
                self.report_progress(ProgressUpdate::failed(e.to_string()));
            }
        }
        result
    }
}

/// Builder for [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    config: Option<AnalysisConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    cancellation_token: Option<CancellationToken>,
}

static_assertions::assert_impl_all!(AnalyzerBuilder: Send);

impl AnalyzerBuilder {
    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter, e.g. one forwarding updates to a UI.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// For anything beyond a closure, use
    /// [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Share a token with the caller so it can cancel from another thread.
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Build the analyzer. Fails if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Analyzer, crate::config::ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Analyzer {
            config,
            dataset: RwLock::new(None),
            progress_reporter: self.progress_reporter,
            cancellation_token: self.cancellation_token.unwrap_or_default(),
        })
    }
}
