//! Chart generators.
//!
//! Every generator follows the same contract: check its preconditions,
//! create a fresh `<prefix>_<timestamp>` directory under the output root,
//! then loop over its subplots, checking the cancellation token before each
//! one and writing one PNG per subplot. A cancelled run returns
//! [`AnalysisError::Cancelled`] and leaves the files written so far on disk.

mod crosstab;
mod histogram;
mod pie;
mod scatter;
mod style;

use crate::error::{AnalysisError, Result};
use crate::naming::unique_path;
use crate::pipeline::progress::{AnalysisStage, CancellationToken, ProgressReporter, ProgressUpdate};
use crate::profiler::Dataset;
use crate::types::{ChartKind, ChartOutput};
use std::path::{Path, PathBuf};
use tracing::debug;

pub use crosstab::Crosstab;
pub use histogram::{bin_edges, generate_histograms, histogram_counts};
pub use pie::{generate_pie_charts, value_frequencies};
pub use scatter::generate_scatter_plots;

/// Result of a drawing routine. Plotters errors are boxed and converted to
/// [`AnalysisError::Render`] by [`ChartContext::save_chart`].
pub(crate) type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;

/// Everything a generator needs besides the data.
pub struct ChartContext<'a> {
    token: &'a CancellationToken,
    reporter: Option<&'a dyn ProgressReporter>,
    image_size: (u32, u32),
}

impl<'a> ChartContext<'a> {
    pub fn new(token: &'a CancellationToken) -> Self {
        Self {
            token,
            reporter: None,
            image_size: (1200, 900),
        }
    }

    pub fn with_reporter(mut self, reporter: Option<&'a dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_image_size(mut self, size: (u32, u32)) -> Self {
        self.image_size = size;
        self
    }

    /// Checkpoint run before every subplot.
    pub(crate) fn check_cancelled(&self) -> Result<()> {
        self.token.checkpoint()
    }

    pub(crate) fn report(&self, update: ProgressUpdate) {
        if let Some(reporter) = self.reporter {
            reporter.report(update);
        }
    }

    /// Render one subplot to `<dir>/<stem>.png` and report it.
    ///
    /// `done` counts this subplot, so the last one reports `done == total`.
    pub(crate) fn save_chart<F>(
        &self,
        dir: &Path,
        stem: &str,
        stage: AnalysisStage,
        (done, total): (usize, usize),
        draw: F,
    ) -> Result<PathBuf>
    where
        F: FnOnce(&Path, (u32, u32)) -> DrawResult,
    {
        style::ensure_font()?;
        let path = unique_path(dir.join(format!("{stem}.png")));
        draw(&path, self.image_size)
            .map_err(|e| AnalysisError::Render(format!("{}: {}", path.display(), e)))?;

        debug!("Saved {}", path.display());
        self.report(ProgressUpdate::with_items(
            stage,
            stem,
            done,
            total,
            format!("Saved {stem}.png"),
        ));
        Ok(path)
    }
}

/// Precondition shared by every generator.
pub(crate) fn ensure_not_empty(dataset: &Dataset) -> Result<()> {
    if dataset.is_empty() {
        Err(AnalysisError::EmptyDataset)
    } else {
        Ok(())
    }
}

/// Run the generator selected by `kind`.
pub fn generate_charts(
    dataset: &Dataset,
    output_dir: &Path,
    kind: ChartKind,
    ctx: &ChartContext<'_>,
) -> Result<ChartOutput> {
    match kind {
        ChartKind::Scatter { threshold } => {
            generate_scatter_plots(dataset, output_dir, threshold, ctx)
        }
        ChartKind::Pie => generate_pie_charts(dataset, output_dir, ctx),
        ChartKind::Histogram { bins } => generate_histograms(dataset, output_dir, bins, ctx),
    }
}
