//! Scatter plots for strongly correlated numeric pairs.

use super::style::{FONT_FAMILY, TITLE_FONT_SIZE, padded_range, palette_color};
use super::{ChartContext, DrawResult, ensure_not_empty};
use crate::config::validate_threshold;
use crate::correlation::CorrelationMatrix;
use crate::error::Result;
use crate::naming::{create_output_dir, sanitize_filename};
use crate::pipeline::progress::AnalysisStage;
use crate::profiler::Dataset;
use crate::types::{ChartKind, ChartOutput};
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

const POINT_RADIUS: i32 = 4;

/// One scatter plot per numeric pair with `|r| >= threshold`.
///
/// No qualifying pair is still a success: the directory is created and
/// left empty.
pub fn generate_scatter_plots(
    dataset: &Dataset,
    output_dir: &Path,
    threshold: f64,
    ctx: &ChartContext<'_>,
) -> Result<ChartOutput> {
    ensure_not_empty(dataset)?;
    validate_threshold(threshold)?;
    let matrix = CorrelationMatrix::compute(dataset)?;
    let pairs = matrix.strong_pairs(threshold);

    let directory = create_output_dir(output_dir, ChartKind::Scatter { threshold }.dir_prefix())?;
    info!(
        "Drawing {} scatter plot(s) with |r| >= {} into {}",
        pairs.len(),
        threshold,
        directory.display()
    );

    let mut files = Vec::with_capacity(pairs.len());
    for (idx, pair) in pairs.iter().enumerate() {
        ctx.check_cancelled()?;

        let xs = dataset.numeric_values(&pair.first)?;
        let ys = dataset.numeric_values(&pair.second)?;
        let points: Vec<(f64, f64)> = xs
            .iter()
            .zip(&ys)
            .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
            .collect();

        let stem = format!(
            "{}_vs_{}",
            sanitize_filename(&pair.first),
            sanitize_filename(&pair.second)
        );
        let title = format!(
            "Scatter Plot: {} vs {} (cor={:.2})",
            pair.first, pair.second, pair.coefficient
        );

        let path = ctx.save_chart(
            &directory,
            &stem,
            AnalysisStage::ScatterPlots,
            (idx + 1, pairs.len()),
            |path, size| draw_scatter(path, size, &title, &pair.first, &pair.second, &points),
        )?;
        files.push(path);
    }

    Ok(ChartOutput { directory, files })
}

fn draw_scatter(
    path: &Path,
    size: (u32, u32),
    title: &str,
    x_label: &str,
    y_label: &str,
    points: &[(f64, f64)],
) -> DrawResult {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let x_range = padded_range(points.iter().map(|p| p.0));
    let y_range = padded_range(points.iter().map(|p| p.1));

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT_FAMILY, TITLE_FONT_SIZE))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .draw()?;

    let color = palette_color(1);
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), POINT_RADIUS, color.mix(0.6).filled())),
    )?;

    root.present()?;
    Ok(())
}
