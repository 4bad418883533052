//! Category-split histograms and the cross-tabulation pass.
//!
//! Phase 1 draws, for every numeric × categorical pair, one histogram series
//! per category level. All series of a chart share bins spanning the full
//! observed range of the numeric column. Phase 2 draws a row-normalized
//! cross-tab for every ordered pair of distinct categorical columns.

use super::crosstab::{Crosstab, draw_crosstab};
use super::style::{FONT_FAMILY, TITLE_FONT_SIZE, palette_color};
use super::{ChartContext, DrawResult, ensure_not_empty};
use crate::config::validate_bins;
use crate::error::{AnalysisError, Result};
use crate::naming::{create_output_dir, sanitize_filename};
use crate::pipeline::progress::AnalysisStage;
use crate::profiler::Dataset;
use crate::profiler::statistics::{max, min, present};
use crate::types::{ChartKind, ChartOutput};
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// `bins + 1` equal-width edges from `lo` to `hi`.
///
/// A degenerate range is widened to one unit centered on the value.
pub fn bin_edges(lo: f64, hi: f64, bins: usize) -> Vec<f64> {
    let bins = bins.max(1);
    let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 0.5, lo + 0.5) };
    let width = (hi - lo) / bins as f64;
    (0..=bins)
        .map(|i| if i == bins { hi } else { lo + width * i as f64 })
        .collect()
}

/// Count values per bin. Bins are half-open except the last, which also
/// holds its upper edge. Values outside the edges are ignored.
pub fn histogram_counts(values: &[f64], edges: &[f64]) -> Vec<usize> {
    let bins = edges.len().saturating_sub(1);
    let mut counts = vec![0usize; bins];
    if bins == 0 {
        return counts;
    }

    let lo = edges[0];
    let hi = edges[bins];
    let width = (hi - lo) / bins as f64;
    for &value in values {
        if !(lo..=hi).contains(&value) {
            continue;
        }
        let idx = (((value - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
}

/// Split numeric values by the level of a categorical column.
///
/// Levels without any numeric value are left out.
fn split_by_level(
    values: &[Option<f64>],
    labels: &[Option<String>],
    levels: &[String],
) -> Vec<(String, Vec<f64>)> {
    levels
        .iter()
        .map(|level| {
            let subset: Vec<f64> = values
                .iter()
                .zip(labels)
                .filter_map(|(value, label)| match (value, label) {
                    (Some(v), Some(l)) if l == level => Some(*v),
                    _ => None,
                })
                .collect();
            (level.clone(), subset)
        })
        .filter(|(_, subset)| !subset.is_empty())
        .collect()
}

/// Histograms for every numeric × categorical pair, then cross-tabs for
/// every ordered categorical pair, all in one directory.
pub fn generate_histograms(
    dataset: &Dataset,
    output_dir: &Path,
    bins: usize,
    ctx: &ChartContext<'_>,
) -> Result<ChartOutput> {
    ensure_not_empty(dataset)?;
    validate_bins(bins)?;
    let numeric = dataset.numeric_columns();
    let categorical = dataset.categorical_columns();
    if categorical.is_empty() {
        return Err(AnalysisError::NoCategoricalColumns);
    }

    let directory = create_output_dir(output_dir, ChartKind::Histogram { bins }.dir_prefix())?;
    let total = numeric.len() * categorical.len() + categorical.len() * (categorical.len() - 1);
    info!(
        "Drawing {} histogram/cross-tab chart(s) into {}",
        total,
        directory.display()
    );

    let mut files: Vec<PathBuf> = Vec::with_capacity(total);
    let mut done = 0;

    for column in &numeric {
        let values = dataset.numeric_values(column)?;
        let observed = present(&values);
        let edges = bin_edges(
            min(&observed).unwrap_or(0.0),
            max(&observed).unwrap_or(1.0),
            bins,
        );

        for group in &categorical {
            ctx.check_cancelled()?;
            done += 1;

            let labels = dataset.text_values(group)?;
            let levels = dataset.category_levels(group)?;
            let series: Vec<(String, Vec<usize>)> = split_by_level(&values, &labels, &levels)
                .into_iter()
                .map(|(level, subset)| (level, histogram_counts(&subset, &edges)))
                .collect();

            let title = format!("{column} by {group}");
            let path = ctx.save_chart(
                &directory,
                &format!("{}_by_{}", sanitize_filename(column), sanitize_filename(group)),
                AnalysisStage::Histograms,
                (done, total),
                |path, size| draw_histogram(path, size, &title, column, &edges, &series),
            )?;
            files.push(path);
        }
    }

    for target in &categorical {
        let target_values = dataset.text_values(target)?;
        let target_levels = dataset.category_levels(target)?;

        for group in categorical.iter().filter(|g| *g != target) {
            ctx.check_cancelled()?;
            done += 1;

            let table = Crosstab::build(
                &target_values,
                &dataset.text_values(group)?,
                &target_levels,
                &dataset.category_levels(group)?,
            );
            if table.is_empty() {
                warn!(
                    "Skipping cross-tab of '{}' by '{}': no rows with both values",
                    target, group
                );
                continue;
            }

            let title = format!("{target} by {group}");
            let path = ctx.save_chart(
                &directory,
                &format!("{}_by_{}", sanitize_filename(target), sanitize_filename(group)),
                AnalysisStage::Crosstabs,
                (done, total),
                |path, size| draw_crosstab(path, size, &title, target, &table),
            )?;
            files.push(path);
        }
    }

    Ok(ChartOutput { directory, files })
}

fn draw_histogram(
    path: &Path,
    size: (u32, u32),
    title: &str,
    x_label: &str,
    edges: &[f64],
    series: &[(String, Vec<usize>)],
) -> DrawResult {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let x_range = edges[0]..edges[edges.len() - 1];
    let y_max = series
        .iter()
        .flat_map(|(_, counts)| counts.iter().copied())
        .max()
        .unwrap_or(0)
        .max(1) as f64
        * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT_FAMILY, TITLE_FONT_SIZE))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc("Frequency")
        .draw()?;

    for (idx, (level, counts)) in series.iter().enumerate() {
        let color = palette_color(idx);
        let bars: Vec<[(f64, f64); 2]> = counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(bin, count)| [(edges[bin], 0.0), (edges[bin + 1], *count as f64)])
            .collect();

        chart
            .draw_series(
                bars.iter()
                    .map(|corners| Rectangle::new(*corners, color.mix(0.5).filled())),
            )?
            .label(level.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
        chart.draw_series(
            bars.iter()
                .map(|corners| Rectangle::new(*corners, color.stroke_width(1))),
        )?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK.mix(0.25))
        .draw()?;

    root.present()?;
    Ok(())
}
