//! Pie charts of categorical value frequencies.
//!
//! Slices are drawn as polygons, largest first, starting at 12 o'clock and
//! running counter-clockwise. Each slice carries its percentage inside and
//! its label outside the rim.

use super::style::{FONT_FAMILY, LABEL_FONT_SIZE, TITLE_FONT_SIZE, palette_color};
use super::{ChartContext, DrawResult, ensure_not_empty};
use crate::error::{AnalysisError, Result};
use crate::naming::{create_output_dir, sanitize_filename};
use crate::pipeline::progress::AnalysisStage;
use crate::profiler::Dataset;
use crate::types::{ChartKind, ChartOutput};
use crate::utils::truncate_label;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::collections::HashMap;
use std::f64::consts::PI;
use std::path::Path;
use tracing::{info, warn};

const START_ANGLE_DEG: f64 = 90.0;
const MAX_LABEL_CHARS: usize = 30;

/// Value counts of a categorical column, most frequent first.
///
/// Equal counts keep the column's level order.
pub fn value_frequencies(dataset: &Dataset, column: &str) -> Result<Vec<(String, usize)>> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in dataset.text_values(column)?.into_iter().flatten() {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut slices: Vec<(String, usize)> = dataset
        .category_levels(column)?
        .into_iter()
        .filter_map(|level| counts.get(&level).map(|count| (level.clone(), *count)))
        .collect();
    // Stable sort keeps level order among ties
    slices.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(slices)
}

/// One pie chart per categorical column.
pub fn generate_pie_charts(
    dataset: &Dataset,
    output_dir: &Path,
    ctx: &ChartContext<'_>,
) -> Result<ChartOutput> {
    ensure_not_empty(dataset)?;
    let columns = dataset.categorical_columns();
    if columns.is_empty() {
        return Err(AnalysisError::NoCategoricalColumns);
    }

    let directory = create_output_dir(output_dir, ChartKind::Pie.dir_prefix())?;
    info!(
        "Drawing {} pie chart(s) into {}",
        columns.len(),
        directory.display()
    );

    let mut files = Vec::with_capacity(columns.len());
    for (idx, column) in columns.iter().enumerate() {
        ctx.check_cancelled()?;

        let slices = value_frequencies(dataset, column)?;
        if slices.is_empty() {
            warn!("Skipping pie chart for '{}': no values", column);
            continue;
        }

        let title = format!("Distribution of {column}");
        let path = ctx.save_chart(
            &directory,
            &sanitize_filename(column),
            AnalysisStage::PieCharts,
            (idx + 1, columns.len()),
            |path, size| draw_pie(path, size, &title, &slices),
        )?;
        files.push(path);
    }

    Ok(ChartOutput { directory, files })
}

fn polar(center: (i32, i32), radius: f64, angle: f64) -> (i32, i32) {
    (
        center.0 + (radius * angle.cos()).round() as i32,
        center.1 - (radius * angle.sin()).round() as i32,
    )
}

/// Outline of a slice as a polygon: the center followed by arc points.
fn wedge(center: (i32, i32), radius: f64, start_deg: f64, sweep_deg: f64) -> Vec<(i32, i32)> {
    let steps = (sweep_deg.abs().ceil() as usize).max(1);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for step in 0..=steps {
        let angle = (start_deg + sweep_deg * step as f64 / steps as f64) * PI / 180.0;
        points.push(polar(center, radius, angle));
    }
    points
}

fn draw_pie(path: &Path, size: (u32, u32), title: &str, slices: &[(String, usize)]) -> DrawResult {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let area = root.titled(title, (FONT_FAMILY, TITLE_FONT_SIZE))?;

    let (width, height) = area.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = f64::from(width.min(height)) * 0.35;
    let total: usize = slices.iter().map(|(_, count)| count).sum();

    let centered = TextStyle::from((FONT_FAMILY, LABEL_FONT_SIZE).into_font())
        .pos(Pos::new(HPos::Center, VPos::Center));

    let mut start = START_ANGLE_DEG;
    for (idx, (label, count)) in slices.iter().enumerate() {
        let share = *count as f64 / total as f64;
        let sweep = share * 360.0;

        area.draw(&Polygon::new(
            wedge(center, radius, start, sweep),
            palette_color(idx).filled(),
        ))?;

        let mid = (start + sweep / 2.0) * PI / 180.0;
        area.draw(&Text::new(
            format!("{:.1}%", share * 100.0),
            polar(center, radius * 0.65, mid),
            centered.clone(),
        ))?;

        let anchor = if mid.cos() >= 0.0 { HPos::Left } else { HPos::Right };
        let outside = TextStyle::from((FONT_FAMILY, LABEL_FONT_SIZE).into_font())
            .pos(Pos::new(anchor, VPos::Center));
        area.draw(&Text::new(
            truncate_label(label, MAX_LABEL_CHARS),
            polar(center, radius * 1.1, mid),
            outside,
        ))?;

        start += sweep;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{mixed_dataset, png_count};
    use super::*;
    use crate::pipeline::progress::{CancellationToken, ClosureProgressReporter, ProgressReporter};
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_value_frequencies_order() {
        let dataset = mixed_dataset();
        assert_eq!(
            value_frequencies(&dataset, "team").unwrap(),
            vec![
                ("red".to_string(), 3),
                ("blue".to_string(), 2),
                ("green".to_string(), 1)
            ]
        );
        // All levels tie, so level order is kept
        assert_eq!(
            value_frequencies(&dataset, "skill").unwrap(),
            vec![
                ("Beginner".to_string(), 2),
                ("Medium".to_string(), 2),
                ("Expert".to_string(), 2)
            ]
        );
    }

    #[test]
    fn test_wedge_starts_at_center() {
        let points = wedge((100, 100), 50.0, 90.0, 90.0);
        assert_eq!(points[0], (100, 100));
        assert_eq!(points[1], (100, 50));
        assert_eq!(*points.last().unwrap(), (50, 100));
    }

    #[test]
    fn test_one_chart_per_categorical_column() {
        let dir = tempfile::tempdir().unwrap();
        let token = CancellationToken::new();
        let ctx = ChartContext::new(&token).with_image_size((400, 300));

        let output = generate_pie_charts(&mixed_dataset(), dir.path(), &ctx).unwrap();

        let names: Vec<String> = output
            .files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["skill.png", "team.png"]);
        assert_eq!(png_count(&output.directory), 2);
    }

    #[test]
    fn test_no_categorical_columns() {
        let df = df!["a" => [1.0f64, 2.0], "b" => [3.0f64, 4.0]].unwrap();
        let dataset = Dataset::from_frame(df).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let token = CancellationToken::new();

        let err = generate_pie_charts(&dataset, dir.path(), &ChartContext::new(&token)).unwrap_err();

        assert!(matches!(err, AnalysisError::NoCategoricalColumns));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_cancel_after_first_chart() {
        let dir = tempfile::tempdir().unwrap();
        let token = CancellationToken::new();
        let trigger = token.clone();
        let reporter = ClosureProgressReporter::new(move |update| {
            if update.items_processed == Some(1) {
                trigger.cancel();
            }
        });
        let ctx = ChartContext::new(&token)
            .with_reporter(Some(&reporter as &dyn ProgressReporter))
            .with_image_size((400, 300));

        let err = generate_pie_charts(&mixed_dataset(), dir.path(), &ctx).unwrap_err();

        assert!(err.is_cancelled());
        let run_dir = std::fs::read_dir(dir.path())
            .unwrap()
            .next()
            .unwrap()
            .unwrap()
            .path();
        assert_eq!(png_count(&run_dir), 1);
    }
}
