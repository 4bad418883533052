//! Cross-tabulation of two categorical columns, drawn as grouped bars.

use super::DrawResult;
use super::style::{FONT_FAMILY, LABEL_FONT_SIZE, TITLE_FONT_SIZE, palette_color};
use crate::utils::truncate_label;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

/// Share of the bar area used by one group of bars.
const GROUP_WIDTH: f64 = 0.8;
const MAX_TICK_CHARS: usize = 20;
/// Gap in pixels between the x axis and its category labels.
const TICK_GAP: i32 = 6;

/// Counts of rows per (target level, group level).
///
/// Only levels that occur in rows where both columns are present are kept,
/// in the order given to [`Crosstab::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crosstab {
    pub row_levels: Vec<String>,
    pub col_levels: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

impl Crosstab {
    pub fn build(
        targets: &[Option<String>],
        groups: &[Option<String>],
        target_order: &[String],
        group_order: &[String],
    ) -> Self {
        let pairs: Vec<(&str, &str)> = targets
            .iter()
            .zip(groups)
            .filter_map(|(t, g)| Some((t.as_deref()?, g.as_deref()?)))
            .collect();

        let row_levels: Vec<String> = target_order
            .iter()
            .filter(|level| pairs.iter().any(|(t, _)| *t == level.as_str()))
            .cloned()
            .collect();
        let col_levels: Vec<String> = group_order
            .iter()
            .filter(|level| pairs.iter().any(|(_, g)| *g == level.as_str()))
            .cloned()
            .collect();

        let mut counts = vec![vec![0usize; col_levels.len()]; row_levels.len()];
        for (t, g) in &pairs {
            let row = row_levels.iter().position(|level| level.as_str() == *t);
            let col = col_levels.iter().position(|level| level.as_str() == *g);
            if let (Some(row), Some(col)) = (row, col) {
                counts[row][col] += 1;
            }
        }

        Self {
            row_levels,
            col_levels,
            counts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_levels.is_empty() || self.col_levels.is_empty()
    }

    /// Counts divided by their row total, so every row sums to 1.
    pub fn row_shares(&self) -> Vec<Vec<f64>> {
        self.counts
            .iter()
            .map(|row| {
                let total: usize = row.iter().sum();
                row.iter()
                    .map(|count| {
                        if total == 0 {
                            0.0
                        } else {
                            *count as f64 / total as f64
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

/// Axis position of every target level, one per bar group center.
fn category_ticks(levels: &[String]) -> Vec<(f64, &str)> {
    levels
        .iter()
        .enumerate()
        .map(|(idx, level)| (idx as f64, level.as_str()))
        .collect()
}

/// One group of bars per target level, one bar per group level.
pub(crate) fn draw_crosstab(
    path: &Path,
    size: (u32, u32),
    title: &str,
    target: &str,
    table: &Crosstab,
) -> DrawResult {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let n_targets = table.row_levels.len();
    let bar_width = GROUP_WIDTH / table.col_levels.len().max(1) as f64;
    let shares = table.row_shares();

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT_FAMILY, TITLE_FONT_SIZE))
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..(n_targets as f64 - 0.5), 0f64..1.05f64)?;

    // Generated key points need not land on integers, so levels are drawn by hand
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .x_desc(target)
        .y_desc("Proportion")
        .draw()?;

    let tick_style = TextStyle::from((FONT_FAMILY, LABEL_FONT_SIZE).into_font())
        .pos(Pos::new(HPos::Center, VPos::Top));
    for (x, level) in category_ticks(&table.row_levels) {
        let (px, py) = chart.backend_coord(&(x, 0.0));
        root.draw(&Text::new(
            truncate_label(level, MAX_TICK_CHARS),
            (px, py + TICK_GAP),
            tick_style.clone(),
        ))?;
    }

    for (g, group_level) in table.col_levels.iter().enumerate() {
        let color = palette_color(g);
        let bars: Vec<[(f64, f64); 2]> = shares
            .iter()
            .enumerate()
            .map(|(t, row)| {
                let left = t as f64 - GROUP_WIDTH / 2.0 + g as f64 * bar_width;
                [(left, 0.0), (left + bar_width, row[g])]
            })
            .collect();

        chart
            .draw_series(
                bars.iter()
                    .map(|corners| Rectangle::new(*corners, color.mix(0.8).filled())),
            )?
            .label(group_level.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
        chart.draw_series(
            bars.iter()
                .map(|corners| Rectangle::new(*corners, BLACK.stroke_width(1))),
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

#[cfg(test)]
mod tests {
    use super::*;

    fn values(items: &[Option<&str>]) -> Vec<Option<String>> {
        items.iter().map(|v| v.map(str::to_string)).collect()
    }

    fn levels(items: &[&str]) -> Vec<String> {
        items.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_counts_and_shares() {
        let targets = values(&[Some("a"), Some("a"), Some("b"), None, Some("b")]);
        let groups = values(&[Some("x"), Some("y"), Some("x"), Some("y"), None]);
        let table = Crosstab::build(&targets, &groups, &levels(&["a", "b"]), &levels(&["x", "y"]));

        assert_eq!(table.counts, vec![vec![1, 1], vec![1, 0]]);
        assert_eq!(table.row_shares(), vec![vec![0.5, 0.5], vec![1.0, 0.0]]);
    }

    #[test]
    fn test_absent_levels_are_dropped() {
        let targets = values(&[Some("Beginner"), Some("Expert")]);
        let groups = values(&[Some("x"), Some("x")]);
        let table = Crosstab::build(
            &targets,
            &groups,
            &levels(&["Beginner", "Medium", "Expert"]),
            &levels(&["x", "y"]),
        );

        assert_eq!(table.row_levels, levels(&["Beginner", "Expert"]));
        assert_eq!(table.col_levels, levels(&["x"]));
    }

    #[test]
    fn test_category_ticks_on_every_level() {
        let names = levels(&["Beginner", "Medium", "Expert"]);
        assert_eq!(
            category_ticks(&names),
            vec![(0.0, "Beginner"), (1.0, "Medium"), (2.0, "Expert")]
        );
        assert!(category_ticks(&[]).is_empty());
    }

    #[test]
    fn test_draw_labels_many_levels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crosstab.png");
        let names: Vec<String> = (0..7).map(|i| format!("level {i}")).collect();
        let targets: Vec<Option<String>> = names.iter().cloned().map(Some).collect();
        let groups = values(&[Some("x"), Some("y"), Some("x"), Some("y"), Some("x"), Some("y"), Some("x")]);
        let table = Crosstab::build(&targets, &groups, &names, &levels(&["x", "y"]));

        crate::charts::style::ensure_font().unwrap();
        draw_crosstab(&path, (480, 360), "level by group", "level", &table).unwrap();
        assert!(path.is_file());
    }
}
