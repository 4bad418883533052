//! Spreadsheet rendering of the dataset summary.

use crate::error::Result;
use crate::types::ColumnSummary;
use crate::utils::{cell_position, cell_text};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

/// Name of the single sheet in the summary workbook.
pub const SUMMARY_SHEET: &str = "Info";

/// Header row, in column order.
pub const SUMMARY_HEADERS: [&str; 10] = [
    "Column",
    "Type",
    "Unique Values",
    "Non-Null",
    "Min",
    "Max",
    "Mean",
    "Median",
    "Mode",
    "Examples",
];

/// Text written for statistics that do not apply to a column.
pub const NOT_APPLICABLE: &str = "N/A";

fn write_stat(sheet: &mut Worksheet, row: u32, col: u16, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) => sheet.write_number(row, col, v)?,
        None => sheet.write_string(row, col, NOT_APPLICABLE)?,
    };
    Ok(())
}

/// Format the example list as `[a, b, c]`.
pub fn format_examples(examples: &[String]) -> String {
    format!("[{}]", examples.join(", "))
}

pub fn write_summary_table(summaries: &[ColumnSummary], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SUMMARY_SHEET)?;

    let header = Format::new().set_bold();
    for (idx, title) in SUMMARY_HEADERS.iter().enumerate() {
        let (_, col) = cell_position(0, idx)?;
        sheet.write_string_with_format(0, col, *title, &header)?;
    }

    for (idx, summary) in summaries.iter().enumerate() {
        let (row, _) = cell_position(idx + 1, 0)?;
        sheet.write_string(row, 0, cell_text(&summary.column))?;
        sheet.write_string(row, 1, &summary.dtype)?;
        sheet.write_number(row, 2, summary.unique_values as f64)?;
        sheet.write_number(row, 3, summary.non_null as f64)?;
        write_stat(sheet, row, 4, summary.min)?;
        write_stat(sheet, row, 5, summary.max)?;
        write_stat(sheet, row, 6, summary.mean)?;
        write_stat(sheet, row, 7, summary.median)?;
        let mode = summary.mode.as_deref().unwrap_or(NOT_APPLICABLE);
        sheet.write_string(row, 8, cell_text(mode))?;
        // Distinct-value lists of text columns are unbounded
        sheet.write_string(row, 9, cell_text(&format_examples(&summary.examples)))?;
    }

    sheet.set_column_width(0, 20)?;
    sheet.set_column_width(9, 50)?;
    workbook.save(path)?;
    Ok(())
}
