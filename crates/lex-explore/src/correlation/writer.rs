//! Spreadsheet rendering of a correlation matrix.

use super::CorrelationMatrix;
use super::colors::colorize;
use crate::error::Result;
use crate::utils::{cell_position, cell_text};
use rust_xlsxwriter::{Color, Format, FormatPattern, Workbook};
use std::path::Path;

/// Name of the single sheet in the correlation workbook.
pub const CORRELATION_SHEET: &str = "Correlation";

const LABEL_COLUMN_WIDTH: f64 = 20.0;

/// Write `matrix` with labels on the first row and column and every value
/// cell filled with its color. Undefined cells stay blank but filled.
pub fn write_correlation_table(matrix: &CorrelationMatrix, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(CORRELATION_SHEET)?;

    let header = Format::new().set_bold();
    for (idx, label) in matrix.labels().iter().enumerate() {
        let (row, col) = cell_position(idx + 1, idx + 1)?;
        let label = cell_text(label);
        worksheet.write_string_with_format(0, col, &label, &header)?;
        worksheet.write_string_with_format(row, 0, &label, &header)?;
    }

    for (i, values) in matrix.rows().iter().enumerate() {
        for (j, &r) in values.iter().enumerate() {
            let (row, col) = cell_position(i + 1, j + 1)?;
            let fill = Format::new()
                .set_background_color(Color::RGB(colorize(r).0))
                .set_pattern(FormatPattern::Solid);

            if r.is_nan() {
                worksheet.write_blank(row, col, &fill)?;
            } else {
                worksheet.write_number_with_format(row, col, r, &fill)?;
            }
        }
    }

    worksheet.set_column_width(0, LABEL_COLUMN_WIDTH)?;
    workbook.save(path)?;
    Ok(())
}
