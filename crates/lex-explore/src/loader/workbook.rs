//! Spreadsheet input through calamine.
//!
//! Only the first sheet is read and its first row is the header. Column
//! types are inferred from the cells: all-integral numbers become `Int64`,
//! other numbers `Float64`, booleans `Boolean`, anything mixed `String`.

use crate::error::{AnalysisError, Result};
use calamine::{Data, Reader, open_workbook_auto};
use polars::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

pub(crate) fn read_first_sheet(path: &Path) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(AnalysisError::EmptyDataset)??;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };
    let body: Vec<&[Data]> = rows.collect();
    let names = header_names(header);
    debug!(
        "Read sheet from {} ({} data rows, {} columns)",
        path.display(),
        body.len(),
        names.len()
    );

    let columns = names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells: Vec<&Data> = body
                .iter()
                .map(|row| row.get(idx).unwrap_or(&Data::Empty))
                .collect();
            column_from_cells(name, &cells)
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}

/// Header labels with blanks named `Unnamed: <idx>` and repeats suffixed `.n`.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen = HashSet::new();
    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = match cell {
                Data::Empty => format!("Unnamed: {idx}"),
                other => other.to_string().trim().to_string(),
            };
            let base = if base.is_empty() {
                format!("Unnamed: {idx}")
            } else {
                base
            };

            let mut name = base.clone();
            let mut n = 1;
            while !seen.insert(name.clone()) {
                name = format!("{base}.{n}");
                n += 1;
            }
            name
        })
        .collect()
}

fn as_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(v) => Some(*v as f64),
        Data::Float(v) => Some(*v),
        _ => None,
    }
}

fn is_blank(cell: &Data) -> bool {
    matches!(cell, Data::Empty | Data::Error(_))
}

fn column_from_cells(name: &str, cells: &[&Data]) -> Column {
    let filled: Vec<&Data> = cells.iter().copied().filter(|c| !is_blank(c)).collect();

    let series = if filled.is_empty() {
        Series::new(name.into(), vec![None::<f64>; cells.len()])
    } else if filled.iter().all(|c| as_number(c).is_some()) {
        let integral = filled.iter().all(|c| {
            as_number(c).is_some_and(|v| v.fract() == 0.0 && v.abs() < MAX_EXACT_INTEGER)
        });
        if integral {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|c| as_number(c).map(|v| v as i64))
                .collect();
            Series::new(name.into(), values)
        } else {
            let values: Vec<Option<f64>> = cells.iter().map(|c| as_number(c)).collect();
            Series::new(name.into(), values)
        }
    } else if filled.iter().all(|c| matches!(c, Data::Bool(_))) {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|c| match c {
                Data::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        Series::new(name.into(), values)
    } else {
        let values: Vec<Option<String>> = cells
            .iter()
            .map(|c| {
                if is_blank(c) {
                    None
                } else {
                    Some(c.to_string())
                }
            })
            .collect();
        Series::new(name.into(), values)
    };

    Column::from(series)
}
