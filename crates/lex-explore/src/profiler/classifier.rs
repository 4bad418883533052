//! Column classification.
//!
//! Integer columns whose distinct non-null values are exactly `{1, 2, 3}` are
//! treated as a skill scale and replaced by an ordered category
//! `Beginner < Medium < Expert`, stored as a polars `Enum` so the level
//! order travels with the column. Everything else keeps its loaded type.

use crate::error::Result;
use crate::utils::is_integer_dtype;
use polars::prelude::*;
use std::collections::BTreeSet;
use tracing::info;

/// Integer codes of the skill scale, in level order.
pub const ORDINAL_CODES: [i64; 3] = [1, 2, 3];

/// Labels that replace [`ORDINAL_CODES`].
pub const ORDINAL_LEVELS: [&str; 3] = ["Beginner", "Medium", "Expert"];

/// Whether the distinct non-null codes are exactly the skill scale.
pub(crate) fn is_ordinal_code_set(codes: &[Option<i64>]) -> bool {
    let distinct: BTreeSet<i64> = codes.iter().flatten().copied().collect();
    distinct.len() == ORDINAL_CODES.len() && ORDINAL_CODES.iter().all(|c| distinct.contains(c))
}

fn level_for_code(code: i64) -> Option<&'static str> {
    ORDINAL_CODES
        .iter()
        .position(|c| *c == code)
        .map(|idx| ORDINAL_LEVELS[idx])
}

/// The ordered category type of skill-scale columns.
pub(crate) fn ordinal_dtype() -> Result<DataType> {
    let categories = FrozenCategories::new(ORDINAL_LEVELS.iter().copied())?;
    Ok(DataType::from_frozen_categories(categories))
}

/// Level order of an `Enum` column, `None` for any other type.
pub(crate) fn enum_levels(dtype: &DataType) -> Option<Vec<String>> {
    match dtype {
        DataType::Enum(categories, _) => Some(
            categories
                .categories()
                .values_iter()
                .map(str::to_string)
                .collect(),
        ),
        _ => None,
    }
}

/// Replace every skill-scale column in `frame` with its ordered labels.
///
/// Returns the names of the remapped columns.
pub(crate) fn remap_ordinal_columns(frame: &mut DataFrame) -> Result<Vec<String>> {
    let mut remapped = Vec::new();
    let dtype = ordinal_dtype()?;
    let names: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    for name in names {
        let series = frame.column(&name)?.as_materialized_series();
        if !is_integer_dtype(series.dtype()) {
            continue;
        }

        let codes: Vec<Option<i64>> = series
            .cast(&DataType::Int64)?
            .i64()?
            .into_iter()
            .collect();
        if !is_ordinal_code_set(&codes) {
            continue;
        }

        let labels: Vec<Option<&str>> = codes
            .iter()
            .map(|code| code.and_then(level_for_code))
            .collect();
        // Cast from labels: a numeric cast would read the codes as category ids
        let replacement = Series::new(series.name().clone(), labels).cast(&dtype)?;
        frame.replace(&name, replacement)?;

        info!("Column '{}' mapped to ordered levels {:?}", name, ORDINAL_LEVELS);
        remapped.push(name);
    }

    Ok(remapped)
}
