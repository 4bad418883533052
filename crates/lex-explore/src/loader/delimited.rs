//! Delimited text input.

use crate::error::Result;
use crate::utils::MISSING_MARKERS;
use polars::io::csv::read::{CsvEncoding, CsvParseOptions, CsvReadOptions, NullValues};
use polars::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Separators tried by [`sniff_separator`], in tie-break order.
const CANDIDATE_SEPARATORS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Guess the field separator from the header line.
///
/// Counts each candidate outside double quotes and returns the most frequent
/// one. Falls back to `,` when none occurs.
pub fn sniff_separator(header: &[u8]) -> u8 {
    let mut counts = [0usize; CANDIDATE_SEPARATORS.len()];
    let mut in_quotes = false;

    for byte in header {
        if *byte == b'"' {
            in_quotes = !in_quotes;
            continue;
        }
        if in_quotes {
            continue;
        }
        if let Some(idx) = CANDIDATE_SEPARATORS.iter().position(|c| c == byte) {
            counts[idx] += 1;
        }
    }

    let mut best = 0;
    for idx in 1..counts.len() {
        if counts[idx] > counts[best] {
            best = idx;
        }
    }

    if counts[best] == 0 {
        b','
    } else {
        CANDIDATE_SEPARATORS[best]
    }
}

fn read_header_line(path: &Path) -> Result<Vec<u8>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut line = Vec::new();
    reader.read_until(b'\n', &mut line)?;
    Ok(line)
}

fn read_with(
    path: &Path,
    separator: u8,
    encoding: CsvEncoding,
    infer_schema_length: usize,
) -> PolarsResult<DataFrame> {
    let null_values = NullValues::AllColumns(
        MISSING_MARKERS
            .iter()
            .map(|marker| PlSmallStr::from(*marker))
            .collect(),
    );

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(infer_schema_length))
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(separator)
                .with_quote_char(Some(b'"'))
                .with_encoding(encoding)
                .with_null_values(Some(null_values)),
        )
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
}

/// Read a delimited file, retrying with lossy decoding if strict UTF-8 fails.
pub(crate) fn read_delimited(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    let separator = sniff_separator(&read_header_line(path)?);
    debug!(
        "Reading {} with separator {:?}",
        path.display(),
        separator as char
    );

    match read_with(path, separator, CsvEncoding::Utf8, infer_schema_length) {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Strict UTF-8 read failed: {}", e);
        }
    }

    Ok(read_with(
        path,
        separator,
        CsvEncoding::LossyUtf8,
        infer_schema_length,
    )?)
}
