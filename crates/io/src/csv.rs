// CSV/TSV import

use std::path::Path;

use datalens_engine::{Column, Table};
use log::{debug, warn};

use crate::encoding::{self, DecodePath};
use crate::error::LoadError;
use crate::infer::{infer_column, unique_header_names};
use crate::options::LoadOptions;

/// A parsed delimited file plus how its bytes were decoded.
#[derive(Debug)]
pub struct CsvImport {
    pub table: Table,
    pub encoding: &'static str,
    pub decode_path: DecodePath,
    pub delimiter: u8,
}

/// Import a delimited file. `default_delimiter` is used when the options do
/// not pin one; with neither, the delimiter is sniffed.
pub fn import(
    path: &Path,
    default_delimiter: Option<u8>,
    options: &LoadOptions,
) -> Result<CsvImport, LoadError> {
    let bytes = std::fs::read(path)?;
    let decoded = encoding::decode(&bytes, options);

    let delimiter = match options.delimiter {
        Some(c) if c.is_ascii() => c as u8,
        Some(c) => {
            return Err(LoadError::malformed(format!(
                "delimiter '{c}' is not a single-byte character"
            )))
        }
        None => default_delimiter.unwrap_or_else(|| sniff_delimiter(&decoded.text)),
    };
    debug!("delimiter {:?}", delimiter as char);

    let table = import_from_string(&decoded.text, delimiter, options)?;
    Ok(CsvImport {
        table,
        encoding: decoded.encoding,
        decode_path: decoded.path,
        delimiter,
    })
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Header line must split into more than one field
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Lines agreeing with the header's field count, weighted by that count
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Parse decoded text. First record is the header.
pub fn import_from_string(
    content: &str,
    delimiter: u8,
    options: &LoadOptions,
) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());
    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => record?,
        None => return Err(LoadError::malformed("no columns to parse")),
    };
    let names = unique_header_names(header.iter());
    let width = names.len();

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
    let mut padded = 0usize;

    for result in records {
        let record = result?;
        if record.len() > width {
            let line = record.position().map_or(0, |p| p.line());
            return Err(LoadError::malformed_at(
                line,
                format!("expected {width} fields, saw {}", record.len()),
            ));
        }
        if record.len() < width {
            padded += 1;
        }
        for (col, column) in cells.iter_mut().enumerate() {
            let cell = record
                .get(col)
                .filter(|field| !options.is_null_token(field))
                .map(str::to_string);
            column.push(cell);
        }
    }

    if padded > 0 {
        warn!("{padded} short row(s) padded with nulls");
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name, infer_column(values)))
        .collect();
    Ok(Table::new(columns)?)
}
