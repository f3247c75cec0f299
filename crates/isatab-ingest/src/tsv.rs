//! Tab-separated table reading.
//!
//! Study and assay tables are plain TSV files with one header row. Cells
//! are trimmed and BOM-stripped; fully empty lines are skipped. Repeated
//! headers are disambiguated with a `.<n>` suffix so that every column
//! keeps a distinct name while lookups can still match the base header.

use std::collections::BTreeMap;
use std::path::Path;

use csv::ReaderBuilder;

use isatab_model::Table;

use crate::error::{IngestError, Result};

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Append `.<n>` to the second and later occurrences of a header.
fn dedup_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut headers = Vec::with_capacity(raw.len());
    for header in raw {
        let count = seen.entry(header.clone()).or_insert(0);
        if *count == 0 {
            headers.push(header);
        } else {
            headers.push(format!("{header}.{count}"));
        }
        *count += 1;
    }
    headers
}

/// Read all rows of a tab-delimited file, trimmed, empty lines dropped.
pub(crate) fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| match source.into_kind() {
            csv::ErrorKind::Io(io) => IngestError::io(path, io),
            other => IngestError::tsv(path, format!("{other:?}")),
        })?;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::tsv(path, source.to_string()))?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(|value| value.is_empty()) {
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Read a study or assay table: first non-empty row is the header row.
pub fn read_table(path: &Path) -> Result<Table> {
    let raw_rows = read_rows(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let Some((header_row, data_rows)) = raw_rows.split_first() else {
        return Ok(Table::new(file_name, Vec::new()));
    };
    let headers = dedup_headers(header_row.clone());
    let mut table = Table::new(file_name, headers);
    for record in data_rows {
        let mut row = Vec::with_capacity(table.headers.len());
        for idx in 0..table.headers.len() {
            row.push(record.get(idx).cloned().unwrap_or_default());
        }
        table.rows.push(row);
    }
    tracing::debug!(
        file = %table.file_name,
        columns = table.headers.len(),
        rows = table.rows.len(),
        "loaded table"
    );
    Ok(table)
}
