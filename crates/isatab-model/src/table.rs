use serde::{Deserialize, Serialize};

use crate::headers::strip_duplicate_suffix;

/// A loaded tabular file: an ordered header row plus string data rows.
///
/// Cells are kept as trimmed strings; a missing value is the empty string.
/// Repeated headers carry a `.<n>` suffix assigned by the reader, so
/// lookups here compare against the base header with the suffix stripped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub file_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(file_name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            file_name: file_name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Base header (duplicate suffix stripped) at the given column.
    pub fn base_header(&self, col: usize) -> &str {
        self.headers
            .get(col)
            .map(|h| strip_duplicate_suffix(h))
            .unwrap_or("")
    }

    /// Index of the first column whose base header matches.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| strip_duplicate_suffix(h) == header)
    }

    /// Indices of every column whose base header matches.
    pub fn column_indices(&self, header: &str) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .filter(|(_, h)| strip_duplicate_suffix(h) == header)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Cell value at (row, col); out-of-range positions read as empty.
    pub fn value(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// All values of one column, one entry per data row.
    pub fn column_values(&self, col: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(col).map(String::as_str).unwrap_or(""))
    }

    /// First data-row value under the first column matching `header`.
    pub fn first_value(&self, header: &str) -> Option<&str> {
        let col = self.column_index(header)?;
        self.rows.first().map(|row| {
            row.get(col).map(String::as_str).unwrap_or("")
        })
    }
}
