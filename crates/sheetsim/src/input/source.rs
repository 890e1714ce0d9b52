//! Data source abstraction and metadata.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about a parsed tabular source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Identifier used in reports (file name, or a caller-chosen label).
    pub source_id: String,
    /// Full path when the source came from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// SHA-256 hash of the raw bytes.
    pub hash: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the source was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a source that has been parsed.
    pub fn new(
        source_id: String,
        path: Option<PathBuf>,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        Self {
            source_id,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// Represents parsed tabular data.
#[derive(Debug, Clone)]
pub struct DataTable {
    /// Identifier of the source this table was read from.
    pub source_id: String,
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
    /// The delimiter used; `None` for workbook sheets.
    pub delimiter: Option<u8>,
}

impl DataTable {
    /// Create a new data table.
    pub fn new(
        source_id: impl Into<String>,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        delimiter: Option<u8>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            headers,
            rows,
            delimiter,
        }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column by exact header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Get a column by name.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.column_index(name)?;
        Some(self.column_values(index).collect())
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Number of rows that exactly repeat an earlier row.
    pub fn duplicate_row_count(&self) -> usize {
        let mut seen: HashSet<&[String]> = HashSet::new();
        self.rows
            .iter()
            .filter(|row| !seen.insert(row.as_slice()))
            .count()
    }

    /// Check if a value represents a missing/null value.
    pub fn is_null_value(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("nil")
            || trimmed == "."
            || trimmed == "-"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: Vec<Vec<&str>>) -> DataTable {
        DataTable::new(
            "test.csv",
            vec!["a".to_string(), "b".to_string()],
            rows.into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
            Some(b','),
        )
    }

    #[test]
    fn test_duplicate_rows() {
        let t = table(vec![vec!["1", "x"], vec!["2", "y"], vec!["1", "x"], vec!["1", "x"]]);
        assert_eq!(t.duplicate_row_count(), 2);
    }

    #[test]
    fn test_column_by_name() {
        let t = table(vec![vec!["1", "x"], vec!["2", "y"]]);
        assert_eq!(t.column_by_name("b"), Some(vec!["x", "y"]));
        assert_eq!(t.column_by_name("c"), None);
    }
}
