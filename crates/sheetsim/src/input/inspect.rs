//! Structural overview and validation of a tabular source.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

use super::column::extract;
use super::parser::Parser;
use super::source::{DataTable, SourceMetadata};
use crate::profile::{ColumnKind, NumericSummary, QuantileMethod, infer_kind};

/// Number of rows included as sample records.
const SAMPLE_ROWS: usize = 5;

/// Column-level overview of a parsed table.
#[derive(Debug, Clone, Serialize)]
pub struct TableOverview {
    pub source_id: String,
    pub columns: Vec<String>,
    pub rows: usize,
    pub data_types: IndexMap<String, ColumnKind>,
    /// First rows as header → value records.
    pub sample_data: Vec<IndexMap<String, String>>,
    /// Describe-style statistics for each numeric column.
    pub summary_stats: IndexMap<String, NumericSummary>,
}

impl TableOverview {
    /// Build an overview of `table`.
    pub fn from_table(table: &DataTable) -> Self {
        let mut data_types = IndexMap::new();
        let mut summary_stats = IndexMap::new();

        for name in &table.headers {
            let Ok(column) = extract(table, name) else {
                continue;
            };
            let kind = infer_kind(&column);
            if kind == ColumnKind::Numeric {
                let values = column.parse_numeric().values;
                if let Some(summary) = NumericSummary::from_values(&values, QuantileMethod::Linear)
                {
                    summary_stats.insert(name.clone(), summary);
                }
            }
            data_types.insert(name.clone(), kind);
        }

        let sample_data = table
            .rows
            .iter()
            .take(SAMPLE_ROWS)
            .map(|row| {
                table
                    .headers
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect();

        Self {
            source_id: table.source_id.clone(),
            columns: table.headers.clone(),
            rows: table.row_count(),
            data_types,
            sample_data,
            summary_stats,
        }
    }
}

/// Result of checking whether a file is a usable tabular source.
#[derive(Debug, Clone, Serialize)]
pub struct SourceValidation {
    pub is_valid: bool,
    pub file_path: PathBuf,
    pub total_rows: usize,
    pub total_columns: usize,
    pub columns: Vec<String>,
    pub data_types: IndexMap<String, ColumnKind>,
    pub null_counts: IndexMap<String, usize>,
    pub duplicate_rows: usize,
    pub size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceValidation {
    /// Parse `path` and report its structure. Never fails: a source that
    /// cannot be read yields `is_valid == false` with the error text.
    pub fn inspect(path: impl AsRef<Path>, parser: &Parser) -> Self {
        let path = path.as_ref();
        match parser.parse_file(path) {
            Ok((table, metadata)) => Self::from_table(&table, &metadata),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Source failed validation");
                Self::unreadable(path, e)
            }
        }
    }

    /// Report the structure of an already-parsed source.
    pub fn from_table(table: &DataTable, metadata: &SourceMetadata) -> Self {
        let mut data_types = IndexMap::new();
        let mut null_counts = IndexMap::new();
        for name in &table.headers {
            if let Ok(column) = extract(table, name) {
                data_types.insert(name.clone(), infer_kind(&column));
                null_counts.insert(name.clone(), column.null_count());
            }
        }

        let file_path = metadata
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(&metadata.source_id));

        Self {
            is_valid: true,
            file_path,
            total_rows: table.row_count(),
            total_columns: table.column_count(),
            columns: table.headers.clone(),
            data_types,
            null_counts,
            duplicate_rows: table.duplicate_row_count(),
            size_bytes: metadata.size_bytes,
            hash: Some(metadata.hash.clone()),
            error: None,
        }
    }

    /// A failed validation of `path` carrying the error text.
    pub fn unreadable(path: impl AsRef<Path>, error: impl ToString) -> Self {
        Self {
            is_valid: false,
            file_path: path.as_ref().to_path_buf(),
            total_rows: 0,
            total_columns: 0,
            columns: Vec::new(),
            data_types: IndexMap::new(),
            null_counts: IndexMap::new(),
            duplicate_rows: 0,
            size_bytes: 0,
            hash: None,
            error: Some(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MATERIALS: &str = "Material,Quantidade,Unidade\n\
                             Cimento Portland CP-II,50,sacos\n\
                             Areia Média,100,m³\n\
                             Brita 1,,m³\n\
                             Areia Média,100,m³\n";

    fn create_test_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_overview() {
        let (table, _) = Parser::new().parse_str("materials.csv", MATERIALS).unwrap();
        let overview = TableOverview::from_table(&table);

        assert_eq!(overview.rows, 4);
        assert_eq!(overview.columns, vec!["Material", "Quantidade", "Unidade"]);
        assert_eq!(overview.data_types["Quantidade"], ColumnKind::Numeric);
        assert_eq!(overview.data_types["Material"], ColumnKind::Text);
        assert_eq!(overview.sample_data.len(), 4);
        assert_eq!(overview.sample_data[1]["Material"], "Areia Média");

        let stats = &overview.summary_stats["Quantidade"];
        assert_eq!(stats.count, 3);
        assert_eq!(stats.max, 100.0);
        assert!(!overview.summary_stats.contains_key("Material"));
    }

    #[test]
    fn test_validation_of_valid_file() {
        let file = create_test_file(MATERIALS.as_bytes());
        let validation = SourceValidation::inspect(file.path(), &Parser::new());

        assert!(validation.is_valid);
        assert_eq!(validation.total_rows, 4);
        assert_eq!(validation.total_columns, 3);
        assert_eq!(validation.null_counts["Quantidade"], 1);
        assert_eq!(validation.duplicate_rows, 1);
        assert!(validation.error.is_none());
        assert!(validation.size_bytes > 0);
    }

    #[test]
    fn test_validation_of_unreadable_file() {
        let file = create_test_file(b"");
        let validation = SourceValidation::inspect(file.path(), &Parser::new());

        assert!(!validation.is_valid);
        assert!(validation.error.is_some());
        assert_eq!(validation.total_rows, 0);
    }

    #[test]
    fn test_validation_from_parsed_table_matches_inspect() {
        let file = create_test_file(MATERIALS.as_bytes());
        let parser = Parser::new();

        let (table, metadata) = parser.parse_file(file.path()).unwrap();
        let parsed = SourceValidation::from_table(&table, &metadata);
        let inspected = SourceValidation::inspect(file.path(), &parser);

        assert_eq!(parsed.file_path, file.path());
        assert_eq!(
            serde_json::to_value(&parsed).unwrap(),
            serde_json::to_value(&inspected).unwrap()
        );
    }

    #[test]
    fn test_validation_of_in_memory_source() {
        let (table, metadata) = Parser::new().parse_str("materials.csv", MATERIALS).unwrap();
        let validation = SourceValidation::from_table(&table, &metadata);

        assert!(validation.is_valid);
        assert_eq!(validation.file_path, PathBuf::from("materials.csv"));
        assert_eq!(validation.data_types["Unidade"], ColumnKind::Text);
    }
}
