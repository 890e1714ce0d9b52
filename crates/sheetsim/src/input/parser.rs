//! CSV/TSV and workbook parser with delimiter detection.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::source::{DataTable, SourceMetadata};
use super::workbook::{read_sheet, workbook_format};
use crate::error::{Result, SheetsimError};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
    /// Worksheet to read from workbooks (None = first sheet).
    pub sheet: Option<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
            sheet: None,
        }
    }
}

/// Parses tabular data files.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the data table and metadata.
    ///
    /// Workbook extensions (xlsx, xlsm, xlsb, xls, ods) are read as
    /// spreadsheets; anything else as delimited text.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();

        let contents = fs::read(path).map_err(|e| SheetsimError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let source_id = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let (table, mut metadata) = match workbook_format(path) {
            Some(format) => self.parse_workbook(source_id, format, &contents)?,
            None => self.parse_bytes(source_id, &contents)?,
        };
        metadata.path = Some(path.to_path_buf());
        Ok((table, metadata))
    }

    /// Parse an in-memory buffer identified by `source_id`.
    pub fn parse_bytes(
        &self,
        source_id: impl Into<String>,
        bytes: &[u8],
    ) -> Result<(DataTable, SourceMetadata)> {
        let source_id = source_id.into();

        let hash = content_hash(bytes);

        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(body).ok_or_else(|| {
                SheetsimError::unreadable(&source_id, "no non-empty lines to analyze")
            })?,
        };

        let table = self.read_table(&source_id, body, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        tracing::debug!(
            source = %source_id,
            rows = table.row_count(),
            columns = table.column_count(),
            format = %format,
            "Parsed tabular source"
        );

        let metadata = SourceMetadata::new(
            source_id,
            None,
            hash,
            bytes.len() as u64,
            format,
            table.row_count(),
            table.column_count(),
        );

        Ok((table, metadata))
    }

    /// Parse an in-memory workbook of the given format (e.g. "xlsx").
    pub fn parse_workbook(
        &self,
        source_id: impl Into<String>,
        format: &str,
        bytes: &[u8],
    ) -> Result<(DataTable, SourceMetadata)> {
        let source_id = source_id.into();
        let hash = content_hash(bytes);

        let rows = read_sheet(bytes, self.config.sheet.as_deref())
            .map_err(|reason| SheetsimError::unreadable(&source_id, reason))?;
        let mut rows = rows.into_iter();
        let first = rows
            .next()
            .ok_or_else(|| SheetsimError::unreadable(&source_id, "sheet is empty"))?;

        let records: Box<dyn Iterator<Item = Result<Vec<String>>>> = if self.config.has_header {
            Box::new(rows.map(Ok))
        } else {
            Box::new(std::iter::once(first.clone()).chain(rows).map(Ok))
        };
        let table = self.assemble(&source_id, &first, records, None)?;

        tracing::debug!(
            source = %source_id,
            rows = table.row_count(),
            columns = table.column_count(),
            format = %format,
            sheet = self.config.sheet.as_deref().unwrap_or("<first>"),
            "Parsed workbook"
        );

        let metadata = SourceMetadata::new(
            source_id,
            None,
            hash,
            bytes.len() as u64,
            format.to_string(),
            table.row_count(),
            table.column_count(),
        );

        Ok((table, metadata))
    }

    /// Parse a string directly, e.g. an already-loaded sheet export.
    pub fn parse_str(
        &self,
        source_id: impl Into<String>,
        text: &str,
    ) -> Result<(DataTable, SourceMetadata)> {
        self.parse_bytes(source_id, text.as_bytes())
    }

    fn read_table(&self, source_id: &str, bytes: &[u8], delimiter: u8) -> Result<DataTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        // Without a header row, `headers()` peeks at the first record.
        let first: Vec<String> = reader
            .headers()
            .map_err(|e| SheetsimError::unreadable(source_id, e))?
            .iter()
            .map(str::to_string)
            .collect();

        let records = reader.records().map(|result| {
            result
                .map(|record| record.iter().map(str::to_string).collect())
                .map_err(|e| SheetsimError::unreadable(source_id, e))
        });

        self.assemble(source_id, &first, records, Some(delimiter))
    }

    /// Build a table from a header (or first) row and the data records.
    fn assemble<I>(
        &self,
        source_id: &str,
        first: &[String],
        records: I,
        delimiter: Option<u8>,
    ) -> Result<DataTable>
    where
        I: Iterator<Item = Result<Vec<String>>>,
    {
        let headers: Vec<String> = if self.config.has_header {
            first.iter().map(|s| s.trim().to_string()).collect()
        } else {
            (0..first.len()).map(|i| format!("column_{}", i + 1)).collect()
        };

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(SheetsimError::unreadable(source_id, "no columns found"));
        }

        let expected_cols = headers.len();
        let mut rows = Vec::new();

        for (row_idx, record) in records.enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }

            let mut row = record?;

            // Pad short rows and drop overflow cells.
            row.resize(expected_cols, String::new());

            rows.push(row);
        }

        Ok(DataTable::new(source_id, headers, rows, delimiter))
    }
}

fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("sha256:{:x}", hasher.finalize())
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Option<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .map_while(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return None;
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Higher count with lower variance wins; tabs are rarer inside data.
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Some(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
