//! Error types for the sheetsim library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sheetsim operations.
#[derive(Debug, Error)]
pub enum SheetsimError {
    /// The requested column does not exist in the source.
    #[error("Column '{column}' not found in '{source_id}'. Available columns: {}", available.join(", "))]
    ColumnNotFound {
        column: String,
        source_id: String,
        available: Vec<String>,
    },

    /// The tabular source could not be parsed.
    #[error("Cannot read tabular source '{source_id}': {reason}")]
    SourceUnreadable { source_id: String, reason: String },

    /// The comparison target column has no rows.
    #[error("Target column '{column}' is empty; nothing to match against")]
    EmptyTargetColumn { column: String },

    /// Aggregation over zero inputs.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// A column mixes numeric and non-numeric cells under strict type inference.
    #[error("Column '{column}' is ambiguous: {numeric} of {total} non-null values are numeric")]
    UnsupportedColumnType {
        column: String,
        numeric: usize,
        total: usize,
    },

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SheetsimError {
    /// Wrap a CSV failure for the given source.
    pub(crate) fn unreadable(source_id: impl Into<String>, reason: impl ToString) -> Self {
        SheetsimError::SourceUnreadable {
            source_id: source_id.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for sheetsim operations.
pub type Result<T> = std::result::Result<T, SheetsimError>;
