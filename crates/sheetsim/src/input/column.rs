//! Column extraction from parsed tables.

use serde::{Deserialize, Serialize};

use super::source::DataTable;
use crate::error::{Result, SheetsimError};

/// An ordered sequence of display-string cells read from one source column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column header.
    pub name: String,
    /// Identifier of the source (file name or label).
    pub source_id: String,
    /// Cell values in row order.
    pub cells: Vec<String>,
}

/// Outcome of coercing the non-null cells of a column to numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericParse {
    /// Values that parsed as finite numbers, in row order.
    pub values: Vec<f64>,
    /// Number of non-null cells that did not parse.
    pub rejected: usize,
}

impl NumericParse {
    /// True when every non-null cell parsed and at least one was present.
    pub fn is_numeric(&self) -> bool {
        self.rejected == 0 && !self.values.is_empty()
    }

    /// True when some, but not all, non-null cells parsed.
    pub fn is_mixed(&self) -> bool {
        self.rejected > 0 && !self.values.is_empty()
    }
}

impl Column {
    /// Create a column from owned cells.
    pub fn new(name: impl Into<String>, source_id: impl Into<String>, cells: Vec<String>) -> Self {
        Self {
            name: name.into(),
            source_id: source_id.into(),
            cells,
        }
    }

    /// Create a column from anything yielding string-like values.
    pub fn from_values<I, S>(name: impl Into<String>, source_id: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, source_id, values.into_iter().map(Into::into).collect())
    }

    /// Number of cells, nulls included.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over all cells.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|s| s.as_str())
    }

    /// Iterate over cells that are not null markers.
    pub fn non_null_values(&self) -> impl Iterator<Item = &str> {
        self.values().filter(|v| !DataTable::is_null_value(v))
    }

    /// Count of null cells.
    pub fn null_count(&self) -> usize {
        self.values().filter(|v| DataTable::is_null_value(v)).count()
    }

    /// Coerce non-null cells to numbers.
    pub fn parse_numeric(&self) -> NumericParse {
        let mut values = Vec::new();
        let mut rejected = 0;
        for value in self.non_null_values() {
            match parse_number(value) {
                Some(n) => values.push(n),
                None => rejected += 1,
            }
        }
        NumericParse { values, rejected }
    }
}

/// Parse a trimmed cell as a finite number.
pub fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Read a named column out of a table.
///
/// Fails with [`SheetsimError::ColumnNotFound`] listing the table's headers
/// when the name is absent.
pub fn extract(table: &DataTable, column_name: &str) -> Result<Column> {
    let index = table
        .column_index(column_name)
        .ok_or_else(|| SheetsimError::ColumnNotFound {
            column: column_name.to_string(),
            source_id: table.source_id.clone(),
            available: table.headers.clone(),
        })?;

    let cells: Vec<String> = table.column_values(index).map(str::to_string).collect();

    tracing::debug!(
        source = %table.source_id,
        column = column_name,
        cells = cells.len(),
        "Extracted column"
    );

    Ok(Column::new(column_name, table.source_id.clone(), cells))
}
