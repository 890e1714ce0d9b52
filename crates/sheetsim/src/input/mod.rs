//! Input parsing, column extraction, and source inspection.

mod column;
mod inspect;
mod parser;
mod source;
mod workbook;

pub use column::{Column, NumericParse, extract, parse_number};
pub use inspect::{SourceValidation, TableOverview};
pub use parser::{Parser, ParserConfig};
pub use source::{DataTable, SourceMetadata};
