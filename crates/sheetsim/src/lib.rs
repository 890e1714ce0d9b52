//! Sheetsim: fuzzy comparison and pattern profiling of spreadsheet columns.
//!
//! Given one column from each of two tabular sources, sheetsim finds the best
//! counterpart in the second column for every value of the first, summarizes
//! how similar the columns are, profiles each column, and renders a
//! human-readable report.
//!
//! # Pipeline
//!
//! - **Extract**: parse CSV/TSV or workbook sources and pull out named columns
//! - **Match**: score every pair with a token-sort ratio and keep the best
//! - **Aggregate**: mean, median, extremes, and high/medium/low buckets
//! - **Profile**: text length and affix patterns, or numeric range and outliers
//! - **Report**: recommendations plus a deterministic Markdown report
//!
//! # Example
//!
//! ```no_run
//! use sheetsim::Comparator;
//!
//! let result = Comparator::new()
//!     .compare_files("budget_2023.csv", "Material", "budget_2024.csv", "Item")
//!     .unwrap();
//!
//! println!("Average score: {:.2}", result.similarity_analysis.average_score);
//! println!("{}", result.report);
//! ```

pub mod analysis;
pub mod error;
pub mod input;
pub mod matching;
pub mod profile;
pub mod report;

mod comparison;

pub use crate::comparison::{ComparisonConfig, ComparisonResult, Comparator, MatchDetail};
pub use analysis::{SimilarityAnalysis, SimilarityThresholds, aggregate, recommend};
pub use error::{Result, SheetsimError};
pub use input::{Column, DataTable, Parser, SourceMetadata, SourceValidation, TableOverview, extract};
pub use matching::{FuzzyMatcher, MatchRecord, match_all, token_sort_ratio};
pub use profile::{PatternProfile, PatternProfiler, profile};
pub use report::{ReportInput, render};
