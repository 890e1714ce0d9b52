//! Fuzzy correspondence between two columns.

mod matcher;
mod similarity;

pub use matcher::{FuzzyMatcher, MatchRecord, MatcherConfig, match_all};
pub use similarity::{canonical_tokens, normalize, token_sort_ratio};
