//! Best-match search of one column against another.

use std::thread;

use serde::{Deserialize, Serialize};

use super::similarity::{canonical_ratio, canonical_tokens};
use crate::error::{Result, SheetsimError};
use crate::input::Column;

/// The closest counterpart found for one source value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Value from the source column.
    pub original: String,
    /// Best-scoring value from the target column.
    #[serde(rename = "match")]
    pub matched: String,
    /// Token-sort similarity in `[0, 100]`.
    pub score: f64,
}

/// Matcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Worker threads for the outer loop over the source column.
    pub workers: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self { workers: 1 }
    }
}

/// A target value with its canonical token form computed once.
struct Candidate<'a> {
    raw: &'a str,
    canonical: String,
}

/// Finds, for every value of a source column, the best counterpart in a target column.
pub struct FuzzyMatcher {
    config: MatcherConfig,
}

impl FuzzyMatcher {
    /// Create a matcher with default configuration.
    pub fn new() -> Self {
        Self {
            config: MatcherConfig::default(),
        }
    }

    /// Create a matcher with custom configuration.
    pub fn with_config(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// Match every value of `source` against the full population of `target`.
    ///
    /// Returns one record per source cell, in source order. Duplicates in
    /// `source` each get their own record. When several target values share
    /// the top score, the first one in target order wins.
    pub fn match_all(&self, source: &Column, target: &Column) -> Result<Vec<MatchRecord>> {
        if target.is_empty() {
            return Err(SheetsimError::EmptyTargetColumn {
                column: target.name.clone(),
            });
        }

        let candidates: Vec<Candidate<'_>> = target
            .values()
            .map(|raw| Candidate {
                raw,
                canonical: canonical_tokens(raw),
            })
            .collect();

        let workers = self.config.workers.max(1).min(source.len().max(1));

        let records = if workers == 1 {
            match_chunk(&source.cells, &candidates)
        } else {
            let chunk_size = source.len().div_ceil(workers);
            let candidates = &candidates;
            thread::scope(|scope| {
                let handles: Vec<_> = source
                    .cells
                    .chunks(chunk_size)
                    .map(|chunk| scope.spawn(move || match_chunk(chunk, candidates)))
                    .collect();

                // Chunks are joined in spawn order, preserving source order.
                let mut records = Vec::with_capacity(source.len());
                for handle in handles {
                    match handle.join() {
                        Ok(chunk) => records.extend(chunk),
                        Err(panic) => std::panic::resume_unwind(panic),
                    }
                }
                records
            })
        };

        tracing::debug!(
            source = %source.name,
            target = %target.name,
            records = records.len(),
            candidates = candidates.len(),
            workers,
            "Matched columns"
        );

        Ok(records)
    }
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Match a column against another with default settings.
pub fn match_all(source: &Column, target: &Column) -> Result<Vec<MatchRecord>> {
    FuzzyMatcher::new().match_all(source, target)
}

fn match_chunk(values: &[String], candidates: &[Candidate<'_>]) -> Vec<MatchRecord> {
    values
        .iter()
        .map(|value| {
            let (best, score) = best_candidate(value, candidates);
            MatchRecord {
                original: value.clone(),
                matched: best.to_string(),
                score,
            }
        })
        .collect()
}

/// Highest-scoring candidate; ties keep the earliest. `candidates` is non-empty.
fn best_candidate<'a>(value: &str, candidates: &[Candidate<'a>]) -> (&'a str, f64) {
    let query = canonical_tokens(value);
    let mut best = (candidates[0].raw, f64::NEG_INFINITY);

    for candidate in candidates {
        let score = canonical_ratio(&query, &candidate.canonical);
        if score > best.1 {
            best = (candidate.raw, score);
            if score >= 100.0 {
                break;
            }
        }
    }

    best
}
