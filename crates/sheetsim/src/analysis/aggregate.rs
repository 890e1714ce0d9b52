//! Reduction of match scores into summary statistics and severity buckets.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetsimError};
use crate::matching::MatchRecord;

/// Bucket edges for similarity scores.
///
/// Buckets are half-open: `score >= high` is high, `medium <= score < high`
/// is medium, anything below `medium` is low.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for SimilarityThresholds {
    fn default() -> Self {
        Self {
            high: 80.0,
            medium: 50.0,
        }
    }
}

impl SimilarityThresholds {
    /// Assign a score to its bucket.
    pub fn bucket(&self, score: f64) -> SimilarityBucket {
        if score >= self.high {
            SimilarityBucket::High
        } else if score >= self.medium {
            SimilarityBucket::Medium
        } else {
            SimilarityBucket::Low
        }
    }
}

/// Severity bucket of a single match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityBucket {
    High,
    Medium,
    Low,
}

/// Aggregate statistics over all match records of one comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityAnalysis {
    pub average_score: f64,
    pub median_score: f64,
    pub max_score: f64,
    pub min_score: f64,
    pub high_similarity_count: usize,
    pub medium_similarity_count: usize,
    pub low_similarity_count: usize,
}

impl SimilarityAnalysis {
    /// Number of records the analysis was built from.
    pub fn total(&self) -> usize {
        self.high_similarity_count + self.medium_similarity_count + self.low_similarity_count
    }

    /// Share of records in the high bucket (0.0 when empty).
    pub fn high_ratio(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.high_similarity_count as f64 / total as f64,
        }
    }
}

/// Running mean/min/max using Welford's update.
#[derive(Debug, Clone)]
struct RunningStats {
    count: usize,
    mean: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn add(&mut self, value: f64) {
        self.count += 1;
        self.mean += (value - self.mean) / self.count as f64;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }
}

/// Median of a non-empty slice; averages the middle pair for even lengths.
pub(crate) fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Aggregate records with the default bucket edges.
pub fn aggregate(records: &[MatchRecord]) -> Result<SimilarityAnalysis> {
    aggregate_with(records, &SimilarityThresholds::default())
}

/// Aggregate records into a [`SimilarityAnalysis`].
///
/// Fails with [`SheetsimError::EmptyInput`] when `records` is empty.
pub fn aggregate_with(
    records: &[MatchRecord],
    thresholds: &SimilarityThresholds,
) -> Result<SimilarityAnalysis> {
    if records.is_empty() {
        return Err(SheetsimError::EmptyInput(
            "cannot aggregate zero match records".to_string(),
        ));
    }

    let mut stats = RunningStats::new();
    let (mut high, mut medium, mut low) = (0, 0, 0);
    let mut scores = Vec::with_capacity(records.len());

    for record in records {
        stats.add(record.score);
        scores.push(record.score);
        match thresholds.bucket(record.score) {
            SimilarityBucket::High => high += 1,
            SimilarityBucket::Medium => medium += 1,
            SimilarityBucket::Low => low += 1,
        }
    }

    Ok(SimilarityAnalysis {
        average_score: stats.mean,
        median_score: median(&scores),
        max_score: stats.max,
        min_score: stats.min,
        high_similarity_count: high,
        medium_similarity_count: medium,
        low_similarity_count: low,
    })
}
