//! Rule-based recommendations from aggregate similarity.
//!
//! Two rule families are evaluated on every call: one on the average score,
//! one on the share of highly similar items. Each yields exactly one
//! recommendation, so a call always produces two.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::aggregate::SimilarityAnalysis;

/// Cut-offs for the recommendation rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationThresholds {
    /// Average at or above which similarity is considered high.
    pub high_average: f64,
    /// Average at or above which similarity is considered moderate.
    pub moderate_average: f64,
    /// High-bucket share at or above which most items are similar.
    pub most_ratio: f64,
    /// High-bucket share at or above which about half the items are similar.
    pub half_ratio: f64,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            high_average: 85.0,
            moderate_average: 70.0,
            most_ratio: 0.8,
            half_ratio: 0.5,
        }
    }
}

/// How favorable a recommendation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Good,
    Caution,
    Problem,
}

impl Verdict {
    fn marker(&self) -> &'static str {
        match self {
            Verdict::Good => "✅",
            Verdict::Caution => "⚠️",
            Verdict::Problem => "❌",
        }
    }
}

/// A single textual judgment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub verdict: Verdict,
    pub message: String,
}

impl Recommendation {
    fn new(verdict: Verdict, message: impl Into<String>) -> Self {
        Self {
            verdict,
            message: message.into(),
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.verdict.marker(), self.message)
    }
}

/// Evaluates recommendation rules.
pub struct RecommendationEngine {
    thresholds: RecommendationThresholds,
}

impl RecommendationEngine {
    /// Create an engine with default thresholds.
    pub fn new() -> Self {
        Self::with_thresholds(RecommendationThresholds::default())
    }

    /// Create an engine with custom thresholds.
    pub fn with_thresholds(thresholds: RecommendationThresholds) -> Self {
        Self { thresholds }
    }

    /// Produce one recommendation per rule family.
    pub fn generate(&self, analysis: &SimilarityAnalysis) -> [Recommendation; 2] {
        [self.rate_average(analysis), self.rate_high_share(analysis)]
    }

    fn rate_average(&self, analysis: &SimilarityAnalysis) -> Recommendation {
        let avg = analysis.average_score;
        if avg >= self.thresholds.high_average {
            Recommendation::new(
                Verdict::Good,
                "High overall similarity - the data sets are very similar",
            )
        } else if avg >= self.thresholds.moderate_average {
            Recommendation::new(
                Verdict::Caution,
                "Moderate similarity - verify inconsistencies",
            )
        } else {
            Recommendation::new(
                Verdict::Problem,
                "Low similarity - possible problem in the data",
            )
        }
    }

    fn rate_high_share(&self, analysis: &SimilarityAnalysis) -> Recommendation {
        let ratio = analysis.high_ratio();
        if ratio >= self.thresholds.most_ratio {
            Recommendation::new(
                Verdict::Good,
                format!(
                    "At least {:.0}% of items are highly similar",
                    self.thresholds.most_ratio * 100.0
                ),
            )
        } else if ratio >= self.thresholds.half_ratio {
            Recommendation::new(Verdict::Caution, "Only about half of the items are highly similar")
        } else {
            Recommendation::new(Verdict::Problem, "Fewer than half of the items are highly similar")
        }
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Recommendations as display strings, using default thresholds.
pub fn recommend(analysis: &SimilarityAnalysis) -> Vec<String> {
    RecommendationEngine::new()
        .generate(analysis)
        .iter()
        .map(ToString::to_string)
        .collect()
}
