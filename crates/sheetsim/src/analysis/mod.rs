//! Aggregate similarity statistics and recommendations.

mod aggregate;
mod recommend;

pub use aggregate::{
    SimilarityAnalysis, SimilarityBucket, SimilarityThresholds, aggregate, aggregate_with,
};
pub use recommend::{
    Recommendation, RecommendationEngine, RecommendationThresholds, Verdict, recommend,
};
