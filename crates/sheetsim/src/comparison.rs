//! End-to-end comparison of two columns.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::analysis::{
    RecommendationEngine, RecommendationThresholds, SimilarityAnalysis, SimilarityThresholds,
    aggregate_with,
};
use crate::error::{Result, SheetsimError};
use crate::input::{Column, DataTable, Parser, ParserConfig, extract};
use crate::matching::{FuzzyMatcher, MatchRecord, MatcherConfig};
use crate::profile::{PatternProfile, PatternProfiler, ProfileConfig};
use crate::report::{ReportConfig, ReportInput, SourceInfo, render};

/// Configuration for a full comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    pub parser: ParserConfig,
    pub matcher: MatcherConfig,
    pub similarity: SimilarityThresholds,
    pub recommendations: RecommendationThresholds,
    pub profile: ProfileConfig,
    pub report: ReportConfig,
    /// Profile both columns and include the profiles in the result.
    pub profile_columns: bool,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            matcher: MatcherConfig::default(),
            similarity: SimilarityThresholds::default(),
            recommendations: RecommendationThresholds::default(),
            profile: ProfileConfig::default(),
            report: ReportConfig::default(),
            profile_columns: true,
        }
    }
}

impl ComparisonConfig {
    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| SheetsimError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&json)
    }

    /// Reject values no comparison can run with.
    pub fn validate(&self) -> Result<()> {
        let s = &self.similarity;
        if !(0.0..=100.0).contains(&s.medium) || !(0.0..=100.0).contains(&s.high) {
            return Err(config_error("similarity thresholds must lie in [0, 100]"));
        }
        if s.high < s.medium {
            return Err(config_error(format!(
                "similarity.high ({}) must not be below similarity.medium ({})",
                s.high, s.medium
            )));
        }

        let r = &self.recommendations;
        if r.high_average < r.moderate_average {
            return Err(config_error(
                "recommendations.high_average must not be below moderate_average",
            ));
        }
        if !(0.0..=1.0).contains(&r.half_ratio)
            || !(0.0..=1.0).contains(&r.most_ratio)
            || r.most_ratio < r.half_ratio
        {
            return Err(config_error(
                "recommendation ratios must satisfy 0 <= half_ratio <= most_ratio <= 1",
            ));
        }

        let p = &self.profile;
        if !p.outlier_multiplier.is_finite() || p.outlier_multiplier < 0.0 {
            return Err(config_error("profile.outlier_multiplier must be non-negative"));
        }
        if !(p.affix_min_frequency > 0.0 && p.affix_min_frequency <= 1.0) {
            return Err(config_error("profile.affix_min_frequency must lie in (0, 1]"));
        }

        if self.matcher.workers == 0 {
            return Err(config_error("matcher.workers must be at least 1"));
        }
        if self.report.top_n == 0 {
            return Err(config_error("report.top_n must be at least 1"));
        }
        Ok(())
    }
}

fn config_error(msg: impl Into<String>) -> SheetsimError {
    SheetsimError::Config(msg.into())
}

/// Best match and score for one distinct source value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetail {
    #[serde(rename = "match")]
    pub matched: String,
    pub score: f64,
}

/// Everything a comparison produces.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    pub file1_info: SourceInfo,
    pub file2_info: SourceInfo,
    pub similarity_analysis: SimilarityAnalysis,
    /// Distinct source values in first-occurrence order.
    pub detailed_matches: IndexMap<String, MatchDetail>,
    /// One record per source row.
    #[serde(skip)]
    pub matches: Vec<MatchRecord>,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file1_patterns: Option<PatternProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file2_patterns: Option<PatternProfile>,
    pub report: String,
}

impl ComparisonResult {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs extraction, matching, aggregation, profiling, and reporting.
pub struct Comparator {
    config: ComparisonConfig,
    parser: Parser,
    matcher: FuzzyMatcher,
    profiler: PatternProfiler,
    recommender: RecommendationEngine,
    generated_at: Option<DateTime<Utc>>,
}

impl Comparator {
    /// Create a comparator with default configuration.
    pub fn new() -> Self {
        Self::with_config(ComparisonConfig::default())
    }

    /// Create a comparator with custom configuration.
    pub fn with_config(config: ComparisonConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        let matcher = FuzzyMatcher::with_config(config.matcher.clone());
        let profiler = PatternProfiler::with_config(config.profile.clone());
        let recommender = RecommendationEngine::with_thresholds(config.recommendations.clone());

        Self {
            config,
            parser,
            matcher,
            profiler,
            recommender,
            generated_at: None,
        }
    }

    /// Stamp rendered reports with `at`.
    pub fn with_generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    pub fn config(&self) -> &ComparisonConfig {
        &self.config
    }

    /// Parse two files and compare one column of each.
    pub fn compare_files(
        &self,
        path1: impl AsRef<Path>,
        column1: &str,
        path2: impl AsRef<Path>,
        column2: &str,
    ) -> Result<ComparisonResult> {
        let (table1, _) = self.parser.parse_file(path1)?;
        let (table2, _) = self.parser.parse_file(path2)?;
        self.compare_tables(&table1, column1, &table2, column2)
    }

    /// Compare a column of each of two parsed tables.
    pub fn compare_tables(
        &self,
        table1: &DataTable,
        column1: &str,
        table2: &DataTable,
        column2: &str,
    ) -> Result<ComparisonResult> {
        let source = extract(table1, column1)?;
        let target = extract(table2, column2)?;
        self.compare_columns(&source, &target)
    }

    /// Match every value of `source` against `target` and summarize.
    pub fn compare_columns(&self, source: &Column, target: &Column) -> Result<ComparisonResult> {
        self.config.validate()?;

        let matches = self.matcher.match_all(source, target)?;
        let similarity_analysis = aggregate_with(&matches, &self.config.similarity)?;

        let (file1_patterns, file2_patterns) = if self.config.profile_columns {
            (
                Some(self.profiler.profile(source)?),
                Some(self.profiler.profile(target)?),
            )
        } else {
            (None, None)
        };

        let recommendations: Vec<String> = self
            .recommender
            .generate(&similarity_analysis)
            .iter()
            .map(ToString::to_string)
            .collect();

        let mut detailed_matches = IndexMap::new();
        for record in &matches {
            detailed_matches
                .entry(record.original.clone())
                .or_insert_with(|| MatchDetail {
                    matched: record.matched.clone(),
                    score: record.score,
                });
        }

        let file1_info = source_info(source);
        let file2_info = source_info(target);

        let report = render(
            &ReportInput {
                file1: &file1_info,
                file2: &file2_info,
                analysis: &similarity_analysis,
                thresholds: &self.config.similarity,
                file1_patterns: file1_patterns.as_ref(),
                file2_patterns: file2_patterns.as_ref(),
                recommendations: &recommendations,
                matches: &matches,
                generated_at: self.generated_at,
            },
            &self.config.report,
        );

        tracing::info!(
            file1 = %file1_info.file,
            column1 = %file1_info.column,
            file2 = %file2_info.file,
            column2 = %file2_info.column,
            matches = matches.len(),
            average = similarity_analysis.average_score,
            high = similarity_analysis.high_similarity_count,
            "Comparison complete"
        );

        Ok(ComparisonResult {
            file1_info,
            file2_info,
            similarity_analysis,
            detailed_matches,
            matches,
            recommendations,
            file1_patterns,
            file2_patterns,
            report,
        })
    }

    /// Parse a file and profile one of its columns.
    pub fn profile_file(&self, path: impl AsRef<Path>, column: &str) -> Result<PatternProfile> {
        let (table, _) = self.parser.parse_file(path)?;
        let column = extract(&table, column)?;
        self.profiler.profile(&column)
    }
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new()
    }
}

fn source_info(column: &Column) -> SourceInfo {
    SourceInfo {
        file: column.source_id.clone(),
        column: column.name.clone(),
        total_items: column.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn materials() -> (DataTable, DataTable) {
        let parser = Parser::new();
        let (old, _) = parser
            .parse_str(
                "old.csv",
                "Material,Qty\nCimento Portland,10\nAreia Média,20\nCimento Portland,5\n",
            )
            .unwrap();
        let (new, _) = parser
            .parse_str(
                "new.csv",
                "Item;Unit\nCimento Portland CP-II;sacos\nAreia Fina;m3\n",
            )
            .unwrap();
        (old, new)
    }

    #[test]
    fn test_compare_tables() {
        let (old, new) = materials();
        let result = Comparator::new()
            .compare_tables(&old, "Material", &new, "Item")
            .unwrap();

        assert_eq!(result.matches.len(), 3);
        assert_eq!(result.detailed_matches.len(), 2);
        let first = &result.detailed_matches["Cimento Portland"];
        assert_eq!(first.matched, "Cimento Portland CP-II");
        assert_eq!(first.score, 84.0);

        let a = &result.similarity_analysis;
        assert_eq!(
            a.high_similarity_count + a.medium_similarity_count + a.low_similarity_count,
            3
        );
        assert_eq!(result.recommendations.len(), 2);
        assert_eq!(result.file1_info.total_items, 3);
        assert_eq!(result.file2_info.file, "new.csv");
        assert!(result.file1_patterns.is_some());
        assert!(result.report.contains("### Top 5 Best Matches"));
    }

    #[test]
    fn test_missing_column() {
        let (old, new) = materials();
        let err = Comparator::new()
            .compare_tables(&old, "Price", &new, "Item")
            .unwrap_err();
        assert!(matches!(err, SheetsimError::ColumnNotFound { ref column, .. } if column == "Price"));
    }

    #[test]
    fn test_empty_target() {
        let (old, _) = materials();
        let (empty, _) = Parser::new().parse_str("empty.csv", "Item\n").unwrap();
        let err = Comparator::new()
            .compare_tables(&old, "Material", &empty, "Item")
            .unwrap_err();
        assert!(matches!(err, SheetsimError::EmptyTargetColumn { .. }));
    }

    #[test]
    fn test_empty_source_rejected_by_aggregation() {
        let (_, new) = materials();
        let (empty, _) = Parser::new().parse_str("empty.csv", "Material\n").unwrap();
        let err = Comparator::new()
            .compare_tables(&empty, "Material", &new, "Item")
            .unwrap_err();
        assert!(matches!(err, SheetsimError::EmptyInput(_)));
    }

    #[test]
    fn test_profiles_can_be_disabled() {
        let (old, new) = materials();
        let config = ComparisonConfig {
            profile_columns: false,
            ..ComparisonConfig::default()
        };
        let result = Comparator::with_config(config)
            .compare_tables(&old, "Material", &new, "Item")
            .unwrap();
        assert!(result.file1_patterns.is_none());

        let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        assert!(json.get("file1_patterns").is_none());
        assert!(json.get("matches").is_none());
        assert_eq!(
            json["detailed_matches"]["Cimento Portland"]["match"],
            "Cimento Portland CP-II"
        );
        assert!(json["similarity_analysis"]["average_score"].is_number());
    }

    #[test]
    fn test_generated_at_reaches_report() {
        let (old, new) = materials();
        let at = Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap();
        let result = Comparator::new()
            .with_generated_at(at)
            .compare_tables(&old, "Material", &new, "Item")
            .unwrap();
        assert!(result.report.contains("2024-05-02 08:00:00 UTC"));
    }

    #[test]
    fn test_partial_json_config() {
        let config =
            ComparisonConfig::from_json_str(r#"{"report": {"top_n": 3}, "matcher": {"workers": 2}}"#)
                .unwrap();
        assert_eq!(config.report.top_n, 3);
        assert_eq!(config.report.decimals, 2);
        assert_eq!(config.matcher.workers, 2);
        assert!(config.profile_columns);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let inverted = r#"{"similarity": {"high": 40, "medium": 60}}"#;
        assert!(matches!(
            ComparisonConfig::from_json_str(inverted),
            Err(SheetsimError::Config(_))
        ));

        let zero_workers = ComparisonConfig {
            matcher: MatcherConfig { workers: 0 },
            ..ComparisonConfig::default()
        };
        assert!(zero_workers.validate().is_err());

        let (old, new) = materials();
        let err = Comparator::with_config(zero_workers)
            .compare_tables(&old, "Material", &new, "Item")
            .unwrap_err();
        assert!(matches!(err, SheetsimError::Config(_)));
    }
}
