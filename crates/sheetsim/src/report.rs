//! Textual report rendering.
//!
//! Rendering is a pure function of its inputs: the same comparison always
//! produces the same report. The only time-dependent line is the optional
//! caller-supplied timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::{SimilarityAnalysis, SimilarityThresholds};
use crate::matching::MatchRecord;
use crate::profile::{ColumnPatterns, NumericPatterns, PatternProfile, TextPatterns};

/// Report layout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Number of best and worst matches listed.
    pub top_n: usize,
    /// Decimal places for aggregate statistics.
    pub decimals: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            decimals: 2,
        }
    }
}

/// Identity and size of one compared column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub file: String,
    pub column: String,
    pub total_items: usize,
}

/// Everything the renderer needs.
#[derive(Debug, Clone)]
pub struct ReportInput<'a> {
    pub file1: &'a SourceInfo,
    pub file2: &'a SourceInfo,
    pub analysis: &'a SimilarityAnalysis,
    /// Bucket edges the analysis was computed with.
    pub thresholds: &'a SimilarityThresholds,
    pub file1_patterns: Option<&'a PatternProfile>,
    pub file2_patterns: Option<&'a PatternProfile>,
    pub recommendations: &'a [String],
    pub matches: &'a [MatchRecord],
    pub generated_at: Option<DateTime<Utc>>,
}

/// Matches ordered by descending score; equal scores keep input order.
pub fn rank_matches(matches: &[MatchRecord]) -> Vec<&MatchRecord> {
    let mut ranked: Vec<&MatchRecord> = matches.iter().collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Render the full report.
pub fn render(input: &ReportInput<'_>, config: &ReportConfig) -> String {
    let p = config.decimals;
    let a = input.analysis;
    let mut out = String::new();

    out.push_str("# Spreadsheet Comparison Report\n");
    if let Some(at) = input.generated_at {
        out.push_str(&format!("**Generated:** {}\n", at.format("%Y-%m-%d %H:%M:%S UTC")));
    }

    out.push_str("\n## Sources\n");
    push_source(&mut out, "File 1", input.file1);
    push_source(&mut out, "File 2", input.file2);

    out.push_str("\n## Similarity Analysis\n\n### Summary Statistics\n");
    out.push_str(&format!("- **Average score:** {:.p$}%\n", a.average_score));
    out.push_str(&format!("- **Median score:** {:.p$}%\n", a.median_score));
    out.push_str(&format!("- **Maximum score:** {:.p$}%\n", a.max_score));
    out.push_str(&format!("- **Minimum score:** {:.p$}%\n", a.min_score));

    let (high, medium) = (input.thresholds.high, input.thresholds.medium);
    out.push_str("\n### Similarity Distribution\n");
    out.push_str(&format!(
        "- **High similarity (>={}%):** {} items\n",
        high, a.high_similarity_count
    ));
    out.push_str(&format!(
        "- **Medium similarity (>={}% and <{}%):** {} items\n",
        medium, high, a.medium_similarity_count
    ));
    out.push_str(&format!(
        "- **Low similarity (<{}%):** {} items\n",
        medium, a.low_similarity_count
    ));

    out.push_str("\n## Recommendations\n\n");
    for rec in input.recommendations {
        out.push_str(&format!("- {}\n", rec));
    }

    if input.file1_patterns.is_some() || input.file2_patterns.is_some() {
        out.push_str("\n## Column Patterns\n");
        if let Some(profile) = input.file1_patterns {
            push_profile(&mut out, "File 1", profile, p);
        }
        if let Some(profile) = input.file2_patterns {
            push_profile(&mut out, "File 2", profile, p);
        }
    }

    let ranked = rank_matches(input.matches);
    let n = config.top_n.min(ranked.len());

    out.push_str("\n## Match Details\n");
    out.push_str(&format!("\n### Top {} Best Matches\n", config.top_n));
    push_matches(&mut out, &ranked[..n]);
    out.push_str(&format!("\n### Top {} Worst Matches\n", config.top_n));
    push_matches(&mut out, &ranked[ranked.len() - n..]);

    out
}

fn push_source(out: &mut String, label: &str, info: &SourceInfo) {
    out.push_str(&format!("\n### {}\n", label));
    out.push_str(&format!("- **File:** {}\n", info.file));
    out.push_str(&format!("- **Column:** {}\n", info.column));
    out.push_str(&format!("- **Total items:** {}\n", info.total_items));
}

fn push_matches(out: &mut String, matches: &[&MatchRecord]) {
    if matches.is_empty() {
        out.push_str("(no matches)\n");
        return;
    }
    for (i, m) in matches.iter().enumerate() {
        out.push_str(&format!(
            "{}. **'{}'** -> **'{}'** (Score: {:.1}%)\n",
            i + 1,
            m.original,
            m.matched,
            m.score
        ));
    }
}

fn push_profile(out: &mut String, label: &str, profile: &PatternProfile, p: usize) {
    out.push_str(&format!(
        "\n### {} ({} / {})\n",
        label, profile.source_id, profile.column
    ));
    out.push_str(&format!("- **Data type:** {}\n", profile.data_type.as_str()));
    out.push_str(&format!("- **Unique values:** {}\n", profile.unique_values));
    out.push_str(&format!("- **Null values:** {}\n", profile.null_values));
    out.push_str(&format!("- **Duplicates:** {}\n", profile.duplicates));

    match &profile.patterns {
        Some(ColumnPatterns::Text(t)) => push_text_patterns(out, t, p),
        Some(ColumnPatterns::Numeric(n)) => push_numeric_patterns(out, n, p),
        None => out.push_str("- **Patterns:** none (no non-null values)\n"),
    }
}

fn push_text_patterns(out: &mut String, t: &TextPatterns, p: usize) {
    out.push_str(&format!(
        "- **Length:** avg {:.p$}, min {}, max {}\n",
        t.avg_length, t.min_length, t.max_length
    ));
    out.push_str(&format!("- **Common prefixes:** {}\n", quoted_list(&t.common_prefixes)));
    out.push_str(&format!("- **Common suffixes:** {}\n", quoted_list(&t.common_suffixes)));
}

fn push_numeric_patterns(out: &mut String, n: &NumericPatterns, p: usize) {
    out.push_str(&format!("- **Range:** {} - {}\n", n.range.min, n.range.max));
    out.push_str(&format!(
        "- **Distribution:** {} (skewness {:.p$})\n",
        n.distribution.as_str(),
        n.skewness
    ));
    let values: Vec<String> = n.outliers.values.iter().map(|v| v.to_string()).collect();
    out.push_str(&format!(
        "- **Outliers:** {} ({:.p$}%){}\n",
        n.outliers.count,
        n.outliers.percentage,
        if values.is_empty() {
            String::new()
        } else {
            format!(": {}", values.join(", "))
        }
    ));
}

fn quoted_list(items: &[String]) -> String {
    if items.is_empty() {
        return "none".to_string();
    }
    items
        .iter()
        .map(|s| format!("'{}'", s))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{aggregate, aggregate_with, recommend};
    use chrono::TimeZone;

    fn record(original: &str, matched: &str, score: f64) -> MatchRecord {
        MatchRecord {
            original: original.to_string(),
            matched: matched.to_string(),
            score,
        }
    }

    fn info(file: &str, column: &str, total_items: usize) -> SourceInfo {
        SourceInfo {
            file: file.to_string(),
            column: column.to_string(),
            total_items,
        }
    }

    fn render_records(matches: &[MatchRecord], config: &ReportConfig) -> String {
        render_with_thresholds(matches, &SimilarityThresholds::default(), config)
    }

    fn render_with_thresholds(
        matches: &[MatchRecord],
        thresholds: &SimilarityThresholds,
        config: &ReportConfig,
    ) -> String {
        let analysis = aggregate_with(matches, thresholds).unwrap();
        let recommendations = recommend(&analysis);
        let (f1, f2) = (info("old.csv", "Material", matches.len()), info("new.csv", "Material", 12));
        render(
            &ReportInput {
                file1: &f1,
                file2: &f2,
                analysis: &analysis,
                thresholds,
                file1_patterns: None,
                file2_patterns: None,
                recommendations: &recommendations,
                matches,
                generated_at: None,
            },
            config,
        )
    }

    #[test]
    fn test_two_matches_appear_in_both_sections() {
        let matches = vec![
            record("Cimento Portland", "Cimento Portland CP-II", 84.0),
            record("Areia Média", "Areia Fina", 76.0),
        ];
        let report = render_records(&matches, &ReportConfig::default());

        let best = report.split("### Top 5 Best Matches").nth(1).unwrap();
        let (best, worst) = best.split_once("### Top 5 Worst Matches").unwrap();
        for section in [best, worst] {
            assert!(section.contains("'Cimento Portland'"));
            assert!(section.contains("'Areia Média'"));
        }
        assert!(best.contains("1. **'Cimento Portland'** -> **'Cimento Portland CP-II'** (Score: 84.0%)"));
    }

    #[test]
    fn test_statistics_fixed_decimals() {
        let matches = vec![record("a", "a", 100.0), record("b", "c", 0.0), record("d", "d", 50.0)];
        let report = render_records(&matches, &ReportConfig::default());
        assert!(report.contains("- **Average score:** 50.00%"));
        assert!(report.contains("- **Median score:** 50.00%"));
        assert!(report.contains("- **High similarity (>=80%):** 1 items"));
        assert!(report.contains("- **Medium similarity (>=50% and <80%):** 1 items"));
        assert!(report.contains("- **Low similarity (<50%):** 1 items"));
        assert!(report.contains("- **File:** old.csv"));
        assert!(report.contains("- **Total items:** 12"));
        assert!(!report.contains("Generated"));
    }

    #[test]
    fn test_distribution_labels_follow_thresholds() {
        let matches = vec![record("a", "a", 96.0), record("b", "c", 85.0), record("d", "e", 55.0)];
        let thresholds = SimilarityThresholds {
            high: 95.0,
            medium: 60.0,
        };
        let report = render_with_thresholds(&matches, &thresholds, &ReportConfig::default());

        assert!(report.contains("- **High similarity (>=95%):** 1 items"));
        assert!(report.contains("- **Medium similarity (>=60% and <95%):** 1 items"));
        assert!(report.contains("- **Low similarity (<60%):** 1 items"));
        assert!(!report.contains("80%"));
        assert!(!report.contains("50-79%"));
    }

    #[test]
    fn test_ranking_is_stable_and_truncated() {
        let matches: Vec<MatchRecord> = (0..8)
            .map(|i| record(&format!("v{i}"), "x", if i % 2 == 0 { 90.0 } else { 40.0 }))
            .collect();
        let ranked = rank_matches(&matches);
        let order: Vec<&str> = ranked.iter().map(|m| m.original.as_str()).collect();
        assert_eq!(order, vec!["v0", "v2", "v4", "v6", "v1", "v3", "v5", "v7"]);

        let report = render_records(&matches, &ReportConfig { top_n: 3, decimals: 1 });
        let (best, worst) = report.split_once("### Top 3 Worst Matches").unwrap();
        assert!(best.contains("3. **'v4'**"));
        assert!(!best.contains("'v6'"));
        assert!(worst.contains("1. **'v3'**"));
        assert!(worst.contains("3. **'v7'**"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let matches = vec![record("x", "y", 60.0), record("z", "w", 60.0)];
        let config = ReportConfig::default();
        assert_eq!(render_records(&matches, &config), render_records(&matches, &config));
    }

    #[test]
    fn test_timestamp_and_profiles() {
        let matches = vec![record("A1", "A1", 100.0)];
        let analysis = aggregate(&matches).unwrap();
        let column = crate::input::Column::from_values("Code", "old.csv", ["A1", "A2", "A3", "B1"]);
        let profile = crate::profile::profile(&column).unwrap();
        let (f1, f2) = (info("old.csv", "Code", 4), info("new.csv", "Code", 1));
        let report = render(
            &ReportInput {
                file1: &f1,
                file2: &f2,
                analysis: &analysis,
                thresholds: &SimilarityThresholds::default(),
                file1_patterns: Some(&profile),
                file2_patterns: None,
                recommendations: &[],
                matches: &matches,
                generated_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()),
            },
            &ReportConfig::default(),
        );
        assert!(report.contains("**Generated:** 2024-03-01 12:30:00 UTC"));
        assert!(report.contains("### File 1 (old.csv / Code)"));
        assert!(report.contains("- **Data type:** text"));
        assert!(report.contains("- **Common prefixes:** 'A'"));
    }
}
