//! Per-column pattern profiling.
//!
//! A column is classified once, up front, as either text or numeric:
//! numeric iff every non-null cell parses as a finite number. Columns that
//! mix numbers and text fall back to text under [`TypePolicy::Lenient`] and
//! are rejected under [`TypePolicy::Strict`]. Columns with no non-null
//! cells are reported as text with no kind-specific patterns.

mod numeric;
mod text;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetsimError};
use crate::input::Column;

pub use numeric::{
    Distribution, NumericPatterns, NumericRange, NumericSummary, OutlierSummary, QuantileMethod,
    quantile, skewness,
};
pub use text::{AffixRules, AffixSide, TextPatterns, common_affixes};

/// Inferred kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    Numeric,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Text => "text",
            ColumnKind::Numeric => "numeric",
        }
    }
}

/// What to do with a column whose non-null cells are only partly numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypePolicy {
    /// Profile it as text and log a warning.
    #[default]
    Lenient,
    /// Fail with [`SheetsimError::UnsupportedColumnType`].
    Strict,
}

/// Profiler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// IQR multiplier for the outlier fences.
    pub outlier_multiplier: f64,
    /// Minimum share of rows an affix must cover.
    pub affix_min_frequency: f64,
    /// Longest affix mined, in characters.
    pub max_affix_len: usize,
    /// Maximum prefixes (and suffixes) reported.
    pub max_affixes: usize,
    pub quantile_method: QuantileMethod,
    pub type_policy: TypePolicy,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            outlier_multiplier: 1.5,
            affix_min_frequency: 0.1,
            max_affix_len: 5,
            max_affixes: 5,
            quantile_method: QuantileMethod::Linear,
            type_policy: TypePolicy::Lenient,
        }
    }
}

impl ProfileConfig {
    fn affix_rules(&self) -> AffixRules {
        AffixRules {
            min_frequency: self.affix_min_frequency,
            max_len: self.max_affix_len,
            max_affixes: self.max_affixes,
        }
    }
}

/// Kind-specific sub-profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ColumnPatterns {
    #[serde(rename = "text_patterns")]
    Text(TextPatterns),
    #[serde(rename = "numeric_patterns")]
    Numeric(NumericPatterns),
}

/// Descriptive record for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternProfile {
    pub column: String,
    pub source_id: String,
    pub data_type: ColumnKind,
    pub total_values: usize,
    pub unique_values: usize,
    pub null_values: usize,
    pub duplicates: usize,
    /// Absent when the column has no non-null cells.
    #[serde(flatten)]
    pub patterns: Option<ColumnPatterns>,
}

impl PatternProfile {
    /// Text sub-profile, if the column is text.
    pub fn text_patterns(&self) -> Option<&TextPatterns> {
        match &self.patterns {
            Some(ColumnPatterns::Text(t)) => Some(t),
            _ => None,
        }
    }

    /// Numeric sub-profile, if the column is numeric.
    pub fn numeric_patterns(&self) -> Option<&NumericPatterns> {
        match &self.patterns {
            Some(ColumnPatterns::Numeric(n)) => Some(n),
            _ => None,
        }
    }
}

/// Column contents after classification.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedColumn<'a> {
    /// No non-null cells.
    Empty,
    Text(Vec<&'a str>),
    Numeric(Vec<f64>),
}

impl ClassifiedColumn<'_> {
    /// Kind reported for this classification.
    pub fn kind(&self) -> ColumnKind {
        match self {
            ClassifiedColumn::Numeric(_) => ColumnKind::Numeric,
            ClassifiedColumn::Empty | ClassifiedColumn::Text(_) => ColumnKind::Text,
        }
    }
}

/// Kind of a column without policy checks: numeric iff every non-null cell parses.
pub fn infer_kind(column: &Column) -> ColumnKind {
    if column.parse_numeric().is_numeric() {
        ColumnKind::Numeric
    } else {
        ColumnKind::Text
    }
}

/// Classify a column as text or numeric under `policy`.
pub fn classify(column: &Column, policy: TypePolicy) -> Result<ClassifiedColumn<'_>> {
    let parsed = column.parse_numeric();

    if parsed.is_numeric() {
        return Ok(ClassifiedColumn::Numeric(parsed.values));
    }

    let text: Vec<&str> = column.non_null_values().collect();
    if text.is_empty() {
        return Ok(ClassifiedColumn::Empty);
    }

    if parsed.is_mixed() {
        let numeric = parsed.values.len();
        match policy {
            TypePolicy::Strict => {
                return Err(SheetsimError::UnsupportedColumnType {
                    column: column.name.clone(),
                    numeric,
                    total: text.len(),
                });
            }
            TypePolicy::Lenient => {
                tracing::warn!(
                    column = %column.name,
                    numeric,
                    total = text.len(),
                    "Column mixes numeric and text values; profiling as text"
                );
            }
        }
    }

    Ok(ClassifiedColumn::Text(text))
}

/// Builds [`PatternProfile`]s.
pub struct PatternProfiler {
    config: ProfileConfig,
}

impl PatternProfiler {
    /// Create a profiler with default configuration.
    pub fn new() -> Self {
        Self {
            config: ProfileConfig::default(),
        }
    }

    /// Create a profiler with custom configuration.
    pub fn with_config(config: ProfileConfig) -> Self {
        Self { config }
    }

    /// Profile a single column.
    pub fn profile(&self, column: &Column) -> Result<PatternProfile> {
        let classified = classify(column, self.config.type_policy)?;
        let kind = classified.kind();
        let null_values = column.null_count();

        let (non_null, unique_values, patterns) = match &classified {
            ClassifiedColumn::Empty => (0, 0, None),
            ClassifiedColumn::Text(values) => {
                let unique = values.iter().collect::<HashSet<_>>().len();
                let patterns = text::text_patterns(values, column.len(), self.config.affix_rules());
                (values.len(), unique, Some(ColumnPatterns::Text(patterns)))
            }
            ClassifiedColumn::Numeric(values) => {
                // 0.0 and -0.0 count as one value.
                let unique = values
                    .iter()
                    .map(|v| if *v == 0.0 { 0u64 } else { v.to_bits() })
                    .collect::<HashSet<_>>()
                    .len();
                let patterns = numeric::numeric_patterns(
                    values,
                    self.config.outlier_multiplier,
                    self.config.quantile_method,
                );
                (values.len(), unique, Some(ColumnPatterns::Numeric(patterns)))
            }
        };

        tracing::debug!(
            column = %column.name,
            kind = ?kind,
            rows = column.len(),
            nulls = null_values,
            unique = unique_values,
            "Profiled column"
        );

        Ok(PatternProfile {
            column: column.name.clone(),
            source_id: column.source_id.clone(),
            data_type: kind,
            total_values: column.len(),
            unique_values,
            null_values,
            duplicates: non_null - unique_values,
            patterns,
        })
    }
}

impl Default for PatternProfiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Profile a column with default settings.
pub fn profile(column: &Column) -> Result<PatternProfile> {
    PatternProfiler::new().profile(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(values: &[&str]) -> Column {
        Column::from_values("col", "test.csv", values.iter().copied())
    }

    #[test]
    fn test_numeric_column() {
        let profile = profile(&column(&["1", "2", "3", "4", "5", "100"])).unwrap();
        assert_eq!(profile.data_type, ColumnKind::Numeric);
        let numeric = profile.numeric_patterns().unwrap();
        assert_eq!(numeric.outliers.values, vec![100.0]);
        assert_eq!(numeric.distribution, Distribution::Skewed);
    }

    #[test]
    fn test_text_column_counts() {
        let profile = profile(&column(&["A1", "A2", "A3", "B1", "A1", ""])).unwrap();
        assert_eq!(profile.data_type, ColumnKind::Text);
        assert_eq!(profile.total_values, 6);
        assert_eq!(profile.null_values, 1);
        assert_eq!(profile.unique_values, 4);
        assert_eq!(profile.duplicates, 1);
        let text = profile.text_patterns().unwrap();
        assert_eq!(text.common_prefixes[0], "A");
    }

    #[test]
    fn test_all_null_column() {
        let profile = profile(&column(&["", "NA", "null"])).unwrap();
        assert_eq!(profile.null_values, 3);
        assert_eq!(profile.unique_values, 0);
        assert_eq!(profile.duplicates, 0);
        assert!(profile.patterns.is_none());
    }

    #[test]
    fn test_empty_column() {
        let profile = profile(&column(&[])).unwrap();
        assert_eq!(profile.total_values, 0);
        assert!(profile.patterns.is_none());
    }

    #[test]
    fn test_mixed_column_lenient_falls_back_to_text() {
        let profile = profile(&column(&["10", "20", "thirty"])).unwrap();
        assert_eq!(profile.data_type, ColumnKind::Text);
        assert!(profile.text_patterns().is_some());
    }

    #[test]
    fn test_mixed_column_strict_is_rejected() {
        let profiler = PatternProfiler::with_config(ProfileConfig {
            type_policy: TypePolicy::Strict,
            ..ProfileConfig::default()
        });
        let err = profiler.profile(&column(&["10", "20", "thirty"])).unwrap_err();
        match err {
            SheetsimError::UnsupportedColumnType { numeric, total, .. } => {
                assert_eq!(numeric, 2);
                assert_eq!(total, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_numeric_duplicates_compare_by_value() {
        let profile = profile(&column(&["1", "1.0", "2", "-"])).unwrap();
        assert_eq!(profile.data_type, ColumnKind::Numeric);
        assert_eq!(profile.unique_values, 2);
        assert_eq!(profile.duplicates, 1);
        assert_eq!(profile.null_values, 1);
    }

    #[test]
    fn test_profile_serializes_kind_specific_key() {
        let profile = profile(&column(&["x", "y"])).unwrap();
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["data_type"], "text");
        assert!(json.get("text_patterns").is_some());
        assert!(json.get("numeric_patterns").is_none());
    }
}
