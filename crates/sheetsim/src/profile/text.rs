//! Text column patterns: length statistics and frequent affixes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Kind-specific profile of a text column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPatterns {
    pub avg_length: f64,
    pub max_length: usize,
    pub min_length: usize,
    pub common_prefixes: Vec<String>,
    pub common_suffixes: Vec<String>,
}

/// Which end of a value an affix is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffixSide {
    Prefix,
    Suffix,
}

/// Settings for affix mining.
#[derive(Debug, Clone, Copy)]
pub struct AffixRules {
    /// Minimum share of the column's rows an affix must cover.
    pub min_frequency: f64,
    /// Longest affix length, in characters.
    pub max_len: usize,
    /// Maximum affixes returned.
    pub max_affixes: usize,
}

/// The first or last `len` characters of `value`, if it is long enough.
fn affix(value: &str, char_len: usize, len: usize, side: AffixSide) -> Option<&str> {
    if len == 0 || char_len < len {
        return None;
    }
    match side {
        AffixSide::Prefix => {
            let end = value.char_indices().nth(len).map_or(value.len(), |(i, _)| i);
            Some(&value[..end])
        }
        AffixSide::Suffix => {
            let start = value
                .char_indices()
                .rev()
                .nth(len - 1)
                .map_or(0, |(i, _)| i);
            Some(&value[start..])
        }
    }
}

/// Mine affixes shared by at least `min_frequency` of `row_count` rows.
///
/// Every length from 1 to `max_len` is scanned independently; only values
/// with at least that many characters contribute. Survivors are ranked by
/// descending frequency, then lexicographically.
pub fn common_affixes(
    values: &[&str],
    row_count: usize,
    rules: AffixRules,
    side: AffixSide,
) -> Vec<String> {
    let min_count = rules.min_frequency * row_count as f64;
    let lengths: Vec<usize> = values.iter().map(|v| v.chars().count()).collect();
    let mut frequent: IndexMap<&str, usize> = IndexMap::new();

    for len in 1..=rules.max_len {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for (value, &char_len) in values.iter().zip(&lengths) {
            if let Some(a) = affix(value, char_len, len, side) {
                *counts.entry(a).or_insert(0) += 1;
            }
        }
        frequent.extend(
            counts
                .into_iter()
                .filter(|&(_, count)| count as f64 >= min_count),
        );
    }

    let mut ranked: Vec<(&str, usize)> = frequent.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(rules.max_affixes)
        .map(|(a, _)| a.to_string())
        .collect()
}

/// Profile a non-empty set of text values from a column of `row_count` rows.
pub(crate) fn text_patterns(values: &[&str], row_count: usize, rules: AffixRules) -> TextPatterns {
    let lengths: Vec<usize> = values.iter().map(|v| v.chars().count()).collect();
    let total: usize = lengths.iter().sum();

    TextPatterns {
        avg_length: total as f64 / lengths.len().max(1) as f64,
        max_length: lengths.iter().copied().max().unwrap_or(0),
        min_length: lengths.iter().copied().min().unwrap_or(0),
        common_prefixes: common_affixes(values, row_count, rules, AffixSide::Prefix),
        common_suffixes: common_affixes(values, row_count, rules, AffixSide::Suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: AffixRules = AffixRules {
        min_frequency: 0.1,
        max_len: 5,
        max_affixes: 5,
    };

    #[test]
    fn test_affix_slicing_is_char_aware() {
        assert_eq!(affix("Média", 5, 2, AffixSide::Prefix), Some("Mé"));
        assert_eq!(affix("Média", 5, 3, AffixSide::Suffix), Some("dia"));
        assert_eq!(affix("Média", 5, 5, AffixSide::Suffix), Some("Média"));
        assert_eq!(affix("ab", 2, 3, AffixSide::Prefix), None);
    }

    #[test]
    fn test_common_prefix_scenario() {
        let values = ["A1", "A2", "A3", "B1"];
        let prefixes = common_affixes(&values, 4, RULES, AffixSide::Prefix);
        assert_eq!(prefixes[0], "A");
        assert!(prefixes.len() <= 5);
    }

    #[test]
    fn test_ranking_by_frequency() {
        let values = ["SKU-001", "SKU-002", "SKU-003", "REF-10", "REF-11", "X"];
        let rules = AffixRules {
            min_frequency: 0.3,
            ..RULES
        };
        let prefixes = common_affixes(&values, 6, rules, AffixSide::Prefix);
        assert_eq!(prefixes, vec!["S", "SK", "SKU", "SKU-", "SKU-0"]);
    }

    #[test]
    fn test_threshold_excludes_rare_affixes() {
        let values = ["cat", "hat", "bat", "dog"];
        let rules = AffixRules {
            min_frequency: 0.5,
            ..RULES
        };
        let suffixes = common_affixes(&values, 4, rules, AffixSide::Suffix);
        assert_eq!(suffixes, vec!["at", "t"]);
    }

    #[test]
    fn test_text_patterns_lengths() {
        let values = ["Brita 1", "Areia Média", "Aço"];
        let patterns = text_patterns(&values, 3, RULES);
        assert_eq!(patterns.max_length, 11);
        assert_eq!(patterns.min_length, 3);
        assert!((patterns.avg_length - 7.0).abs() < 1e-12);
    }
}
