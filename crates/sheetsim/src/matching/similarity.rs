//! Token-sort string similarity.
//!
//! Both strings are normalized (lowercased, punctuation turned into
//! whitespace), split into tokens, sorted, and rejoined before an
//! indel-distance ratio is taken. Word order therefore does not affect
//! the score: `"Portland Cimento"` and `"cimento portland"` score 100.

use once_cell::sync::Lazy;
use rapidfuzz::distance::indel;
use regex::Regex;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").expect("static pattern compiles"));

/// Lowercase, replace non-word characters with spaces, and trim.
pub fn normalize(value: &str) -> String {
    NON_WORD
        .replace_all(&value.to_lowercase(), " ")
        .trim()
        .to_string()
}

/// Normalize and sort whitespace-delimited tokens.
pub fn canonical_tokens(value: &str) -> String {
    let normalized = normalize(value);
    let mut tokens: Vec<&str> = normalized.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Indel ratio between two already-canonical strings, in `[0, 100]`.
///
/// The result is rounded to a whole number, halves to even. Two empty strings are
/// identical (100); an empty string against a non-empty one scores 0.
pub fn canonical_ratio(a: &str, b: &str) -> f64 {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return 100.0,
        (true, false) | (false, true) => return 0.0,
        _ => {}
    }
    if a == b {
        return 100.0;
    }
    let similarity = indel::normalized_similarity(a.chars(), b.chars());
    (similarity * 100.0).round_ties_even().clamp(0.0, 100.0)
}

/// Token-sort ratio between two raw cell values, in `[0, 100]`.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    canonical_ratio(&canonical_tokens(a), &canonical_tokens(b))
}
