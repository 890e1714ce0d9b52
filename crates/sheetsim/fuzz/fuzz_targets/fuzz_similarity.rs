//! Fuzz target for the token-sort similarity score.
//!
//! Scores stay within [0, 100], are symmetric, and a string always scores
//! 100 against itself.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sheetsim::token_sort_ratio;

fuzz_target!(|data: &[u8]| {
    if data.len() > 4_096 {
        return;
    }
    let text = String::from_utf8_lossy(data);
    let split = text.char_indices().nth(text.chars().count() / 2).map_or(text.len(), |(i, _)| i);
    let (a, b) = text.split_at(split);

    let score = token_sort_ratio(a, b);
    assert!((0.0..=100.0).contains(&score));
    assert_eq!(score, token_sort_ratio(b, a));
    assert_eq!(token_sort_ratio(a, a), 100.0);
});
