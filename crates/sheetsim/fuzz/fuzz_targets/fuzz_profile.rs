//! Fuzz target for the column profiler.
//!
//! Any line-separated set of cells profiles without panicking, and the
//! unique and duplicate counts partition the non-null cells.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sheetsim::{Column, profile};

fuzz_target!(|data: &[u8]| {
    if data.len() > 50_000 {
        return;
    }
    let text = String::from_utf8_lossy(data);
    let column = Column::from_values("fuzz", "fuzz.csv", text.lines());

    let profile = profile(&column).unwrap();
    assert_eq!(profile.total_values, column.len());
    assert_eq!(
        profile.unique_values + profile.duplicates + profile.null_values,
        column.len()
    );
});
