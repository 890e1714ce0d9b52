//! Fuzz target for the CSV/TSV parser.
//!
//! Malformed input must surface as an error, never a panic, and every
//! header of a parsed table must be extractable.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sheetsim::{Parser, extract};

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    if let Ok((table, metadata)) = Parser::new().parse_bytes("fuzz.csv", data) {
        assert_eq!(metadata.row_count, table.row_count());
        for header in &table.headers {
            let column = extract(&table, header).unwrap();
            assert_eq!(column.len(), table.row_count());
        }
    }
});
