//! Fuzz target for splitting concatenated champion ids.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_champion_ids
//! ```

#![no_main]

use arbitrary::Arbitrary;
use compsearch_query::result::{join_champion_ids, parse_champion_ids};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Input {
    Raw(String),
    Ids(Vec<i64>),
}

fuzz_target!(|input: Input| {
    match input {
        Input::Raw(text) => {
            if let Ok(ids) = parse_champion_ids(&text) {
                assert!(!ids.is_empty());
            }
        }
        Input::Ids(ids) => {
            if ids.is_empty() {
                return;
            }
            let parsed = parse_champion_ids(&join_champion_ids(&ids)).expect("joined ids parse");
            assert_eq!(parsed, ids);
        }
    }
});
