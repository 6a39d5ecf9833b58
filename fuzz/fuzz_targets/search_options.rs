//! Fuzz target for search options.
//!
//! Feeds arbitrary JSON through deserialization, validation, planning and
//! compilation. Anything that validates must compile, and the placeholder
//! count must match the bound parameters.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_search_options
//! ```

#![no_main]

use compsearch_query::{SearchCompsOptions, SearchPlan};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(opts) = serde_json::from_slice::<SearchCompsOptions>(data) else {
        return;
    };

    let Ok(plan) = SearchPlan::from_options(Some(&opts)) else {
        return;
    };

    let sql = plan.to_sql().expect("validated options must compile");
    assert_eq!(sql.sql().matches('?').count(), sql.param_count());
});
