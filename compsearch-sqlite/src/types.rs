//! Type conversion utilities for SQLite.

use rusqlite::types::Value;

use compsearch_query::filter::FilterValue;

/// Convert a FilterValue to a SQLite Value.
///
/// SQLite has no boolean type; `true`/`false` become the integers 1/0, which
/// is how `uses_ap` is stored.
pub fn filter_value_to_sqlite(value: &FilterValue) -> Value {
    match value {
        FilterValue::Bool(b) => Value::Integer(i64::from(*b)),
        FilterValue::Int(i) => Value::Integer(*i),
    }
}

/// Convert every bound parameter of a compiled query.
pub fn params_to_sqlite(params: &[FilterValue]) -> Vec<Value> {
    params.iter().map(filter_value_to_sqlite).collect()
}
