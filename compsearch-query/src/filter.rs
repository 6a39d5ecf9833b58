//! Bound parameter values.

use serde::{Deserialize, Serialize};

/// A value bound to a `?` placeholder in compiled SQL.
///
/// Booleans stay booleans here; drivers decide how to store them (SQLite
/// receives the integers 0 and 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<u8> for FilterValue {
    fn from(v: u8) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i32> for FilterValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}
