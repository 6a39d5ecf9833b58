//! Parameterized SQL text with ordered bound values.
//!
//! ```rust
//! use compsearch_query::Sql;
//!
//! let sql = Sql::new("SELECT id FROM compositions WHERE size = ")
//!     .bind(8)
//!     .push(" AND is_expanded = ")
//!     .bind(true);
//! assert_eq!(sql.sql(), "SELECT id FROM compositions WHERE size = ? AND is_expanded = ?");
//! assert_eq!(sql.param_count(), 2);
//! ```
//!
//! Values are never interpolated into the SQL string.

use tracing::trace;

use crate::filter::FilterValue;

/// A SQL query with parameterized values.
#[derive(Debug, Clone, PartialEq)]
pub struct Sql {
    text: String,
    params: Vec<FilterValue>,
}

impl Sql {
    /// Create a new query starting with the given text.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            text: sql.into(),
            params: Vec::new(),
        }
    }

    /// Create an empty query.
    pub fn empty() -> Self {
        Self::new(String::new())
    }

    /// Append a literal SQL string.
    pub fn push(mut self, sql: impl AsRef<str>) -> Self {
        self.text.push_str(sql.as_ref());
        self
    }

    /// Bind a parameter value, appending a `?` placeholder.
    pub fn bind(mut self, value: impl Into<FilterValue>) -> Self {
        self.text.push('?');
        self.params.push(value.into());
        self
    }

    /// Push SQL and bind a value together.
    pub fn push_bind(self, sql: impl AsRef<str>, value: impl Into<FilterValue>) -> Self {
        self.push(sql).bind(value)
    }

    /// Bind every value as a comma-separated placeholder list, e.g. `?, ?, ?`.
    pub fn bind_list<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                self.text.push_str(", ");
            }
            self = self.bind(value);
        }
        self
    }

    /// Build the final SQL string and parameters.
    pub fn build(self) -> (String, Vec<FilterValue>) {
        trace!(sql_len = self.text.len(), param_count = self.params.len(), "Sql::build()");
        (self.text, self.params)
    }

    /// Get the SQL string (without consuming).
    pub fn sql(&self) -> &str {
        &self.text
    }

    /// Get the parameters (without consuming).
    pub fn params(&self) -> &[FilterValue] {
        &self.params
    }

    /// Get the number of bound parameters.
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Check if the query is empty.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl Default for Sql {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Display for Sql {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
