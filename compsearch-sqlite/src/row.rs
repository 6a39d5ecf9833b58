//! Row mapping for SQLite results.

use rusqlite::Row;

use compsearch_query::error::QueryResult;
use compsearch_query::result::CompositionSearchResult;

/// Trait for converting a SQLite row to a Rust type.
pub trait FromSqliteRow: Sized {
    /// Convert a SQLite row to this type.
    fn from_row(row: &Row<'_>) -> Result<Self, FromSqliteRowError>;
}

/// Error type for row deserialization.
#[derive(Debug)]
pub struct FromSqliteRowError {
    /// The error message.
    pub message: String,
    /// The column that caused the error, if known.
    pub column: Option<String>,
}

impl FromSqliteRowError {
    /// Create a new error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            column: None,
        }
    }

    /// Create a new error with a column name.
    pub fn with_column(message: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            column: Some(column.into()),
        }
    }
}

impl std::fmt::Display for FromSqliteRowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref column) = self.column {
            write!(f, "column '{}': {}", column, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for FromSqliteRowError {}

/// A grouped row as returned by the search query: the composition id and
/// its member ids concatenated with `,`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionRow {
    pub id: i64,
    pub id_champions: String,
}

impl CompositionRow {
    /// Split the concatenated member ids.
    pub fn into_result(self) -> QueryResult<CompositionSearchResult> {
        CompositionSearchResult::from_grouped(self.id, &self.id_champions)
    }
}

impl FromSqliteRow for CompositionRow {
    fn from_row(row: &Row<'_>) -> Result<Self, FromSqliteRowError> {
        let id = row
            .get::<_, i64>("id")
            .map_err(|e| FromSqliteRowError::with_column(e.to_string(), "id"))?;
        let id_champions = row
            .get::<_, String>("id_champions")
            .map_err(|e| FromSqliteRowError::with_column(e.to_string(), "id_champions"))?;
        Ok(Self { id, id_champions })
    }
}
