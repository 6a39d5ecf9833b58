//! Error types for composition search with actionable messages.
//!
//! Every error carries an [`ErrorCode`] for programmatic handling plus optional
//! context (the operation, the offending field, the generated SQL) and
//! suggestions.
//!
//! Error codes follow a pattern: E{category}{number}
//! - 1xxx: Filter errors (invalid option values)
//! - 3xxx: Connection errors (pool, timeout)
//! - 5xxx: Execution errors (storage, syntax)
//! - 6xxx: Data errors (malformed stored rows)
//! - 7xxx: Configuration errors
//! - 9xxx: Internal errors
//!
//! ```rust
//! use compsearch_query::{QueryError, ErrorCode};
//!
//! let err = QueryError::invalid_filter("sizes", "size must be positive, got 0");
//! assert_eq!(err.code, ErrorCode::InvalidFilter);
//! assert!(err.to_string().contains("E1001"));
//! ```

use std::fmt;
use thiserror::Error;

/// Result type for search operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Filter errors (1xxx)
    /// Invalid search option (E1001).
    InvalidFilter = 1001,

    // Connection errors (3xxx)
    /// Database connection failed (E3001).
    ConnectionFailed = 3001,
    /// Timed out waiting for a connection (E3003).
    ConnectionTimeout = 3003,

    // Execution errors (5xxx)
    /// General database error (E5005).
    DatabaseError = 5005,

    // Data errors (6xxx)
    /// A stored row could not be turned into a search result (E6003).
    DeserializationError = 6003,

    // Configuration errors (7xxx)
    /// Invalid configuration (E7001).
    InvalidConfiguration = 7001,

    // Internal errors (9xxx)
    /// Internal error (E9001).
    Internal = 9001,
}

impl ErrorCode {
    /// Get the error code string (e.g., "E1001").
    pub fn code(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::InvalidFilter => "Invalid search option",
            Self::ConnectionFailed => "Database connection failed",
            Self::ConnectionTimeout => "Connection timeout",
            Self::DatabaseError => "Database error",
            Self::DeserializationError => "Deserialization error",
            Self::InvalidConfiguration => "Invalid configuration",
            Self::Internal => "Internal error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Additional context for an error.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation that was being performed.
    pub operation: Option<String>,
    /// The option field involved.
    pub field: Option<String>,
    /// The SQL query (if available).
    pub sql: Option<String>,
    /// Suggestions for fixing the error.
    pub suggestions: Vec<String>,
    /// Help text.
    pub help: Option<String>,
}

/// Errors that can occur while searching compositions.
#[derive(Error, Debug)]
pub struct QueryError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// Additional context.
    pub context: ErrorContext,
    /// The source error (if any).
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl QueryError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add context about the operation.
    pub fn with_context(mut self, operation: impl Into<String>) -> Self {
        self.context.operation = Some(operation.into());
        self
    }

    /// Add a suggestion for fixing the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context.suggestions.push(suggestion.into());
        self
    }

    /// Add help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.context.help = Some(help.into());
        self
    }

    /// Set the field.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.context.field = Some(field.into());
        self
    }

    /// Set the SQL query.
    pub fn with_sql(mut self, sql: impl Into<String>) -> Self {
        self.context.sql = Some(sql.into());
        self
    }

    /// Set the source error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // ============== Constructor Functions ==============

    /// Create an invalid search option error.
    pub fn invalid_filter(field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = field.into();
        let message = message.into();
        Self::new(
            ErrorCode::InvalidFilter,
            format!("Invalid search option {}: {}", field, message),
        )
        .with_field(field)
    }

    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(ErrorCode::ConnectionFailed, format!("Connection error: {}", message))
            .with_suggestion("Check that DB_FILE points at an existing composition database")
            .with_suggestion("Verify the process can read the database file")
    }

    /// Create a connection timeout error.
    pub fn connection_timeout(duration_ms: u64) -> Self {
        Self::new(
            ErrorCode::ConnectionTimeout,
            format!("Timed out after {}ms waiting for a connection", duration_ms),
        )
        .with_suggestion("Increase the pool acquire timeout or max_connections")
    }

    /// Create a deserialization error.
    pub fn deserialization(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(
            ErrorCode::DeserializationError,
            format!("Failed to deserialize result: {}", message),
        )
        .with_help("Stored champion ids are expected to be integers; the table data is corrupt")
    }

    /// Create a general database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(
            ErrorCode::InvalidConfiguration,
            format!("Invalid configuration: {}", message),
        )
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(ErrorCode::Internal, format!("Internal error: {}", message))
    }

    // ============== Error Checks ==============

    /// Check if this is an invalid search option error.
    pub fn is_invalid_filter(&self) -> bool {
        self.code == ErrorCode::InvalidFilter
    }

    /// Check if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::ConnectionTimeout
    }

    /// Check if this is a connection error.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::ConnectionFailed | ErrorCode::ConnectionTimeout
        )
    }

    /// Check if this error is retryable.
    ///
    /// Only a timed-out checkout is; nothing in this crate retries.
    pub fn is_retryable(&self) -> bool {
        self.code == ErrorCode::ConnectionTimeout
    }

    /// Display the full error with all context and suggestions.
    pub fn display_full(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Error [{}]: {}\n", self.code.code(), self.message));

        if let Some(ref op) = self.context.operation {
            output.push_str(&format!("  → While: {}\n", op));
        }
        if let Some(ref field) = self.context.field {
            output.push_str(&format!("  → Field: {}\n", field));
        }

        // SQL (truncated if too long)
        if let Some(ref sql) = self.context.sql {
            let sql_display = match sql.char_indices().nth(200) {
                Some((cut, _)) => format!("{}...", &sql[..cut]),
                None => sql.clone(),
            };
            output.push_str(&format!("  → SQL: {}\n", sql_display));
        }

        if !self.context.suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for (i, suggestion) in self.context.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        if let Some(ref help) = self.context.help {
            output.push_str(&format!("\nHelp: {}\n", help));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_format() {
        assert_eq!(ErrorCode::InvalidFilter.code(), "E1001");
        assert_eq!(ErrorCode::DeserializationError.code(), "E6003");
        assert_eq!(ErrorCode::Internal.to_string(), "E9001");
    }

    #[test]
    fn test_invalid_filter_records_field() {
        let err = QueryError::invalid_filter("sizes", "must be positive");
        assert!(err.is_invalid_filter());
        assert_eq!(err.context.field.as_deref(), Some("sizes"));
        assert!(err.message.contains("must be positive"));
    }

    #[test]
    fn test_error_classification() {
        assert!(QueryError::connection_timeout(5000).is_timeout());
        assert!(QueryError::connection_timeout(5000).is_connection_error());
        assert!(QueryError::connection_timeout(100).is_retryable());
        assert!(!QueryError::connection("refused").is_retryable());
        assert!(!QueryError::deserialization("x").is_retryable());
        assert!(!QueryError::database("no such table").is_connection_error());
    }

    #[test]
    fn test_display_full_includes_context() {
        let err = QueryError::database("near \"HAVNG\": syntax error")
            .with_sql("SELECT 1 HAVNG")
            .with_context("search_comps")
            .with_help("Check the database schema");
        let full = err.display_full();
        assert!(full.contains("E5005"));
        assert!(full.contains("While: search_comps"));
        assert!(full.contains("SQL: SELECT 1 HAVNG"));
        assert!(full.contains("Help:"));
    }

    #[test]
    fn test_display_full_truncates_long_sql() {
        let sql = "x".repeat(500);
        let full = QueryError::database("boom").with_sql(sql).display_full();
        assert!(full.contains(&format!("{}...", "x".repeat(200))));
        assert!(!full.contains(&"x".repeat(201)));
    }

    #[test]
    fn test_source_is_exposed() {
        use std::error::Error as _;
        let io = std::io::Error::other("disk gone");
        let err = QueryError::database("read failed").with_source(io);
        assert!(err.source().is_some());
    }
}
