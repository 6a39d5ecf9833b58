//! Errors surfaced by the top-level client.

use compsearch_query::QueryError;
use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`CompSearch`](crate::CompSearch) and
/// [`CompSearchConfig`](crate::CompSearchConfig).
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration file could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`CompSearchConfig`](crate::CompSearchConfig).
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    /// The configuration parsed but a value is unusable.
    #[error("invalid config value for '{field}': {message}")]
    Config {
        /// Dotted path of the offending key.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// Searching or connecting failed.
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl Error {
    /// Create a configuration error for `field`.
    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The underlying search error, if this is one.
    pub fn as_query_error(&self) -> Option<&QueryError> {
        match self {
            Self::Query(e) => Some(e),
            _ => None,
        }
    }
}

impl From<compsearch_sqlite::SqliteError> for Error {
    fn from(err: compsearch_sqlite::SqliteError) -> Self {
        Self::Query(err.into())
    }
}
