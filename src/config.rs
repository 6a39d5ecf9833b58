//! Configuration file parsing for `compsearch.toml`.
//!
//! ```toml
//! [database]
//! url = "sqlite://${DB_FILE}"
//!
//! [database.pool]
//! max_connections = 5
//! connect_timeout = "30s"
//!
//! [search]
//! page_size = 100
//!
//! [debug]
//! log_queries = true
//! ```
//!
//! `${VAR}` references are replaced with the variable's value before parsing.
//! References to unset variables are left as written.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use compsearch_query::PAGE_SIZE;
use compsearch_sqlite::{DB_FILE_ENV, PoolConfig, SqliteConfig};

use crate::error::{Error, Result};

/// Main configuration structure for `compsearch.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CompSearchConfig {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Search settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Debug/logging settings.
    #[serde(default)]
    pub debug: DebugConfig,
}

impl CompSearchConfig {
    /// Load configuration from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let expanded = expand_env_vars(content)?;
        let config: Self = toml::from_str(&expanded)?;
        config.validate()?;
        Ok(config)
    }

    /// Default configuration pointing at the database named by `DB_FILE`.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var(DB_FILE_ENV)
            .map_err(|_| Error::config("database.url", format!("{} is not set", DB_FILE_ENV)))?;
        Ok(Self {
            database: DatabaseConfig {
                url: Some(url),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    /// The configured database URL, falling back to `DB_FILE`.
    pub fn database_url(&self) -> Option<String> {
        self.database
            .url
            .clone()
            .or_else(|| std::env::var(DB_FILE_ENV).ok())
    }

    /// Build the SQLite connection settings.
    ///
    /// `sqlite::memory:` is rejected: every pooled connection would open its
    /// own empty database.
    pub fn sqlite_config(&self) -> Result<SqliteConfig> {
        let url = self.database_url().ok_or_else(|| {
            Error::config(
                "database.url",
                format!("no database url configured and {} is not set", DB_FILE_ENV),
            )
        })?;

        let mut config = SqliteConfig::from_url(&url)?;
        if config.path.is_memory() {
            return Err(Error::config(
                "database.url",
                "in-memory databases are not shared between pooled connections; use a file",
            ));
        }
        if let Some(read_only) = self.database.read_only {
            config = config.read_only(read_only);
        }
        Ok(config)
    }

    /// Build the connection pool settings.
    pub fn pool_config(&self) -> PoolConfig {
        let pool = &self.database.pool;
        PoolConfig {
            max_connections: pool.max_connections,
            min_connections: pool.min_connections,
            acquire_timeout: Some(pool.connect_timeout),
            idle_timeout: Some(pool.idle_timeout),
            max_lifetime: Some(pool.max_lifetime),
        }
    }

    /// Slow search threshold, if enabled.
    pub fn slow_query_threshold(&self) -> Option<Duration> {
        match self.debug.slow_query_threshold {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.search.page_size == 0 {
            return Err(Error::config("search.page_size", "must be at least 1"));
        }
        if self.database.pool.max_connections == 0 {
            return Err(Error::config("database.pool.max_connections", "must be at least 1"));
        }
        Ok(())
    }
}

/// Database configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Connection URL (supports `${ENV_VAR}` interpolation).
    pub url: Option<String>,

    /// Override the URL's `read_only` setting.
    pub read_only: Option<bool>,

    /// Connection pool settings.
    #[serde(default)]
    pub pool: PoolSettings,
}

/// Connection pool settings as written in the file.
///
/// Durations use humantime syntax: `250ms`, `30s`, `5m`, `1h 30m`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PoolSettings {
    /// Connections opened up front.
    #[serde(default = "default_min_connections")]
    pub min_connections: usize,

    /// Maximum number of connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    /// How long a search waits for a free connection.
    #[serde(with = "humantime_serde", default = "default_connect_timeout")]
    pub connect_timeout: Duration,

    /// Idle connection timeout.
    #[serde(with = "humantime_serde", default = "default_idle_timeout")]
    pub idle_timeout: Duration,

    /// Maximum connection lifetime.
    #[serde(with = "humantime_serde", default = "default_max_lifetime")]
    pub max_lifetime: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            min_connections: default_min_connections(),
            max_connections: default_max_connections(),
            connect_timeout: default_connect_timeout(),
            idle_timeout: default_idle_timeout(),
            max_lifetime: default_max_lifetime(),
        }
    }
}

fn default_min_connections() -> usize { 1 }
fn default_max_connections() -> usize { 5 }
fn default_connect_timeout() -> Duration { Duration::from_secs(30) }
fn default_idle_timeout() -> Duration { Duration::from_secs(300) }
fn default_max_lifetime() -> Duration { Duration::from_secs(1800) }

mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}

/// Search settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Compositions returned per call.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> u64 { PAGE_SIZE }

/// Debug/logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DebugConfig {
    /// Log every compiled search at `info`.
    #[serde(default)]
    pub log_queries: bool,

    /// Warn about searches slower than this many milliseconds. 0 disables.
    #[serde(default)]
    pub slow_query_threshold: u64,
}

fn expand_env_vars(content: &str) -> Result<String> {
    let re = regex_lite::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
        .map_err(|e| Error::config("<env>", e.to_string()))?;

    Ok(re
        .replace_all(content, |caps: &regex_lite::Captures<'_>| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = CompSearchConfig::default();
        assert_eq!(config.search.page_size, 100);
        assert_eq!(config.database.pool.max_connections, 5);
        assert!(!config.debug.log_queries);
        assert_eq!(config.slow_query_threshold(), None);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [database]
            url = "sqlite://./comps.db?busy_timeout=100"
            read_only = false

            [database.pool]
            max_connections = 2
            connect_timeout = "250ms"

            [search]
            page_size = 25

            [debug]
            log_queries = true
            slow_query_threshold = 500
        "#;

        let config = CompSearchConfig::from_str(toml).unwrap();
        assert_eq!(config.search.page_size, 25);
        assert!(config.debug.log_queries);
        assert_eq!(config.slow_query_threshold(), Some(Duration::from_millis(500)));

        let sqlite = config.sqlite_config().unwrap();
        assert!(!sqlite.read_only);
        assert_eq!(sqlite.busy_timeout_ms, Some(100));

        let pool = config.pool_config();
        assert_eq!(pool.max_connections, 2);
        assert_eq!(pool.acquire_timeout, Some(Duration::from_millis(250)));
        assert_eq!(pool.idle_timeout, Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let err = CompSearchConfig::from_str("[search]\npage = 10\n").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = CompSearchConfig::from_str("[search]\npage_size = 0\n").unwrap_err();
        assert!(matches!(err, Error::Config { ref field, .. } if field == "search.page_size"));
    }

    #[test]
    fn test_bad_duration_rejected() {
        let err = CompSearchConfig::from_str("[database.pool]\nidle_timeout = \"soon\"\n").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
        assert!(err.to_string().contains("idle_timeout"));
    }

    #[test]
    fn test_compound_durations() {
        let config = CompSearchConfig::from_str(
            "[database.pool]\nconnect_timeout = \"750ms\"\nidle_timeout = \"2m\"\nmax_lifetime = \"1h 30m\"\n",
        )
        .unwrap();

        let pool = config.pool_config();
        assert_eq!(pool.acquire_timeout, Some(Duration::from_millis(750)));
        assert_eq!(pool.idle_timeout, Some(Duration::from_secs(120)));
        assert_eq!(pool.max_lifetime, Some(Duration::from_secs(5400)));
    }

    #[test]
    fn test_durations_serialize_back_to_strings() {
        let rendered = toml::to_string(&CompSearchConfig::default()).unwrap();
        assert!(rendered.contains("idle_timeout = \"5m\""));
        assert_eq!(CompSearchConfig::from_str(&rendered).unwrap(), CompSearchConfig::default());
    }

    #[test]
    fn test_memory_database_rejected() {
        let config = CompSearchConfig::from_str("[database]\nurl = \"sqlite::memory:\"\n").unwrap();
        let err = config.sqlite_config().unwrap_err();
        assert!(matches!(err, Error::Config { ref field, .. } if field == "database.url"));
    }

    #[test]
    fn test_unset_variable_left_in_place() {
        let expanded = expand_env_vars("url = \"${COMPSEARCH_TEST_SURELY_UNSET_VAR}\"").unwrap();
        assert_eq!(expanded, "url = \"${COMPSEARCH_TEST_SURELY_UNSET_VAR}\"");
    }
}
