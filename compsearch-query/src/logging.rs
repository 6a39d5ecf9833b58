//! Logging bootstrap controlled by environment variables.
//!
//! # Environment Variables
//!
//! - `COMPSEARCH_DEBUG=true|1|yes` - Enable debug logging
//! - `COMPSEARCH_LOG_LEVEL=trace|debug|info|warn|error` - Set a specific level
//! - `COMPSEARCH_LOG_FORMAT=json|pretty|compact` - Output format (default: json)
//!
//! ```rust,no_run
//! use compsearch_query::logging;
//!
//! // Call once at startup; later calls are no-ops.
//! logging::init();
//! ```
//!
//! Without the `tracing-subscriber` feature `init` installs nothing and the
//! host application's subscriber receives the events.

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Check if debug logging is enabled via `COMPSEARCH_DEBUG`.
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("COMPSEARCH_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Resolve a log level name, falling back to `debug` when debugging is on
/// and `warn` otherwise.
pub fn resolve_log_level(requested: Option<&str>, debug: bool) -> &'static str {
    let fallback = if debug { "debug" } else { "warn" };
    match requested.map(str::to_lowercase).as_deref() {
        Some("trace") => "trace",
        Some("debug") => "debug",
        Some("info") => "info",
        Some("warn") => "warn",
        Some("error") => "error",
        _ => fallback,
    }
}

/// Get the configured log level from `COMPSEARCH_LOG_LEVEL`.
pub fn get_log_level() -> &'static str {
    resolve_log_level(env::var("COMPSEARCH_LOG_LEVEL").ok().as_deref(), is_debug_enabled())
}

/// Resolve a log format name. Unknown names fall back to `json`.
pub fn resolve_log_format(requested: Option<&str>) -> &'static str {
    match requested.map(str::to_lowercase).as_deref() {
        Some("pretty") => "pretty",
        Some("compact") => "compact",
        _ => "json",
    }
}

/// Get the configured log format from `COMPSEARCH_LOG_FORMAT`.
pub fn get_log_format() -> &'static str {
    resolve_log_format(env::var("COMPSEARCH_LOG_FORMAT").ok().as_deref())
}

/// Initialize logging. Does nothing unless `COMPSEARCH_DEBUG` or
/// `COMPSEARCH_LOG_LEVEL` is set.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var("COMPSEARCH_LOG_LEVEL").is_err() {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = get_log_level();
            let filter = EnvFilter::try_new(format!(
                "compsearch={},compsearch_query={},compsearch_sqlite={}",
                level, level, level
            ))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

            match get_log_format() {
                "json" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().json())
                        .init();
                }
                "compact" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().compact())
                        .init();
                }
                _ => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().pretty())
                        .init();
                }
            }

            tracing::info!(level = level, format = get_log_format(), "compsearch logging initialized");
        }
    });
}
