//! SQLite execution of composition searches.
//!
//! This crate runs the SQL compiled by `compsearch-query` against a SQLite
//! composition database, using `tokio-rusqlite` for asynchronous access.
//!
//! # Features
//!
//! - Async/await support via `tokio-rusqlite`
//! - Connection pooling with acquire timeouts
//! - Read-only connections by default (`PRAGMA query_only`)
//! - In-memory and file-based databases
//!
//! # Example
//!
//! ```rust,ignore
//! use compsearch_query::{CompositionRepository, SearchCompsOptions};
//! use compsearch_sqlite::{SqliteConfig, SqliteEngine, SqlitePool};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = SqlitePool::new(SqliteConfig::from_env()?).await?;
//!     let engine = SqliteEngine::new(pool);
//!
//!     let opts = SearchCompsOptions::new().sizes([8]);
//!     for comp in engine.search_comps(Some(&opts)).await? {
//!         println!("{}: {:?}", comp.id, comp.id_champions);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod connection;
pub mod engine;
pub mod error;
pub mod pool;
pub mod row;
pub mod types;

pub use config::{DB_FILE_ENV, DatabasePath, SqliteConfig};
pub use connection::SqliteConnection;
pub use engine::SqliteEngine;
pub use error::{SqliteError, SqliteResult};
pub use pool::{PoolConfig, PoolStats, SqlitePool, SqlitePoolBuilder};
pub use row::{CompositionRow, FromSqliteRow, FromSqliteRowError};
