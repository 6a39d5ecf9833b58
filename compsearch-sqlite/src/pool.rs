//! Connection pool for SQLite.
//!
//! File databases reuse idle connections; opening one costs a file open plus
//! the pragma batch. In-memory databases cannot be shared between
//! connections, so every checkout opens a fresh (empty) database.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tokio_rusqlite::Connection;
use tracing::{debug, info, trace};

use crate::config::{DatabasePath, SqliteConfig};
use crate::connection::{IdleQueue, PooledConnection, SqliteConnection};
use crate::error::{SqliteError, SqliteResult};

/// A connection pool for SQLite.
///
/// Cloning is cheap; clones share the same connections.
///
/// ```rust,ignore
/// use compsearch_sqlite::{SqliteConfig, SqlitePool};
///
/// let pool = SqlitePool::new(SqliteConfig::file("comps.db")).await?;
/// let conn = pool.get().await?;
/// conn.ping().await?;
/// ```
#[derive(Clone)]
pub struct SqlitePool {
    config: Arc<SqliteConfig>,
    semaphore: Arc<Semaphore>,
    idle_connections: IdleQueue,
    pool_config: Arc<PoolConfig>,
    stats: Arc<Mutex<PoolStats>>,
}

/// Statistics about pool usage.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PoolStats {
    /// Number of connection reuses.
    pub reuses: u64,
    /// Number of new connections opened.
    pub opens: u64,
    /// Number of connections closed due to expiration.
    pub expirations: u64,
}

impl SqlitePool {
    /// Create a new connection pool from configuration.
    pub async fn new(config: SqliteConfig) -> SqliteResult<Self> {
        Self::with_pool_config(config, PoolConfig::default()).await
    }

    /// Create a new connection pool with custom pool configuration.
    ///
    /// Fails if the database cannot be opened.
    pub async fn with_pool_config(config: SqliteConfig, pool_config: PoolConfig) -> SqliteResult<Self> {
        if pool_config.max_connections == 0 {
            return Err(SqliteError::config("max_connections must be at least 1"));
        }

        let first = Self::open_connection(&config).await?;

        info!(
            path = %config.path.display(),
            read_only = config.read_only,
            max_connections = pool_config.max_connections,
            "SQLite connection pool created"
        );

        let pool = Self {
            semaphore: Arc::new(Semaphore::new(pool_config.max_connections)),
            idle_connections: Arc::new(Mutex::new(VecDeque::with_capacity(pool_config.max_connections))),
            config: Arc::new(config),
            pool_config: Arc::new(pool_config),
            stats: Arc::new(Mutex::new(PoolStats { opens: 1, ..Default::default() })),
        };

        if !pool.config.path.is_memory() {
            pool.idle_connections.lock().push_back(PooledConnection::new(first));
            for _ in 1..pool.pool_config.min_connections {
                let conn = Self::open_connection(&pool.config).await?;
                pool.stats.lock().opens += 1;
                pool.idle_connections.lock().push_back(PooledConnection::new(conn));
            }
            debug!(idle = pool.idle_count(), "Pre-warmed pool");
        }

        Ok(pool)
    }

    async fn open_connection(config: &SqliteConfig) -> SqliteResult<Connection> {
        let conn = match &config.path {
            DatabasePath::Memory => Connection::open_in_memory().await?,
            DatabasePath::File(path) => Connection::open(path.clone()).await?,
        };

        let init_sql = config.init_sql();
        conn.call(move |conn| {
            conn.execute_batch(&init_sql)?;
            Ok(())
        })
        .await?;

        Ok(conn)
    }

    /// Check out a connection, waiting up to the acquire timeout for a free slot.
    pub async fn get(&self) -> SqliteResult<SqliteConnection> {
        trace!("Acquiring connection from pool");

        let acquire = self.semaphore.clone().acquire_owned();
        let permit = match self.pool_config.acquire_timeout {
            Some(timeout) => tokio::time::timeout(timeout, acquire)
                .await
                .map_err(|_| SqliteError::timeout(timeout.as_millis() as u64))?,
            None => acquire.await,
        }
        .map_err(|e| SqliteError::pool(format!("failed to acquire permit: {}", e)))?;

        if self.config.path.is_memory() {
            let conn = Self::open_connection(&self.config).await?;
            self.stats.lock().opens += 1;
            return Ok(SqliteConnection::new_pooled(conn, Instant::now(), permit, None));
        }

        if let Some(pooled) = self.take_idle() {
            return Ok(SqliteConnection::new_pooled(
                pooled.conn,
                pooled.created_at,
                permit,
                Some(self.idle_connections.clone()),
            ));
        }

        debug!("No idle connections, opening new connection");
        let conn = Self::open_connection(&self.config).await?;
        self.stats.lock().opens += 1;
        Ok(SqliteConnection::new_pooled(
            conn,
            Instant::now(),
            permit,
            Some(self.idle_connections.clone()),
        ))
    }

    /// Pop the first idle connection that has not expired, dropping expired ones.
    fn take_idle(&self) -> Option<PooledConnection> {
        let mut idle = self.idle_connections.lock();
        let mut stats = self.stats.lock();
        while let Some(pooled) = idle.pop_front() {
            let too_old = self
                .pool_config
                .max_lifetime
                .is_some_and(|lifetime| pooled.created_at.elapsed() > lifetime);
            let idle_too_long = self
                .pool_config
                .idle_timeout
                .is_some_and(|timeout| pooled.last_used.elapsed() > timeout);

            if too_old || idle_too_long {
                stats.expirations += 1;
                continue;
            }
            stats.reuses += 1;
            return Some(pooled);
        }
        None
    }

    /// Get the database configuration.
    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }

    /// Get the pool settings.
    pub fn pool_config(&self) -> &PoolConfig {
        &self.pool_config
    }

    /// Get pool statistics.
    pub fn stats(&self) -> PoolStats {
        self.stats.lock().clone()
    }

    /// Check that a connection can be checked out and answers `SELECT 1`.
    pub async fn is_healthy(&self) -> bool {
        match self.get().await {
            Ok(conn) => conn.ping().await.is_ok(),
            Err(_) => false,
        }
    }

    /// Number of connections that could be checked out right now.
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Number of idle connections in the pool.
    pub fn idle_count(&self) -> usize {
        self.idle_connections.lock().len()
    }

    /// Create a builder for configuring the pool.
    pub fn builder() -> SqlitePoolBuilder {
        SqlitePoolBuilder::new()
    }
}

/// Configuration for the connection pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum number of concurrent connections.
    pub max_connections: usize,
    /// Connections opened up front (file databases only).
    pub min_connections: usize,
    /// How long `get` waits for a free slot. `None` waits forever.
    pub acquire_timeout: Option<Duration>,
    /// Maximum idle time before a connection is closed.
    pub idle_timeout: Option<Duration>,
    /// Maximum lifetime of a connection before it's recycled.
    pub max_lifetime: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: Some(Duration::from_secs(30)),
            idle_timeout: Some(Duration::from_secs(300)),
            max_lifetime: Some(Duration::from_secs(1800)),
        }
    }
}

/// Builder for creating a connection pool.
#[derive(Debug, Default)]
pub struct SqlitePoolBuilder {
    config: Option<SqliteConfig>,
    url: Option<String>,
    pool_config: PoolConfig,
}

impl SqlitePoolBuilder {
    /// Create a new pool builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the database URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the configuration.
    pub fn config(mut self, config: SqliteConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace all pool settings.
    pub fn pool_config(mut self, pool_config: PoolConfig) -> Self {
        self.pool_config = pool_config;
        self
    }

    /// Set the maximum number of connections.
    pub fn max_connections(mut self, n: usize) -> Self {
        self.pool_config.max_connections = n;
        self
    }

    /// Set the acquire timeout.
    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.pool_config.acquire_timeout = Some(timeout);
        self
    }

    /// Set the idle timeout.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_config.idle_timeout = Some(timeout);
        self
    }

    /// Build the connection pool.
    pub async fn build(self) -> SqliteResult<SqlitePool> {
        let config = match (self.config, self.url) {
            (Some(config), _) => config,
            (None, Some(url)) => SqliteConfig::from_url(url)?,
            (None, None) => return Err(SqliteError::config("no database URL or config provided")),
        };

        SqlitePool::with_pool_config(config, self.pool_config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_config_default() {
        let config = PoolConfig::default();
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.acquire_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_pool_builder() {
        let builder = SqlitePoolBuilder::new()
            .url("sqlite::memory:")
            .max_connections(10);

        assert!(builder.url.is_some());
        assert_eq!(builder.pool_config.max_connections, 10);
    }

    #[tokio::test]
    async fn test_builder_without_target_fails() {
        assert!(matches!(
            SqlitePoolBuilder::new().build().await,
            Err(SqliteError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_zero_connections_rejected() {
        let result = SqlitePool::builder()
            .config(SqliteConfig::memory())
            .max_connections(0)
            .build()
            .await;
        assert!(matches!(result, Err(SqliteError::Config(_))));
    }

    #[tokio::test]
    async fn test_pool_memory() {
        let pool = SqlitePool::new(SqliteConfig::memory()).await.unwrap();
        assert_eq!(pool.available_permits(), 5);
        assert_eq!(pool.idle_count(), 0);
        assert!(pool.is_healthy().await);
    }

    #[tokio::test]
    async fn test_file_pool_reuses_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comps.db");
        let pool = SqlitePool::new(SqliteConfig::file(&path)).await.unwrap();
        assert_eq!(pool.idle_count(), 1);

        {
            let conn = pool.get().await.unwrap();
            conn.ping().await.unwrap();
            assert_eq!(pool.idle_count(), 0);
            assert_eq!(pool.available_permits(), 4);
        }

        assert_eq!(pool.idle_count(), 1);
        assert_eq!(pool.available_permits(), 5);
        assert_eq!(pool.stats().reuses, 1);
        assert_eq!(pool.stats().opens, 1);
    }

    #[tokio::test]
    async fn test_acquire_times_out_when_exhausted() {
        let pool = SqlitePool::builder()
            .config(SqliteConfig::memory())
            .max_connections(1)
            .acquire_timeout(Duration::from_millis(20))
            .build()
            .await
            .unwrap();

        let _held = pool.get().await.unwrap();
        assert!(matches!(pool.get().await, Err(SqliteError::Timeout(20))));
    }
}
