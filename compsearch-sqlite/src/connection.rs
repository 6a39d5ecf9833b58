//! Pooled SQLite connection wrapper.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use rusqlite::types::Value;
use tokio::sync::OwnedSemaphorePermit;
use tokio_rusqlite::Connection;
use tracing::{debug, trace};

use crate::error::{SqliteError, SqliteResult};
use crate::row::{FromSqliteRow, FromSqliteRowError};

pub(crate) type IdleQueue = Arc<Mutex<VecDeque<PooledConnection>>>;

/// An idle connection waiting in the pool.
pub(crate) struct PooledConnection {
    pub conn: Connection,
    pub created_at: Instant,
    pub last_used: Instant,
}

impl PooledConnection {
    pub fn new(conn: Connection) -> Self {
        let now = Instant::now();
        Self {
            conn,
            created_at: now,
            last_used: now,
        }
    }
}

/// A connection checked out of a [`SqlitePool`](crate::SqlitePool).
///
/// Dropping it returns the connection to the pool (file databases) or closes
/// it (in-memory databases).
pub struct SqliteConnection {
    conn: Option<Connection>,
    _permit: OwnedSemaphorePermit,
    return_to_pool: Option<IdleQueue>,
    created_at: Instant,
}

impl SqliteConnection {
    pub(crate) fn new_pooled(
        conn: Connection,
        created_at: Instant,
        permit: OwnedSemaphorePermit,
        return_to_pool: Option<IdleQueue>,
    ) -> Self {
        Self {
            conn: Some(conn),
            _permit: permit,
            return_to_pool,
            created_at,
        }
    }

    fn conn(&self) -> SqliteResult<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| SqliteError::internal("connection already returned to the pool"))
    }

    /// Run a query with positional parameters and map every row.
    pub async fn fetch_all<T>(&self, sql: &str, params: Vec<Value>) -> SqliteResult<Vec<T>>
    where
        T: FromSqliteRow + Send + 'static,
    {
        let sql = sql.to_string();
        debug!(sql = %sql, param_count = params.len(), "Executing query");

        self.conn()?
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let mut rows = stmt.query(rusqlite::params_from_iter(params.iter()))?;

                let mut out = Vec::new();
                while let Some(row) = rows.next()? {
                    let mapped = T::from_row(row).map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))?;
                    out.push(mapped);
                }
                Ok(out)
            })
            .await
            .map_err(|e| match e {
                tokio_rusqlite::Error::Other(other) => match other.downcast::<FromSqliteRowError>() {
                    Ok(row_err) => SqliteError::deserialization(row_err.to_string()),
                    Err(other) => SqliteError::Sqlite(tokio_rusqlite::Error::Other(other)),
                },
                e => SqliteError::from(e),
            })
    }

    /// Execute `SELECT 1`.
    pub async fn ping(&self) -> SqliteResult<()> {
        self.conn()?
            .call(|conn| {
                conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
                Ok(())
            })
            .await
            .map_err(SqliteError::from)
    }
}

impl Drop for SqliteConnection {
    fn drop(&mut self) {
        if let (Some(pool), Some(conn)) = (self.return_to_pool.take(), self.conn.take()) {
            trace!("Returning connection to pool");
            pool.lock().push_back(PooledConnection {
                conn,
                created_at: self.created_at,
                last_used: Instant::now(),
            });
        }
    }
}
