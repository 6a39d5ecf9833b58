//! SQLite composition search engine.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use compsearch_query::error::{QueryError, QueryResult};
use compsearch_query::options::{PAGE_SIZE, SearchCompsOptions};
use compsearch_query::plan::SearchPlan;
use compsearch_query::repository::CompositionRepository;
use compsearch_query::result::CompositionSearchResult;

use crate::pool::SqlitePool;
use crate::row::CompositionRow;
use crate::types::params_to_sqlite;

/// SQLite query engine.
#[derive(Clone)]
pub struct SqliteEngine {
    pool: SqlitePool,
    page_size: u64,
    log_queries: bool,
    slow_query_threshold: Option<Duration>,
}

impl SqliteEngine {
    /// Create a new SQLite engine with the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            page_size: PAGE_SIZE,
            log_queries: false,
            slow_query_threshold: None,
        }
    }

    /// Override the number of compositions returned per call.
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Log every compiled search at `info` instead of `debug`.
    pub fn with_query_logging(mut self, enabled: bool) -> Self {
        self.log_queries = enabled;
        self
    }

    /// Warn about searches slower than `threshold`.
    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = Some(threshold);
        self
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Rows returned per call.
    pub fn page_size(&self) -> u64 {
        self.page_size
    }
}

#[async_trait]
impl CompositionRepository for SqliteEngine {
    #[instrument(skip(self, opts))]
    async fn search_comps(
        &self,
        opts: Option<&SearchCompsOptions>,
    ) -> QueryResult<Vec<CompositionSearchResult>> {
        let sql = SearchPlan::from_options(opts)?
            .with_limit(self.page_size)
            .to_sql()?;

        if self.log_queries {
            info!(sql = %sql.sql(), params = ?sql.params(), "Searching compositions");
        } else {
            debug!(sql = %sql.sql(), params = ?sql.params(), "Searching compositions");
        }

        let started = Instant::now();

        let params = params_to_sqlite(sql.params());
        let conn = self
            .pool
            .get()
            .await
            .map_err(|e| QueryError::from(e).with_context("search_comps"))?;

        let rows = conn
            .fetch_all::<CompositionRow>(sql.sql(), params)
            .await
            .map_err(|e| {
                QueryError::from(e)
                    .with_context("search_comps")
                    .with_sql(sql.sql())
            })?;

        let results = rows
            .into_iter()
            .map(CompositionRow::into_result)
            .collect::<QueryResult<Vec<_>>>()?;

        let elapsed = started.elapsed();
        if self.slow_query_threshold.is_some_and(|threshold| elapsed > threshold) {
            warn!(elapsed_ms = elapsed.as_millis() as u64, sql = %sql.sql(), "Slow composition search");
        }

        debug!(count = results.len(), elapsed_ms = elapsed.as_millis() as u64, "Search complete");
        Ok(results)
    }
}
