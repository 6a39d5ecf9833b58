//! The composition search client.

use compsearch_query::{CompositionRepository, CompositionSearchResult, SearchCompsOptions};
use compsearch_sqlite::{SqliteEngine, SqlitePool};
use tracing::info;

use crate::config::CompSearchConfig;
use crate::error::Result;

/// A handle on the composition database.
///
/// Cheap to clone; clones share one connection pool. Create it once at
/// startup and pass it to whatever serves searches.
#[derive(Clone)]
pub struct CompSearch {
    engine: SqliteEngine,
}

impl CompSearch {
    /// Open the database described by `config`.
    pub async fn connect(config: CompSearchConfig) -> Result<Self> {
        let sqlite = config.sqlite_config()?;
        let pool = SqlitePool::with_pool_config(sqlite, config.pool_config()).await?;

        let mut engine = SqliteEngine::new(pool)
            .with_page_size(config.search.page_size)
            .with_query_logging(config.debug.log_queries);
        if let Some(threshold) = config.slow_query_threshold() {
            engine = engine.with_slow_query_threshold(threshold);
        }

        info!(
            database = %engine.pool().config().path.display(),
            page_size = engine.page_size(),
            "Composition search ready"
        );

        Ok(Self { engine })
    }

    /// Open the database named by `DB_FILE` with default settings.
    pub async fn from_env() -> Result<Self> {
        Self::connect(CompSearchConfig::from_env()?).await
    }

    /// Wrap an already configured engine.
    pub fn from_engine(engine: SqliteEngine) -> Self {
        Self { engine }
    }

    /// Find compositions matching every given filter, one page at a time.
    ///
    /// `None` (or default options) returns the first page of all compositions.
    pub async fn search_comps(
        &self,
        opts: Option<&SearchCompsOptions>,
    ) -> Result<Vec<CompositionSearchResult>> {
        Ok(self.engine.search_comps(opts).await?)
    }

    /// Whether a connection can be checked out and queried.
    pub async fn is_healthy(&self) -> bool {
        self.engine.pool().is_healthy().await
    }

    /// The underlying engine.
    pub fn engine(&self) -> &SqliteEngine {
        &self.engine
    }
}

