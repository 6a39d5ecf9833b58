//! The search operation, independent of the store behind it.

use crate::error::QueryResult;
use crate::options::SearchCompsOptions;
use crate::result::CompositionSearchResult;

/// A read-only store of compositions.
///
/// Each call issues one query and shares no state with other calls.
#[async_trait::async_trait]
pub trait CompositionRepository: Send + Sync {
    /// Return one page of compositions matching `opts`.
    ///
    /// `None` matches every composition. Storage errors are returned as-is;
    /// nothing is retried.
    async fn search_comps(
        &self,
        opts: Option<&SearchCompsOptions>,
    ) -> QueryResult<Vec<CompositionSearchResult>>;
}
