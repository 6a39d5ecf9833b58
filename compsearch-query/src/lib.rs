//! # compsearch-query
//!
//! Driver-neutral composition search.
//!
//! This crate turns optional [`SearchCompsOptions`] into a [`SearchPlan`]
//! (an alias-keyed join set plus row-level and set-level predicates) and
//! compiles the plan to parameterized [`Sql`]. Drivers execute the SQL and
//! hand grouped rows back to [`CompositionSearchResult::from_grouped`].
//!
//! Composition filters test properties of the whole member set ("the most
//! expensive member costs at most 4", "some member is melee"), so every
//! champion filter compiles to a `HAVING` aggregate over the rows grouped by
//! composition. Only `sizes` is a plain `WHERE` condition.
//!
//! ## Building a query
//!
//! ```rust
//! use compsearch_query::{ChampionCost, ChampionFilter, SearchCompsOptions, SearchPlan};
//!
//! let opts = SearchCompsOptions::new()
//!     .sizes([8])
//!     .max_cost(ChampionCost::new(4).unwrap())
//!     .champion(ChampionFilter::Single { id: Some(7) });
//!
//! let sql = SearchPlan::from_options(Some(&opts))
//!     .unwrap()
//!     .to_sql()
//!     .unwrap();
//!
//! assert!(sql.sql().contains("WHERE c.size IN (?)"));
//! assert!(sql.sql().contains("HAVING MAX(ch.cost) <= ? AND MAX(cc.id_champion = ?) = 1"));
//! assert_eq!(sql.param_count(), 5);
//! ```
//!
//! ## Parsing results
//!
//! ```rust
//! use compsearch_query::parse_champion_ids;
//!
//! assert_eq!(parse_champion_ids("12,4,30").unwrap(), vec![12, 4, 30]);
//! assert!(parse_champion_ids("12,?").is_err());
//! ```

pub mod error;
pub mod filter;
pub mod logging;
pub mod model;
pub mod options;
pub mod plan;
pub mod repository;
pub mod result;
pub mod sql;

pub use error::{ErrorCode, QueryError, QueryResult};
pub use filter::FilterValue;
pub use model::{ChampionCost, DamageType, RangeType};
pub use options::{
    ChampionFilter, PAGE_SIZE, SearchCompsOptions, TraitFilter, TraitMode, VariableChampionFilter,
};
pub use plan::SearchPlan;
pub use repository::CompositionRepository;
pub use result::{CompositionSearchResult, parse_champion_ids};
pub use sql::Sql;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{QueryError, QueryResult};
    pub use crate::model::{ChampionCost, DamageType, RangeType};
    pub use crate::options::{
        ChampionFilter, SearchCompsOptions, TraitFilter, TraitMode, VariableChampionFilter,
    };
    pub use crate::repository::CompositionRepository;
    pub use crate::result::CompositionSearchResult;
}
