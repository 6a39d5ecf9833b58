//! # compsearch
//!
//! Filterable, paginated search over pre-computed team compositions stored
//! in SQLite.
//!
//! Every composition is a set of champions. A search combines optional
//! filters (team sizes, a cost ceiling, and per-member champion filters)
//! with AND semantics and returns at most one page of matching compositions,
//! each with the ids of its members.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use compsearch::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), compsearch::Error> {
//!     compsearch::logging::init();
//!
//!     let client = CompSearch::connect(CompSearchConfig::from_file("compsearch.toml")?).await?;
//!
//!     let opts = SearchCompsOptions::new()
//!         .sizes([8])
//!         .max_cost(ChampionCost::new(4)?)
//!         .champion(ChampionFilter::Variable(VariableChampionFilter {
//!             range_type: Some(RangeType::Melee),
//!             ..Default::default()
//!         }));
//!
//!     for comp in client.search_comps(Some(&opts)).await? {
//!         println!("{} -> {:?}", comp.id, comp.id_champions);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Crates
//!
//! - [`query`]: options, validation, the predicate plan and SQL compilation
//! - [`sqlite`]: the connection pool and the executing engine

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod client;
pub mod config;
pub mod error;

/// Search options, plans and SQL compilation.
pub mod query {
    pub use compsearch_query::*;
}

/// SQLite execution.
pub mod sqlite {
    pub use compsearch_sqlite::*;
}

pub use compsearch_query::logging;

pub use client::CompSearch;
pub use config::CompSearchConfig;
pub use error::{Error, Result};

pub use compsearch_query::{
    ChampionCost, ChampionFilter, CompositionSearchResult, DamageType, QueryError, RangeType,
    SearchCompsOptions, TraitFilter, TraitMode, VariableChampionFilter,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::client::CompSearch;
    pub use crate::config::CompSearchConfig;
    pub use crate::error::{Error, Result};
    pub use compsearch_query::prelude::*;
}
