//! Search options accepted by `search_comps`.
//!
//! The shape matches the JSON the web layer posts:
//!
//! ```rust
//! use compsearch_query::options::{ChampionFilter, SearchCompsOptions};
//!
//! let opts: SearchCompsOptions = serde_json::from_str(r#"{
//!     "offset": 100,
//!     "sizes": [7, 8],
//!     "max_cost": 4,
//!     "champions": [
//!         { "type": "single", "id": 7 },
//!         { "type": "variable", "costs": [2], "rangeType": "melee",
//!           "traits": { "ids": [3, 9], "mode": "and" } }
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(opts.offset, Some(100));
//! assert!(matches!(opts.champions.as_deref(), Some([ChampionFilter::Single { id: Some(7) }, _])));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};
use crate::model::{ChampionCost, DamageType, RangeType};

/// Default number of compositions returned per page.
pub const PAGE_SIZE: u64 = 100;

/// Options for a composition search. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchCompsOptions {
    /// Number of matching compositions to skip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    /// Allowed composition sizes. A composition matches if its size equals any entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<i64>>,
    /// Upper bound on the most expensive member.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_cost: Option<ChampionCost>,
    /// Per-slot champion filters; all of them must hold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub champions: Option<Vec<ChampionFilter>>,
}

/// A filter on one member of the composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChampionFilter {
    /// The composition contains this exact champion, in any slot.
    Single {
        /// Champion id. No id means no constraint.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<i64>,
    },
    /// The composition contains a champion matching every given attribute.
    Variable(VariableChampionFilter),
}

/// Attribute constraints that a single member must satisfy together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VariableChampionFilter {
    /// Allowed costs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub costs: Option<Vec<ChampionCost>>,
    /// Required damage type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damage_type: Option<DamageType>,
    /// Required range category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_type: Option<RangeType>,
    /// Required traits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traits: Option<TraitFilter>,
}

impl VariableChampionFilter {
    /// True when no attribute would constrain the member.
    pub fn is_unconstrained(&self) -> bool {
        self.costs.as_ref().is_none_or(Vec::is_empty)
            && self.damage_type.is_none()
            && self.range_type.is_none()
            && self.traits.as_ref().is_none_or(|t| t.ids.is_empty())
    }
}

/// Trait membership requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitFilter {
    /// Trait ids.
    pub ids: Vec<i64>,
    /// How the ids combine.
    pub mode: TraitMode,
}

impl TraitFilter {
    /// The ids with duplicates removed, in first-seen order.
    pub fn distinct_ids(&self) -> Vec<i64> {
        let mut out: Vec<i64> = Vec::with_capacity(self.ids.len());
        for id in &self.ids {
            if !out.contains(id) {
                out.push(*id);
            }
        }
        out
    }

    /// How many of the distinct ids a champion must carry.
    pub fn required_matches(&self) -> usize {
        match self.mode {
            TraitMode::Or => 1,
            TraitMode::And => self.distinct_ids().len(),
        }
    }
}

/// Combination mode for [`TraitFilter::ids`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitMode {
    /// At least one of the traits.
    Or,
    /// All of the traits.
    And,
}

impl SearchCompsOptions {
    /// Create empty options (matches every composition).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the offset.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set the allowed sizes.
    pub fn sizes(mut self, sizes: impl IntoIterator<Item = i64>) -> Self {
        self.sizes = Some(sizes.into_iter().collect());
        self
    }

    /// Set the maximum member cost.
    pub fn max_cost(mut self, cost: ChampionCost) -> Self {
        self.max_cost = Some(cost);
        self
    }

    /// Append a champion filter.
    pub fn champion(mut self, filter: ChampionFilter) -> Self {
        self.champions.get_or_insert_with(Vec::new).push(filter);
        self
    }

    /// Reject values that can never match instead of silently returning nothing.
    ///
    /// Costs are range-checked when a [`ChampionCost`] is built, so only the
    /// plain integer fields are inspected here.
    pub fn validate(&self) -> QueryResult<()> {
        if i64::try_from(self.offset.unwrap_or(0)).is_err() {
            return Err(QueryError::invalid_filter("offset", "offset does not fit in a signed 64-bit integer"));
        }

        for size in self.sizes.iter().flatten() {
            if *size <= 0 {
                return Err(QueryError::invalid_filter(
                    "sizes",
                    format!("composition size must be positive, got {}", size),
                ));
            }
        }

        for (index, filter) in self.champions.iter().flatten().enumerate() {
            match filter {
                ChampionFilter::Single { id: Some(id) } if *id < 0 => {
                    return Err(QueryError::invalid_filter(
                        format!("champions[{}].id", index),
                        format!("champion id must not be negative, got {}", id),
                    ));
                }
                ChampionFilter::Variable(VariableChampionFilter {
                    traits: Some(traits),
                    ..
                }) => {
                    if let Some(id) = traits.ids.iter().find(|id| **id < 0) {
                        return Err(QueryError::invalid_filter(
                            format!("champions[{}].traits.ids", index),
                            format!("trait id must not be negative, got {}", id),
                        ));
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cost(c: u8) -> ChampionCost {
        ChampionCost::new(c).unwrap()
    }

    #[test]
    fn test_empty_json_is_default() {
        let opts: SearchCompsOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, SearchCompsOptions::default());
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_variable_filter_field_names() {
        let filter: ChampionFilter = serde_json::from_str(
            r#"{"type":"variable","costs":[1,5],"damageType":"ap","rangeType":"semi-ranged"}"#,
        )
        .unwrap();
        let ChampionFilter::Variable(v) = filter else {
            panic!("expected variable filter");
        };
        assert_eq!(v.costs, Some(vec![cost(1), cost(5)]));
        assert_eq!(v.damage_type, Some(DamageType::Ap));
        assert_eq!(v.range_type, Some(RangeType::SemiRanged));
        assert!(v.traits.is_none());
    }

    #[test]
    fn test_single_filter_without_id() {
        let filter: ChampionFilter = serde_json::from_str(r#"{"type":"single"}"#).unwrap();
        assert_eq!(filter, ChampionFilter::Single { id: None });
    }

    #[test]
    fn test_out_of_range_cost_rejected_on_parse() {
        let err = serde_json::from_str::<SearchCompsOptions>(r#"{"max_cost": 0}"#).unwrap_err();
        assert!(err.to_string().contains("between 1 and 5"));
        assert!(serde_json::from_str::<ChampionFilter>(r#"{"type":"variable","costs":[7]}"#).is_err());
    }

    #[test]
    fn test_unknown_filter_type_rejected() {
        assert!(serde_json::from_str::<ChampionFilter>(r#"{"type":"slot","id":1}"#).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_sizes() {
        let err = SearchCompsOptions::new().sizes([8, 0]).validate().unwrap_err();
        assert!(err.is_invalid_filter());
        assert_eq!(err.context.field.as_deref(), Some("sizes"));
    }

    #[test]
    fn test_validate_rejects_negative_ids() {
        let err = SearchCompsOptions::new()
            .champion(ChampionFilter::Single { id: Some(2) })
            .champion(ChampionFilter::Single { id: Some(-1) })
            .validate()
            .unwrap_err();
        assert_eq!(err.context.field.as_deref(), Some("champions[1].id"));

        let err = SearchCompsOptions::new()
            .champion(ChampionFilter::Variable(VariableChampionFilter {
                traits: Some(TraitFilter { ids: vec![1, -4], mode: TraitMode::Or }),
                ..Default::default()
            }))
            .validate()
            .unwrap_err();
        assert_eq!(err.context.field.as_deref(), Some("champions[0].traits.ids"));
    }

    #[test]
    fn test_validate_rejects_huge_offset() {
        assert!(SearchCompsOptions::new().offset(u64::MAX).validate().is_err());
        assert!(SearchCompsOptions::new().offset(200).validate().is_ok());
    }

    #[test]
    fn test_trait_filter_required_matches() {
        let or = TraitFilter { ids: vec![3, 3, 9], mode: TraitMode::Or };
        let and = TraitFilter { ids: vec![3, 3, 9], mode: TraitMode::And };
        assert_eq!(or.distinct_ids(), vec![3, 9]);
        assert_eq!(or.required_matches(), 1);
        assert_eq!(and.required_matches(), 2);
    }

    #[test]
    fn test_is_unconstrained() {
        assert!(VariableChampionFilter::default().is_unconstrained());
        let empty_lists = VariableChampionFilter {
            costs: Some(vec![]),
            traits: Some(TraitFilter { ids: vec![], mode: TraitMode::And }),
            ..Default::default()
        };
        assert!(empty_lists.is_unconstrained());
        let melee = VariableChampionFilter {
            range_type: Some(RangeType::Melee),
            ..Default::default()
        };
        assert!(!melee.is_unconstrained());
    }

    #[test]
    fn test_serialize_skips_absent_fields() {
        let json = serde_json::to_string(&SearchCompsOptions::new().offset(5)).unwrap();
        assert_eq!(json, r#"{"offset":5}"#);
    }
}
