//! Row types for the composition tables.
//!
//! These mirror what the generation pipeline writes. Nothing in this crate
//! writes them; the search path only reads.
//!
//! Boolean columns (`uses_ap`, `is_expanded`) are stored as the integers 0/1.
//! The structs expose them as `bool`; the driver does the conversion.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// A table-backed entity.
pub trait Entity {
    /// The table name.
    const TABLE: &'static str;
}

/// Champion cost, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ChampionCost(u8);

impl ChampionCost {
    /// Lowest cost a champion can have.
    pub const MIN: u8 = 1;
    /// Highest cost a champion can have.
    pub const MAX: u8 = 5;

    /// Create a cost, rejecting values outside 1..=5.
    pub fn new(cost: u8) -> Result<Self, QueryError> {
        if (Self::MIN..=Self::MAX).contains(&cost) {
            Ok(Self(cost))
        } else {
            Err(QueryError::invalid_filter(
                "cost",
                format!("champion cost must be between {} and {}, got {}", Self::MIN, Self::MAX, cost),
            ))
        }
    }

    /// The raw cost.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for ChampionCost {
    type Error = QueryError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ChampionCost> for u8 {
    fn from(cost: ChampionCost) -> Self {
        cost.0
    }
}

impl fmt::Display for ChampionCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a champion deals attack or ability damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageType {
    /// Attack damage (`uses_ap = 0`).
    Ad,
    /// Ability power (`uses_ap = 1`).
    Ap,
}

impl DamageType {
    /// The value of the `uses_ap` flag for this damage type.
    pub fn uses_ap(self) -> bool {
        matches!(self, Self::Ap)
    }

    /// Classify a stored `uses_ap` flag.
    pub fn from_uses_ap(uses_ap: bool) -> Self {
        if uses_ap { Self::Ap } else { Self::Ad }
    }
}

/// Range category of a champion.
///
/// Stored as an integer: 1 is melee, 2 is semi-ranged, anything above is ranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RangeType {
    /// `range = 1`.
    Melee,
    /// `range = 2`.
    SemiRanged,
    /// `range > 2`.
    Ranged,
}

impl RangeType {
    /// Stored value for melee champions.
    pub const MELEE: i64 = 1;
    /// Stored value for semi-ranged champions.
    pub const SEMI_RANGED: i64 = 2;

    /// Classify a stored range value. Values below 1 have no category.
    pub fn from_range(range: i64) -> Option<Self> {
        match range {
            Self::MELEE => Some(Self::Melee),
            Self::SEMI_RANGED => Some(Self::SemiRanged),
            r if r > Self::SEMI_RANGED => Some(Self::Ranged),
            _ => None,
        }
    }
}

/// A playable unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Champion {
    /// Primary key.
    pub id: i64,
    /// Shop cost.
    pub cost: ChampionCost,
    /// Display name.
    pub name: String,
    /// Encoded range category, see [`RangeType`].
    pub range: i64,
    /// Damage-type flag.
    pub uses_ap: bool,
}

impl Champion {
    /// The range category, if the stored value has one.
    pub fn range_type(&self) -> Option<RangeType> {
        RangeType::from_range(self.range)
    }

    /// The damage type.
    pub fn damage_type(&self) -> DamageType {
        DamageType::from_uses_ap(self.uses_ap)
    }
}

impl Entity for Champion {
    const TABLE: &'static str = "champions";
}

/// A tag shared by champions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trait {
    /// Primary key.
    pub id: i64,
    /// Display name.
    pub name: String,
}

impl Entity for Trait {
    const TABLE: &'static str = "traits";
}

/// Number of champions needed to activate a trait tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitThreshold {
    /// Primary key.
    pub id: i64,
    /// Owning trait.
    pub id_trait: i64,
    /// Champion count for this tier.
    pub threshold: i64,
}

impl Entity for TraitThreshold {
    const TABLE: &'static str = "trait_thresholds";
}

/// Champion to trait association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChampionTrait {
    /// Champion id.
    pub id_champion: i64,
    /// Trait id.
    pub id_trait: i64,
}

impl Entity for ChampionTrait {
    const TABLE: &'static str = "champion_traits";
}

/// A pre-computed team composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    /// Primary key.
    pub id: i64,
    /// Content hash used for deduplication.
    pub hash: String,
    /// Whether the expansion step has visited this composition.
    pub is_expanded: bool,
    /// Number of champion slots. Equal to the number of member rows.
    pub size: i64,
}

impl Entity for Composition {
    const TABLE: &'static str = "compositions";
}

/// One champion slot in a composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompositionChampion {
    /// Composition id.
    pub id_composition: i64,
    /// Champion id.
    pub id_champion: i64,
}

impl Entity for CompositionChampion {
    const TABLE: &'static str = "composition_champions";
}

/// Trait-synergy score of a composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreByTrait {
    /// Composition id.
    pub id_composition: i64,
    /// Score.
    pub score: f64,
}

impl Entity for ScoreByTrait {
    const TABLE: &'static str = "scores_by_trait";
}
