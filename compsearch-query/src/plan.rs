//! Search plans: the join set and predicates of a composition search.
//!
//! A [`SearchPlan`] is built from [`SearchCompsOptions`] before any SQL
//! exists. Joins are keyed by alias so a filter that needs `champions` twice
//! still produces one join. Predicates come in two kinds:
//!
//! - [`Condition`]: row-level, compiled into `WHERE`.
//! - [`GroupPredicate`]: set-level tests over all members of a composition,
//!   compiled into `HAVING`.
//!
//! ```rust
//! use compsearch_query::options::{ChampionFilter, SearchCompsOptions};
//! use compsearch_query::model::ChampionCost;
//! use compsearch_query::plan::{JoinTable, SearchPlan};
//!
//! let opts = SearchCompsOptions::new()
//!     .max_cost(ChampionCost::new(4).unwrap())
//!     .champion(ChampionFilter::Single { id: Some(7) });
//! let plan = SearchPlan::from_options(Some(&opts)).unwrap();
//!
//! assert_eq!(plan.predicates().len(), 2);
//! assert!(plan.has_join(JoinTable::Champions));
//! ```

use indexmap::IndexMap;
use smallvec::{SmallVec, smallvec};
use tracing::debug;

use crate::error::{QueryError, QueryResult};
use crate::model::{
    Champion, ChampionCost, ChampionTrait, Composition, CompositionChampion, DamageType, Entity,
    RangeType,
};
use crate::options::{ChampionFilter, PAGE_SIZE, SearchCompsOptions, TraitFilter, VariableChampionFilter};
use crate::sql::Sql;

/// Alias of the `compositions` table.
pub const COMPOSITION_ALIAS: &str = "c";

/// Tables that can be joined onto the base `compositions` scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinTable {
    /// `composition_champions AS cc`, one row per slot.
    CompositionChampions,
    /// `champions AS ch`, the champion in each slot.
    Champions,
}

impl JoinTable {
    /// The table name.
    pub fn table(self) -> &'static str {
        match self {
            Self::CompositionChampions => CompositionChampion::TABLE,
            Self::Champions => Champion::TABLE,
        }
    }

    /// The alias, which is also the deduplication key.
    pub fn alias(self) -> &'static str {
        match self {
            Self::CompositionChampions => "cc",
            Self::Champions => "ch",
        }
    }

    /// The `ON` condition.
    pub fn on(self) -> &'static str {
        match self {
            Self::CompositionChampions => "cc.id_composition = c.id",
            Self::Champions => "ch.id = cc.id_champion",
        }
    }

    /// Joins that must precede this one.
    fn depends_on(self) -> Option<Self> {
        match self {
            Self::CompositionChampions => None,
            Self::Champions => Some(Self::CompositionChampions),
        }
    }
}

/// A row-level condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `c.size IN (...)`.
    SizeIn(Vec<i64>),
}

/// A set-level predicate over the members of one composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupPredicate {
    /// The most expensive member costs at most this much.
    MaxCostAtMost(ChampionCost),
    /// Some member is this champion.
    ContainsChampion(i64),
    /// Some member satisfies every predicate in the list.
    ContainsMember(Vec<MemberPredicate>),
}

impl GroupPredicate {
    /// Joins this predicate reads from.
    pub fn required_joins(&self) -> SmallVec<[JoinTable; 2]> {
        match self {
            Self::MaxCostAtMost(_) | Self::ContainsMember(_) => smallvec![JoinTable::Champions],
            Self::ContainsChampion(_) => SmallVec::new(),
        }
    }
}

/// A test applied to a single member champion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberPredicate {
    /// `ch.cost IN (...)`.
    CostIn(Vec<ChampionCost>),
    /// `ch.uses_ap = 0|1`.
    Damage(DamageType),
    /// Range category.
    Range(RangeType),
    /// The champion carries at least `required` of the trait ids.
    Traits {
        /// Distinct trait ids.
        ids: Vec<i64>,
        /// How many of them must match.
        required: usize,
    },
}

impl MemberPredicate {
    fn from_traits(filter: &TraitFilter) -> Option<Self> {
        let ids = filter.distinct_ids();
        if ids.is_empty() {
            return None;
        }
        Some(Self::Traits {
            required: filter.required_matches(),
            ids,
        })
    }
}

/// A join set plus predicates, ready to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPlan {
    joins: IndexMap<&'static str, JoinTable>,
    conditions: Vec<Condition>,
    predicates: Vec<GroupPredicate>,
    limit: u64,
    offset: u64,
}

impl Default for SearchPlan {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchPlan {
    /// The base plan: every composition with its members, one page.
    pub fn new() -> Self {
        let mut joins = IndexMap::new();
        joins.insert(JoinTable::CompositionChampions.alias(), JoinTable::CompositionChampions);
        Self {
            joins,
            conditions: Vec::new(),
            predicates: Vec::new(),
            limit: PAGE_SIZE,
            offset: 0,
        }
    }

    /// Build a plan from optional search options.
    pub fn from_options(opts: Option<&SearchCompsOptions>) -> QueryResult<Self> {
        let mut plan = Self::new();
        let Some(opts) = opts else {
            return Ok(plan);
        };
        opts.validate()?;

        if let Some(sizes) = opts.sizes.as_ref().filter(|s| !s.is_empty()) {
            plan.push_condition(Condition::SizeIn(sizes.clone()));
        }

        if let Some(max_cost) = opts.max_cost {
            plan.push_predicate(GroupPredicate::MaxCostAtMost(max_cost))?;
        }

        for filter in opts.champions.iter().flatten() {
            match filter {
                ChampionFilter::Single { id: Some(id) } => {
                    plan.push_predicate(GroupPredicate::ContainsChampion(*id))?;
                }
                ChampionFilter::Single { id: None } => {}
                ChampionFilter::Variable(variable) if variable.is_unconstrained() => {}
                ChampionFilter::Variable(variable) => {
                    plan.push_predicate(GroupPredicate::ContainsMember(member_predicates(variable)))?;
                }
            }
        }

        plan.offset = opts.offset.unwrap_or(0);

        debug!(
            joins = plan.joins.len(),
            conditions = plan.conditions.len(),
            predicates = plan.predicates.len(),
            offset = plan.offset,
            "Built search plan"
        );
        Ok(plan)
    }

    /// Add a join. Returns `false` if the alias was already joined.
    pub fn add_join(&mut self, join: JoinTable) -> QueryResult<bool> {
        if let Some(dep) = join.depends_on() {
            self.add_join(dep)?;
        }
        match self.joins.get(join.alias()) {
            Some(existing) if *existing == join => Ok(false),
            Some(existing) => Err(QueryError::internal(format!(
                "alias '{}' is already bound to {}",
                join.alias(),
                existing.table()
            ))),
            None => {
                self.joins.insert(join.alias(), join);
                Ok(true)
            }
        }
    }

    /// Add a row-level condition.
    pub fn push_condition(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    /// Add a set-level predicate along with the joins it reads from.
    pub fn push_predicate(&mut self, predicate: GroupPredicate) -> QueryResult<()> {
        for join in predicate.required_joins() {
            self.add_join(join)?;
        }
        self.predicates.push(predicate);
        Ok(())
    }

    /// Override the page size.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Joins in the order they will be emitted.
    pub fn joins(&self) -> impl Iterator<Item = JoinTable> + '_ {
        self.joins.values().copied()
    }

    /// Whether the table is joined.
    pub fn has_join(&self, join: JoinTable) -> bool {
        self.joins.get(join.alias()) == Some(&join)
    }

    /// Row-level conditions.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Set-level predicates.
    pub fn predicates(&self) -> &[GroupPredicate] {
        &self.predicates
    }

    /// Page size.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of matching compositions skipped.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Compile to parameterized SQL.
    ///
    /// Members are grouped per composition and returned as a comma-joined
    /// `id_champions` string column, using SQLite's `GROUP_CONCAT`.
    pub fn to_sql(&self) -> QueryResult<Sql> {
        let limit = to_i64("limit", self.limit)?;
        let offset = to_i64("offset", self.offset)?;

        let mut sql = Sql::empty().push(format!(
            "SELECT {c}.id AS id, GROUP_CONCAT(cc.id_champion, ',') AS id_champions FROM {table} AS {c}",
            c = COMPOSITION_ALIAS,
            table = Composition::TABLE,
        ));

        for join in self.joins() {
            sql = sql.push(format!(
                " INNER JOIN {} AS {} ON {}",
                join.table(),
                join.alias(),
                join.on()
            ));
        }

        for (i, condition) in self.conditions.iter().enumerate() {
            sql = sql.push(if i == 0 { " WHERE " } else { " AND " });
            sql = match condition {
                Condition::SizeIn(sizes) => sql
                    .push(format!("{}.size IN (", COMPOSITION_ALIAS))
                    .bind_list(sizes.iter().copied())
                    .push(")"),
            };
        }

        sql = sql.push(format!(" GROUP BY {}.id", COMPOSITION_ALIAS));

        for (i, predicate) in self.predicates.iter().enumerate() {
            sql = sql.push(if i == 0 { " HAVING " } else { " AND " });
            sql = push_group_predicate(sql, predicate)?;
        }

        Ok(sql
            .push(format!(" ORDER BY {}.id ASC", COMPOSITION_ALIAS))
            .push_bind(" LIMIT ", limit)
            .push_bind(" OFFSET ", offset))
    }
}

fn member_predicates(filter: &VariableChampionFilter) -> Vec<MemberPredicate> {
    let mut members = Vec::new();
    if let Some(costs) = filter.costs.as_ref().filter(|c| !c.is_empty()) {
        members.push(MemberPredicate::CostIn(costs.clone()));
    }
    if let Some(damage) = filter.damage_type {
        members.push(MemberPredicate::Damage(damage));
    }
    if let Some(range) = filter.range_type {
        members.push(MemberPredicate::Range(range));
    }
    if let Some(traits) = filter.traits.as_ref().and_then(MemberPredicate::from_traits) {
        members.push(traits);
    }
    members
}

fn push_group_predicate(sql: Sql, predicate: &GroupPredicate) -> QueryResult<Sql> {
    Ok(match predicate {
        GroupPredicate::MaxCostAtMost(cost) => sql.push_bind("MAX(ch.cost) <= ", cost.get()),
        GroupPredicate::ContainsChampion(id) => {
            sql.push_bind("MAX(cc.id_champion = ", *id).push(") = 1")
        }
        GroupPredicate::ContainsMember(members) => {
            let mut sql = sql.push("MAX(");
            for (i, member) in members.iter().enumerate() {
                if i > 0 {
                    sql = sql.push(" AND ");
                }
                sql = push_member_predicate(sql.push("("), member)?.push(")");
            }
            sql.push(") = 1")
        }
    })
}

fn push_member_predicate(sql: Sql, member: &MemberPredicate) -> QueryResult<Sql> {
    Ok(match member {
        MemberPredicate::CostIn(costs) => sql
            .push("ch.cost IN (")
            .bind_list(costs.iter().map(|c| c.get()))
            .push(")"),
        MemberPredicate::Damage(damage) => sql.push_bind("ch.uses_ap = ", damage.uses_ap()),
        MemberPredicate::Range(RangeType::Melee) => sql.push_bind("ch.range = ", RangeType::MELEE),
        MemberPredicate::Range(RangeType::SemiRanged) => {
            sql.push_bind("ch.range = ", RangeType::SEMI_RANGED)
        }
        MemberPredicate::Range(RangeType::Ranged) => {
            sql.push_bind("ch.range > ", RangeType::SEMI_RANGED)
        }
        MemberPredicate::Traits { ids, required } => sql
            .push(format!(
                "ch.id IN (SELECT ct.id_champion FROM {} AS ct WHERE ct.id_trait IN (",
                ChampionTrait::TABLE
            ))
            .bind_list(ids.iter().copied())
            .push(") GROUP BY ct.id_champion HAVING COUNT(DISTINCT ct.id_trait) >= ")
            .bind(to_i64("traits", *required as u64)?)
            .push(")"),
    })
}

fn to_i64(field: &str, value: u64) -> QueryResult<i64> {
    i64::try_from(value).map_err(|_| {
        QueryError::invalid_filter(field, format!("{} does not fit in a signed 64-bit integer", value))
    })
}
