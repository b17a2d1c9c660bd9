//! Direct lookups and single-field listings.
//!
//! Each listing compiles its condition into a `Predicate`, selects matching
//! indices in table order, then applies the shared stable sort and limit.

use crate::{
    engine::matchup::{MatchupProfile, categorize},
    error::QueryError,
    model::{ElementType, EntityRecord, NumericField, StatField},
    obs::sink,
    query::{
        Direction, EmptyReason, Outcome, RowCount, check_generation,
        predicate::{CompareOp, Predicate, TypeSlot},
        resolve_sort_field, sort_indices,
    },
    table::DatasetTable,
};
use derive_more::Display;
use serde::Serialize;

///
/// ListResult
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ListResult {
    /// Matches before truncation.
    pub matched: usize,
    pub records: Vec<EntityRecord>,
}

impl RowCount for ListResult {
    fn row_count(&self) -> usize {
        self.records.len()
    }
}

// Select, stable-sort and truncate in one place for every listing.
fn list(
    op: &'static str,
    table: &DatasetTable,
    predicate: &Predicate,
    sort_by: NumericField,
    direction: Direction,
    limit: usize,
) -> Outcome<ListResult> {
    let records = table.records();
    sink::scanned(op, records.len());

    let mut indices = predicate.select(records);
    if indices.is_empty() {
        return Outcome::Empty(EmptyReason::NoMatches);
    }

    let matched = indices.len();
    sort_indices(records, &mut indices, sort_by, direction);
    indices.truncate(limit);

    Outcome::Found(ListResult {
        matched,
        records: indices.iter().map(|&i| records[i].clone()).collect(),
    })
}

///
/// RecordQuery
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordQuery {
    pub name: String,

    /// Attach the defensive matchup profile.
    pub detailed: bool,
}

///
/// RecordDetails
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecordDetails {
    pub record: EntityRecord,
    pub profile: Option<MatchupProfile>,
}

impl RowCount for RecordDetails {
    fn row_count(&self) -> usize {
        1
    }
}

pub fn get_record(
    table: &DatasetTable,
    query: &RecordQuery,
) -> Result<Outcome<RecordDetails>, QueryError> {
    const OP: &str = "get_record";

    sink::observe(OP, || {
        if table.is_empty() {
            return Ok(Outcome::Empty(EmptyReason::EmptyTable));
        }

        let (_, record) = table.require(&query.name)?;
        sink::scanned(OP, 1);

        let profile = if query.detailed {
            Some(categorize(record)?)
        } else {
            None
        };

        Ok(Outcome::Found(RecordDetails {
            record: record.clone(),
            profile,
        }))
    })
}

///
/// StatRangeQuery
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatRangeQuery {
    pub stat: StatField,
    pub min_value: u16,

    /// Open-ended when absent.
    pub max_value: Option<u16>,
    pub limit: usize,
}

/// Records whose stat lies in the inclusive range, highest first.
pub fn stat_range(
    table: &DatasetTable,
    query: &StatRangeQuery,
) -> Result<Outcome<ListResult>, QueryError> {
    const OP: &str = "stat_range";

    sink::observe(OP, || {
        if let Some(max) = query.max_value
            && max < query.min_value
        {
            return Err(QueryError::invalid_argument(
                "max_value",
                format!("{max} is below min_value {}", query.min_value),
            ));
        }
        if table.is_empty() {
            return Ok(Outcome::Empty(EmptyReason::EmptyTable));
        }

        let field = NumericField::Stat(query.stat);
        let mut predicate =
            Predicate::compare(field, CompareOp::Gte, f64::from(query.min_value));
        if let Some(max) = query.max_value {
            predicate = predicate & Predicate::compare(field, CompareOp::Lte, f64::from(max));
        }

        Ok(list(OP, table, &predicate, field, Direction::Desc, query.limit))
    })
}

///
/// TopQuery
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TopQuery {
    pub stat: StatField,
    pub limit: usize,
    pub exclude_legendaries: bool,
    pub generation: Option<u8>,
}

///
/// Leaderboard
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Leaderboard {
    pub stat: StatField,

    /// Eligible records before truncation.
    pub matched: usize,
    pub entries: Vec<RankedRecord>,
}

impl RowCount for Leaderboard {
    fn row_count(&self) -> usize {
        self.entries.len()
    }
}

///
/// RankedRecord
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedRecord {
    /// 1-based, among eligible records.
    pub rank: usize,
    pub value: u16,
    pub record: EntityRecord,
}

pub fn top_by_stat(
    table: &DatasetTable,
    query: &TopQuery,
) -> Result<Outcome<Leaderboard>, QueryError> {
    const OP: &str = "top_by_stat";

    sink::observe(OP, || {
        if let Some(generation) = query.generation {
            check_generation("generation", generation)?;
        }
        if table.is_empty() {
            return Ok(Outcome::Empty(EmptyReason::EmptyTable));
        }

        let order = table.rank_order(query.stat);
        sink::scanned(OP, order.len());

        let eligible: Vec<&EntityRecord> = order
            .iter()
            .map(|&index| &table.records()[index])
            .filter(|record| !(query.exclude_legendaries && record.is_legendary))
            .filter(|record| query.generation.is_none_or(|g| record.generation == g))
            .collect();

        if eligible.is_empty() {
            return Ok(Outcome::Empty(EmptyReason::NoMatches));
        }

        let entries = eligible
            .iter()
            .take(query.limit)
            .enumerate()
            .map(|(position, record)| RankedRecord {
                rank: position + 1,
                value: query.stat.value(record),
                record: (*record).clone(),
            })
            .collect();

        Ok(Outcome::Found(Leaderboard {
            stat: query.stat,
            matched: eligible.len(),
            entries,
        }))
    })
}

///
/// GenerationQuery
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GenerationQuery {
    pub generation: u8,
    pub sort_by: Option<String>,
    pub ascending: bool,
    pub limit: usize,
}

pub fn by_generation(
    table: &DatasetTable,
    query: &GenerationQuery,
) -> Result<Outcome<ListResult>, QueryError> {
    const OP: &str = "by_generation";

    sink::observe(OP, || {
        check_generation("generation", query.generation)?;
        let sort_by = resolve_sort_field(query.sort_by.as_deref());
        if table.is_empty() {
            return Ok(Outcome::Empty(EmptyReason::EmptyTable));
        }

        let predicate = Predicate::compare(
            NumericField::Generation,
            CompareOp::Eq,
            f64::from(query.generation),
        );

        Ok(list(
            OP,
            table,
            &predicate,
            sort_by,
            Direction::from_ascending(query.ascending),
            query.limit,
        ))
    })
}

///
/// TypeCombinationQuery
///
/// With `exact_match`, the secondary slot must equal `type2`, so a missing
/// `type2` selects mono-type records. Without it, `type2` is ignored.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TypeCombinationQuery {
    pub type1: ElementType,
    pub type2: Option<ElementType>,
    pub exact_match: bool,
    pub limit: usize,
}

pub fn by_type_combination(
    table: &DatasetTable,
    query: &TypeCombinationQuery,
) -> Result<Outcome<ListResult>, QueryError> {
    const OP: &str = "by_type_combination";

    sink::observe(OP, || {
        if table.is_empty() {
            return Ok(Outcome::Empty(EmptyReason::EmptyTable));
        }

        let mut predicate = Predicate::has_type(TypeSlot::Primary, query.type1);
        if query.exact_match {
            predicate = predicate
                & match query.type2 {
                    Some(element) => Predicate::has_type(TypeSlot::Secondary, element),
                    None => Predicate::MonoType,
                };
        }

        Ok(list(
            OP,
            table,
            &predicate,
            NumericField::DEFAULT_SORT,
            Direction::Desc,
            query.limit,
        ))
    })
}

///
/// AbilityQuery
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AbilityQuery {
    pub ability: String,
    pub limit: usize,
}

/// Records carrying the named ability, compared whole-name and case-insensitively.
pub fn by_ability(
    table: &DatasetTable,
    query: &AbilityQuery,
) -> Result<Outcome<ListResult>, QueryError> {
    const OP: &str = "by_ability";

    sink::observe(OP, || {
        let ability = query.ability.trim();
        if ability.is_empty() {
            return Err(QueryError::invalid_argument(
                "ability",
                "ability name must not be empty",
            ));
        }
        if table.is_empty() {
            return Ok(Outcome::Empty(EmptyReason::EmptyTable));
        }

        Ok(list(
            OP,
            table,
            &Predicate::any_ability(&[ability]),
            NumericField::DEFAULT_SORT,
            Direction::Desc,
            query.limit,
        ))
    })
}

///
/// ExtremeMetric
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtremeMetric {
    #[display("weight")]
    Weight,
    #[display("height")]
    Height,
    #[display("capture_rate")]
    CaptureRate,
    #[display("base_happiness")]
    BaseHappiness,
    #[display("egg_steps")]
    EggSteps,
}

impl ExtremeMetric {
    /// Accepts the dataset column spellings as well.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let metric = match name.trim().to_ascii_lowercase().as_str() {
            "weight" | "weight_kg" => Self::Weight,
            "height" | "height_m" => Self::Height,
            "capture_rate" => Self::CaptureRate,
            "base_happiness" | "happiness" => Self::BaseHappiness,
            "egg_steps" | "base_egg_steps" => Self::EggSteps,
            _ => return None,
        };

        Some(metric)
    }

    #[must_use]
    pub const fn field(self) -> NumericField {
        match self {
            Self::Weight => NumericField::Weight,
            Self::Height => NumericField::Height,
            Self::CaptureRate => NumericField::CaptureRate,
            Self::BaseHappiness => NumericField::BaseHappiness,
            Self::EggSteps => NumericField::EggSteps,
        }
    }
}

///
/// Extremity
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Extremity {
    #[display("max")]
    Max,
    #[display("min")]
    Min,
}

impl Extremity {
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "max" => Some(Self::Max),
            "min" => Some(Self::Min),
            _ => None,
        }
    }

    const fn direction(self) -> Direction {
        match self {
            Self::Max => Direction::Desc,
            Self::Min => Direction::Asc,
        }
    }
}

///
/// ExtremeQuery
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExtremeQuery {
    pub metric: ExtremeMetric,
    pub extremity: Extremity,
    pub limit: usize,
}

///
/// ExtremeResult
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExtremeResult {
    pub metric: ExtremeMetric,
    pub extremity: Extremity,
    pub entries: Vec<ExtremeEntry>,
}

impl RowCount for ExtremeResult {
    fn row_count(&self) -> usize {
        self.entries.len()
    }
}

///
/// ExtremeEntry
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExtremeEntry {
    pub value: f64,
    pub record: EntityRecord,
}

/// Records at either end of one physical or breeding metric.
/// Records without a value for the metric are skipped.
pub fn extreme(
    table: &DatasetTable,
    query: &ExtremeQuery,
) -> Result<Outcome<ExtremeResult>, QueryError> {
    const OP: &str = "extreme";

    sink::observe(OP, || {
        if table.is_empty() {
            return Ok(Outcome::Empty(EmptyReason::EmptyTable));
        }

        let field = query.metric.field();
        let records = table.records();
        sink::scanned(OP, records.len());

        let mut indices: Vec<usize> = (0..records.len())
            .filter(|&i| field.value(&records[i]).is_some())
            .collect();
        if indices.is_empty() {
            return Ok(Outcome::Empty(EmptyReason::NoMatches));
        }

        sort_indices(records, &mut indices, field, query.extremity.direction());
        let entries = indices
            .into_iter()
            .take(query.limit)
            .filter_map(|i| {
                let record = &records[i];
                field.value(record).map(|value| ExtremeEntry {
                    value,
                    record: record.clone(),
                })
            })
            .collect();

        Ok(Outcome::Found(ExtremeResult {
            metric: query.metric,
            extremity: query.extremity,
            entries,
        }))
    })
}

///
/// TESTS
///
