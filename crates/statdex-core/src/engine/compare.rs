use crate::{
    engine::matchup::best_multiplier,
    error::QueryError,
    model::{ElementType, EntityRecord, Multiplier, StatField},
    obs::sink,
    query::{EmptyReason, Outcome, RowCount},
    table::DatasetTable,
};
use serde::Serialize;
use std::cmp::Ordering;

const OP: &str = "compare_head_to_head";

///
/// CompareQuery
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompareQuery {
    pub first: String,
    pub second: String,
}

///
/// Winner
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    First,
    Second,
    Tie,
}

impl From<Ordering> for Winner {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Greater => Self::First,
            Ordering::Less => Self::Second,
            Ordering::Equal => Self::Tie,
        }
    }
}

///
/// Side
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Side {
    pub name: String,
    pub types: Vec<ElementType>,
    pub total: u16,

    /// Base stats where this side is strictly greater.
    pub wins: usize,
}

impl Side {
    fn new(record: &EntityRecord) -> Self {
        Self {
            name: record.name.clone(),
            types: record.types().collect(),
            total: record.total,
            wins: 0,
        }
    }
}

///
/// StatComparison
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct StatComparison {
    pub stat: StatField,
    pub first: u16,
    pub second: u16,

    /// `first - second`.
    pub difference: i32,
    pub winner: Winner,
}

///
/// HeadToHead
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct HeadToHead {
    pub first: Side,
    pub second: Side,
    pub stats: Vec<StatComparison>,

    /// Best multiplier the first side's types deal to the second.
    pub first_attacking: Multiplier,

    /// Best multiplier the second side's types deal to the first.
    pub second_attacking: Multiplier,
}

impl RowCount for HeadToHead {
    fn row_count(&self) -> usize {
        2
    }
}

/// Stat-by-stat comparison of two records plus directional matchups.
pub fn compare_head_to_head(
    table: &DatasetTable,
    query: &CompareQuery,
) -> Result<Outcome<HeadToHead>, QueryError> {
    sink::observe(OP, || {
        if table.is_empty() {
            return Ok(Outcome::Empty(EmptyReason::EmptyTable));
        }

        let (_, a) = table.require(&query.first)?;
        let (_, b) = table.require(&query.second)?;
        sink::scanned(OP, 2);

        let mut first = Side::new(a);
        let mut second = Side::new(b);

        let stats: Vec<StatComparison> = StatField::BASE
            .into_iter()
            .map(|stat| {
                let (left, right) = (stat.value(a), stat.value(b));
                StatComparison {
                    stat,
                    first: left,
                    second: right,
                    difference: i32::from(left) - i32::from(right),
                    winner: left.cmp(&right).into(),
                }
            })
            .collect();

        for comparison in &stats {
            match comparison.winner {
                Winner::First => first.wins += 1,
                Winner::Second => second.wins += 1,
                Winner::Tie => {}
            }
        }

        Ok(Outcome::Found(HeadToHead {
            first,
            second,
            stats,
            first_attacking: best_multiplier(a.types(), b)?,
            second_attacking: best_multiplier(b.types(), a)?,
        }))
    })
}

///
/// TESTS
///
