use crate::{
    error::QueryError,
    model::StatField,
    obs::sink,
    query::{EmptyReason, Outcome, RowCount},
    table::DatasetTable,
};
use serde::Serialize;

const OP: &str = "stat_percentile";

/// Neighbors reported on each side of the ranked record.
const NEIGHBOR_SPAN: usize = 3;

///
/// PercentileQuery
///

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PercentileQuery {
    pub name: String,
    pub stat: StatField,
}

///
/// PercentileResult
///
/// `percentile = (population - rank) / population * 100`, unrounded.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PercentileResult {
    pub name: String,
    pub stat: StatField,
    pub value: u16,
    pub rank: usize,
    pub population: usize,
    pub percentile: f64,

    /// Up to three records ranked directly above, best first.
    pub above: Vec<Neighbor>,

    /// Up to three records ranked directly below, best first.
    pub below: Vec<Neighbor>,
}

impl RowCount for PercentileResult {
    fn row_count(&self) -> usize {
        1
    }
}

///
/// Neighbor
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Neighbor {
    pub name: String,
    pub rank: usize,
    pub value: u16,
}

/// Rank one record against the whole table on one stat.
/// Ties keep table order, so equal values still get distinct ranks.
pub fn stat_percentile(
    table: &DatasetTable,
    query: &PercentileQuery,
) -> Result<Outcome<PercentileResult>, QueryError> {
    sink::observe(OP, || {
        if table.is_empty() {
            return Ok(Outcome::Empty(EmptyReason::EmptyTable));
        }

        let (index, record) = table.require(&query.name)?;
        let order = table.rank_order(query.stat);
        sink::scanned(OP, order.len());

        let position = order
            .iter()
            .position(|&i| i == index)
            .ok_or_else(|| QueryError::data_integrity(&record.name, "missing from rank order"))?;

        let population = order.len();
        let rank = position + 1;
        let percentile = (population - rank) as f64 / population as f64 * 100.0;

        let neighbor = |at: usize| {
            let other = &table.records()[order[at]];
            Neighbor {
                name: other.name.clone(),
                rank: at + 1,
                value: query.stat.value(other),
            }
        };
        let above = (position.saturating_sub(NEIGHBOR_SPAN)..position)
            .map(neighbor)
            .collect();
        let below = (position + 1..population.min(position + 1 + NEIGHBOR_SPAN))
            .map(neighbor)
            .collect();

        Ok(Outcome::Found(PercentileResult {
            name: record.name.clone(),
            stat: query.stat,
            value: query.stat.value(record),
            rank,
            population,
            percentile,
            above,
            below,
        }))
    })
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::fixture_table;

    fn run(name: &str, stat: StatField) -> PercentileResult {
        stat_percentile(
            &fixture_table(),
            &PercentileQuery {
                name: name.to_string(),
                stat,
            },
        )
        .unwrap()
        .found()
        .unwrap()
    }

    fn neighbor_names(neighbors: &[Neighbor]) -> Vec<&str> {
        neighbors.iter().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn top_record_ranks_first() {
        let result = run("mewtwo", StatField::Total);

        assert_eq!(result.rank, 1);
        assert_eq!(result.population, 9);
        assert!((result.percentile - 8.0 / 9.0 * 100.0).abs() < 1e-9);
        assert!(result.above.is_empty());
        assert_eq!(
            neighbor_names(&result.below),
            vec!["Metagross", "Snorlax", "Charizard"]
        );
    }

    #[test]
    fn bottom_record_has_zero_percentile() {
        let result = run("Pika", StatField::Total);

        assert_eq!(result.rank, 9);
        assert!(result.percentile.abs() < f64::EPSILON);
        assert!(result.below.is_empty());
        assert_eq!(
            neighbor_names(&result.above),
            vec!["Jolteon", "Gengar", "Raichu"]
        );
    }

    #[test]
    fn ties_rank_in_table_order() {
        let jolteon = run("Jolteon", StatField::Speed);
        let mewtwo = run("Mewtwo", StatField::Speed);

        assert_eq!(jolteon.rank, 1);
        assert_eq!(mewtwo.rank, 2);
        assert_eq!(mewtwo.value, jolteon.value);
        assert_eq!(mewtwo.above[0].rank, 1);
    }

    #[test]
    fn unknown_name_is_not_found() {
        let err = stat_percentile(
            &fixture_table(),
            &PercentileQuery {
                name: "Missingno".to_string(),
                stat: StatField::Hp,
            },
        )
        .unwrap_err();

        assert_eq!(err, QueryError::not_found("Missingno"));
    }

    #[test]
    fn empty_table_is_an_empty_outcome() {
        let outcome = stat_percentile(
            &DatasetTable::empty(),
            &PercentileQuery {
                name: "Pika".to_string(),
                stat: StatField::Hp,
            },
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Empty(EmptyReason::EmptyTable));
    }
}
