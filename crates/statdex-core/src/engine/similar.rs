use crate::{
    BASE_STAT_COUNT,
    error::QueryError,
    model::{EntityRecord, name_key},
    obs::sink,
    query::{EmptyReason, Outcome, RowCount},
    table::DatasetTable,
};
use serde::Serialize;

const OP: &str = "find_similar";

type Features = [f64; BASE_STAT_COUNT];

///
/// SimilarQuery
///

#[derive(Clone, Debug, PartialEq)]
pub struct SimilarQuery {
    pub name: String,
    pub limit: usize,

    /// Inclusive lower bound on the score, within [0, 1].
    pub min_similarity: f64,
}

///
/// SimilarResult
///
/// Scores are relative: distances are normalized by the largest distance
/// seen in this call, so scores for different references are not comparable.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimilarResult {
    pub reference: EntityRecord,
    pub max_distance: f64,
    pub matches: Vec<SimilarMatch>,
}

impl RowCount for SimilarResult {
    fn row_count(&self) -> usize {
        self.matches.len()
    }
}

///
/// SimilarMatch
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimilarMatch {
    pub similarity: f64,
    pub distance: f64,
    pub record: EntityRecord,
}

/// Nearest neighbors of one record in standardized base-stat space.
pub fn find_similar(
    table: &DatasetTable,
    query: &SimilarQuery,
) -> Result<Outcome<SimilarResult>, QueryError> {
    sink::observe(OP, || {
        if !(0.0..=1.0).contains(&query.min_similarity) {
            return Err(QueryError::invalid_argument(
                "min_similarity",
                format!("{} is outside [0, 1]", query.min_similarity),
            ));
        }
        if table.is_empty() {
            return Ok(Outcome::Empty(EmptyReason::EmptyTable));
        }

        let (reference_index, reference) = table.require(&query.name)?;
        let records = table.records();
        sink::scanned(OP, records.len());

        let standardized = standardize(records);
        let origin = standardized[reference_index];
        let reference_key = reference.name_key();

        let candidates: Vec<(usize, f64)> = standardized
            .iter()
            .enumerate()
            .filter(|&(index, _)| {
                index != reference_index && name_key(&records[index].name) != reference_key
            })
            .map(|(index, features)| (index, euclidean(&origin, features)))
            .collect();

        let max_distance = candidates
            .iter()
            .map(|&(_, distance)| distance)
            .fold(0.0_f64, f64::max);

        let mut matches: Vec<SimilarMatch> = candidates
            .into_iter()
            .map(|(index, distance)| SimilarMatch {
                similarity: similarity(distance, max_distance),
                distance,
                record: records[index].clone(),
            })
            .filter(|candidate| candidate.similarity >= query.min_similarity)
            .collect();

        if matches.is_empty() {
            return Ok(Outcome::Empty(EmptyReason::NoMatches));
        }

        // Stable: equal scores keep table order.
        matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        matches.truncate(query.limit);

        Ok(Outcome::Found(SimilarResult {
            reference: reference.clone(),
            max_distance,
            matches,
        }))
    })
}

// Z-score every base stat with the population mean and deviation of the
// current table. A constant column standardizes to zero.
fn standardize(records: &[EntityRecord]) -> Vec<Features> {
    let raw: Vec<Features> = records
        .iter()
        .map(|record| record.stats.to_array().map(f64::from))
        .collect();
    let count = raw.len() as f64;

    let mut mean = [0.0; BASE_STAT_COUNT];
    for features in &raw {
        for (slot, value) in features.iter().enumerate() {
            mean[slot] += value / count;
        }
    }

    let mut deviation = [0.0; BASE_STAT_COUNT];
    for features in &raw {
        for (slot, value) in features.iter().enumerate() {
            deviation[slot] += (value - mean[slot]).powi(2) / count;
        }
    }
    let deviation = deviation.map(f64::sqrt);

    raw.into_iter()
        .map(|features| {
            std::array::from_fn(|slot| {
                if deviation[slot] > 0.0 {
                    (features[slot] - mean[slot]) / deviation[slot]
                } else {
                    0.0
                }
            })
        })
        .collect()
}

fn euclidean(a: &Features, b: &Features) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

fn similarity(distance: f64, max_distance: f64) -> f64 {
    if max_distance > 0.0 {
        (1.0 - distance / max_distance).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::ElementType,
        test_fixtures::{RecordFixture, fixture_table, table_of},
    };
    use proptest::prelude::*;

    fn query(name: &str, limit: usize, min_similarity: f64) -> SimilarQuery {
        SimilarQuery {
            name: name.to_string(),
            limit,
            min_similarity,
        }
    }

    #[test]
    fn reference_is_never_returned() {
        let result = find_similar(&fixture_table(), &query("Pika", 20, 0.0))
            .unwrap()
            .found()
            .unwrap();

        assert_eq!(result.matches.len(), 8);
        assert!(result.matches.iter().all(|m| m.record.name != "Pika"));
    }

    #[test]
    fn closest_record_comes_first_and_farthest_scores_zero() {
        let result = find_similar(&fixture_table(), &query("Pika", 20, 0.0))
            .unwrap()
            .found()
            .unwrap();

        assert_eq!(result.matches[0].record.name, "Raichu");
        let last = result.matches.last().unwrap();
        assert!(last.similarity.abs() < 1e-12);
        assert!((last.distance - result.max_distance).abs() < 1e-12);
        assert!(
            result
                .matches
                .windows(2)
                .all(|pair| pair[0].similarity >= pair[1].similarity)
        );
    }

    #[test]
    fn limit_and_threshold_apply() {
        let result = find_similar(&fixture_table(), &query("pika", 2, 0.0))
            .unwrap()
            .found()
            .unwrap();
        assert_eq!(result.matches.len(), 2);

        let strict = find_similar(&fixture_table(), &query("Pika", 20, 1.0)).unwrap();
        assert!(strict.found().is_none_or(|r| r.matches.iter().all(|m| m.similarity >= 1.0)));
    }

    #[test]
    fn identical_stats_are_all_fully_similar() {
        let stats = [50, 50, 50, 50, 50, 50];
        let table = table_of(vec![
            RecordFixture::new(1, "A", ElementType::Normal, stats).build(),
            RecordFixture::new(2, "B", ElementType::Fire, stats).build(),
            RecordFixture::new(3, "C", ElementType::Water, stats).build(),
        ]);

        let result = find_similar(&table, &query("A", 5, 0.7))
            .unwrap()
            .found()
            .unwrap();

        assert_eq!(result.max_distance, 0.0);
        assert_eq!(
            result
                .matches
                .iter()
                .map(|m| (m.record.name.as_str(), m.similarity))
                .collect::<Vec<_>>(),
            vec![("B", 1.0), ("C", 1.0)]
        );
    }

    #[test]
    fn single_record_table_has_no_neighbors() {
        let table = table_of(vec![
            RecordFixture::new(1, "Solo", ElementType::Normal, [10; 6]).build(),
        ]);

        assert_eq!(
            find_similar(&table, &query("Solo", 5, 0.0)).unwrap(),
            Outcome::Empty(EmptyReason::NoMatches)
        );
    }

    #[test]
    fn threshold_outside_unit_interval_is_rejected() {
        let err = find_similar(&DatasetTable::empty(), &query("Pika", 5, 1.5)).unwrap_err();

        assert!(matches!(err, QueryError::InvalidArgument { .. }));
    }

    fn arb_stats() -> impl Strategy<Value = Vec<[u8; 6]>> {
        prop::collection::vec(prop::array::uniform6(1u8..=255), 2..12)
    }

    proptest! {
        #[test]
        fn scores_stay_within_unit_interval(stats in arb_stats(), pick in any::<prop::sample::Index>()) {
            let records: Vec<EntityRecord> = stats
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let id = u32::try_from(i).unwrap() + 1;
                    RecordFixture::new(id, &format!("R{i}"), ElementType::Normal, *s).build()
                })
                .collect();
            let reference = format!("R{}", pick.index(records.len()));
            let table = table_of(records);

            let outcome = find_similar(&table, &query(&reference, usize::MAX, 0.0)).unwrap();
            let result = outcome.found().unwrap();

            prop_assert_eq!(result.matches.len(), table.len() - 1);
            for m in &result.matches {
                prop_assert!((0.0..=1.0).contains(&m.similarity));
                prop_assert_ne!(&m.record.name, &reference);
            }
        }
    }
}
