use crate::{
    error::QueryError,
    model::{ElementType, EntityRecord, StatField},
    obs::sink,
    query::{EmptyReason, Outcome, RowCount},
    table::DatasetTable,
};
use serde::Serialize;

///
/// StatSummary
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatSummary {
    pub stat: StatField,
    pub mean: f64,
    pub median: f64,
    pub min: u16,
    pub max: u16,
}

impl StatSummary {
    // Callers pass at least one value.
    fn from_values(stat: StatField, mut values: Vec<u16>) -> Self {
        values.sort_unstable();

        Self {
            stat,
            mean: mean(&values),
            median: median(&values),
            min: values.first().copied().unwrap_or_default(),
            max: values.last().copied().unwrap_or_default(),
        }
    }
}

///
/// TypeStatsQuery
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TypeStatsQuery {
    pub element: ElementType,

    /// Match the primary type only instead of either slot.
    pub primary_only: bool,
}

///
/// TypeStatsResult
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TypeStatsResult {
    pub element: ElementType,
    pub primary_only: bool,
    pub count: usize,

    /// One summary per stat, total last.
    pub stats: Vec<StatSummary>,

    /// Highest total in the group; the first such record on ties.
    pub strongest: EntityRecord,
}

impl RowCount for TypeStatsResult {
    fn row_count(&self) -> usize {
        self.count
    }
}

/// Grouped statistics for every record of one type.
pub fn aggregate_by_type(
    table: &DatasetTable,
    query: &TypeStatsQuery,
) -> Result<Outcome<TypeStatsResult>, QueryError> {
    const OP: &str = "aggregate_by_type";

    sink::observe(OP, || {
        if table.is_empty() {
            return Ok(Outcome::Empty(EmptyReason::EmptyTable));
        }

        let records = table.records();
        sink::scanned(OP, records.len());

        let group: Vec<&EntityRecord> = records
            .iter()
            .filter(|record| {
                if query.primary_only {
                    record.primary_type == query.element
                } else {
                    record.has_type(query.element)
                }
            })
            .collect();

        let Some(strongest) = group
            .iter()
            .copied()
            .reduce(|best, record| if record.total > best.total { record } else { best })
        else {
            return Ok(Outcome::Empty(EmptyReason::NoMatches));
        };

        let stats = StatField::ALL
            .into_iter()
            .map(|stat| {
                let values = group.iter().map(|record| stat.value(record)).collect();
                StatSummary::from_values(stat, values)
            })
            .collect();

        Ok(Outcome::Found(TypeStatsResult {
            element: query.element,
            primary_only: query.primary_only,
            count: group.len(),
            stats,
            strongest: strongest.clone(),
        }))
    })
}

///
/// DistributionQuery
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DistributionQuery {
    pub bin_size: u32,
    pub include_legendaries: bool,
}

///
/// DistributionResult
///
/// Histogram of totals. Bins are half-open, contiguous from the bin holding
/// the minimum through the bin holding the maximum, and include empty bins.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DistributionResult {
    pub population: usize,
    pub bin_size: u32,
    pub min: u16,
    pub max: u16,
    pub mean: f64,
    pub median: f64,
    pub bins: Vec<Bin>,
}

impl RowCount for DistributionResult {
    fn row_count(&self) -> usize {
        self.bins.len()
    }
}

///
/// Bin
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Bin {
    /// Inclusive.
    pub lower: u32,

    /// Exclusive.
    pub upper: u32,
    pub count: usize,

    /// Share of the whole population, empty bins included in the denominator.
    pub percentage: f64,
}

pub fn bst_distribution(
    table: &DatasetTable,
    query: &DistributionQuery,
) -> Result<Outcome<DistributionResult>, QueryError> {
    const OP: &str = "bst_distribution";

    sink::observe(OP, || {
        if query.bin_size == 0 {
            return Err(QueryError::invalid_argument(
                "bin_size",
                "bin width must be positive",
            ));
        }
        if table.is_empty() {
            return Ok(Outcome::Empty(EmptyReason::EmptyTable));
        }

        let records = table.records();
        sink::scanned(OP, records.len());

        let mut totals: Vec<u16> = records
            .iter()
            .filter(|record| query.include_legendaries || !record.is_legendary)
            .map(|record| record.total)
            .collect();
        totals.sort_unstable();

        let (Some(&min), Some(&max)) = (totals.first(), totals.last()) else {
            return Ok(Outcome::Empty(EmptyReason::NoMatches));
        };

        Ok(Outcome::Found(DistributionResult {
            population: totals.len(),
            bin_size: query.bin_size,
            min,
            max,
            mean: mean(&totals),
            median: median(&totals),
            bins: histogram(&totals, query.bin_size),
        }))
    })
}

// Bucket sorted values into contiguous half-open bins of `width`.
fn histogram(sorted: &[u16], width: u32) -> Vec<Bin> {
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Vec::new();
    };

    let start = u32::from(min) / width;
    let end = u32::from(max) / width;
    let mut counts = vec![0usize; (end - start + 1) as usize];
    for &value in sorted {
        counts[(u32::from(value) / width - start) as usize] += 1;
    }

    let population = sorted.len() as f64;
    (start..=end)
        .zip(counts)
        .map(|(slot, count)| Bin {
            lower: slot * width,
            upper: slot * width + width,
            count,
            percentage: count as f64 / population * 100.0,
        })
        .collect()
}

fn mean(values: &[u16]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    values.iter().copied().map(f64::from).sum::<f64>() / values.len() as f64
}

// Midpoint of the two central values for even lengths.
fn median(sorted: &[u16]) -> f64 {
    let len = sorted.len();
    if len == 0 {
        return 0.0;
    }

    let upper = f64::from(sorted[len / 2]);
    if len % 2 == 0 {
        f64::midpoint(f64::from(sorted[len / 2 - 1]), upper)
    } else {
        upper
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{RecordFixture, fixture_table, table_of};
    use proptest::prelude::*;

    fn summary(result: &TypeStatsResult, stat: StatField) -> &StatSummary {
        result.stats.iter().find(|s| s.stat == stat).unwrap()
    }

    fn record_with_total(id: u32, total: u16) -> EntityRecord {
        // Spread the total over six stats, remainder on hp.
        let base = total / 6;
        let mut stats = [base as u8; 6];
        stats[0] += (total - base * 6) as u8;

        RecordFixture::new(id, &format!("R{id}"), ElementType::Normal, stats).build()
    }

    fn distribution(table: &DatasetTable, bin_size: u32, include_legendaries: bool) -> DistributionResult {
        bst_distribution(
            table,
            &DistributionQuery {
                bin_size,
                include_legendaries,
            },
        )
        .unwrap()
        .found()
        .unwrap()
    }

    #[test]
    fn electric_group_statistics() {
        let result = aggregate_by_type(
            &fixture_table(),
            &TypeStatsQuery {
                element: ElementType::Electric,
                primary_only: false,
            },
        )
        .unwrap()
        .found()
        .unwrap();

        assert_eq!(result.count, 3);
        assert_eq!(result.stats.len(), 7);
        assert_eq!(result.strongest.name, "Jolteon");

        let hp = summary(&result, StatField::Hp);
        assert_eq!((hp.min, hp.max), (35, 65));
        assert!((hp.median - 60.0).abs() < f64::EPSILON);
        assert!((hp.mean - 160.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn primary_only_narrows_the_group() {
        let either = aggregate_by_type(
            &fixture_table(),
            &TypeStatsQuery {
                element: ElementType::Psychic,
                primary_only: false,
            },
        )
        .unwrap()
        .found()
        .unwrap();
        let primary = aggregate_by_type(
            &fixture_table(),
            &TypeStatsQuery {
                element: ElementType::Psychic,
                primary_only: true,
            },
        )
        .unwrap()
        .found()
        .unwrap();

        assert_eq!(either.count, 2);
        assert!((summary(&either, StatField::Total).median - 640.0).abs() < f64::EPSILON);
        assert_eq!(primary.count, 1);
        assert_eq!(primary.strongest.name, "Mewtwo");
    }

    #[test]
    fn strongest_tie_keeps_the_first_record() {
        let table = table_of(vec![
            RecordFixture::new(1, "First", ElementType::Ice, [50; 6]).build(),
            RecordFixture::new(2, "Second", ElementType::Ice, [50; 6]).build(),
        ]);

        let result = aggregate_by_type(
            &table,
            &TypeStatsQuery {
                element: ElementType::Ice,
                primary_only: true,
            },
        )
        .unwrap()
        .found()
        .unwrap();

        assert_eq!(result.strongest.name, "First");
    }

    #[test]
    fn absent_type_reports_no_matches() {
        let outcome = aggregate_by_type(
            &fixture_table(),
            &TypeStatsQuery {
                element: ElementType::Dragon,
                primary_only: false,
            },
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Empty(EmptyReason::NoMatches));
    }

    #[test]
    fn scenario_c_three_totals() {
        let table = table_of(vec![
            record_with_total(1, 320),
            record_with_total(2, 450),
            record_with_total(3, 610),
        ]);

        let result = distribution(&table, 100, true);
        let occupied: Vec<(u32, u32, usize)> = result
            .bins
            .iter()
            .filter(|bin| bin.count > 0)
            .map(|bin| (bin.lower, bin.upper, bin.count))
            .collect();

        assert_eq!(occupied, vec![(300, 400, 1), (400, 500, 1), (600, 700, 1)]);
        assert_eq!(result.bins.len(), 4);
        assert_eq!(result.bins[2].count, 0);
        for bin in result.bins.iter().filter(|bin| bin.count > 0) {
            assert!((bin.percentage - 100.0 / 3.0).abs() < 1e-9);
        }
        assert!((result.median - 450.0).abs() < f64::EPSILON);
    }

    #[test]
    fn legendaries_can_be_excluded() {
        let with = distribution(&fixture_table(), 100, true);
        let without = distribution(&fixture_table(), 100, false);

        assert_eq!(with.population, 9);
        assert_eq!(with.max, 680);
        assert_eq!(without.population, 8);
        assert_eq!(without.max, 600);
    }

    #[test]
    fn zero_bin_size_is_rejected_before_the_degraded_check() {
        let err = bst_distribution(
            &DatasetTable::empty(),
            &DistributionQuery {
                bin_size: 0,
                include_legendaries: true,
            },
        )
        .unwrap_err();

        assert!(matches!(err, QueryError::InvalidArgument { .. }));
    }

    #[test]
    fn median_averages_the_central_pair() {
        assert!((median(&[1, 2, 3, 4]) - 2.5).abs() < f64::EPSILON);
        assert!((median(&[7]) - 7.0).abs() < f64::EPSILON);
    }

    proptest! {
        #[test]
        fn binning_conserves_the_population(
            totals in prop::collection::vec(6u16..=1530, 1..40),
            width in 1u32..300,
        ) {
            let mut sorted = totals.clone();
            sorted.sort_unstable();
            let bins = histogram(&sorted, width);

            prop_assert_eq!(bins.iter().map(|bin| bin.count).sum::<usize>(), totals.len());
            let percent: f64 = bins.iter().map(|bin| bin.percentage).sum();
            prop_assert!((percent - 100.0).abs() < 1e-6);
            prop_assert!(bins.windows(2).all(|pair| pair[0].upper == pair[1].lower));
            prop_assert!(bins[0].lower <= u32::from(sorted[0]));
            prop_assert!(u32::from(sorted[sorted.len() - 1]) < bins[bins.len() - 1].upper);
        }
    }
}
