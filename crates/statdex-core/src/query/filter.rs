use crate::{
    error::QueryError,
    model::{EntityRecord, NumericField},
    obs::sink,
    query::{
        Direction, EmptyReason, Outcome, RowCount, predicate::FilterConfig, resolve_sort_field,
        sort_indices,
    },
    table::DatasetTable,
};
use serde::Serialize;

const OP: &str = "filter_multi_criteria";

///
/// FilterQuery
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterQuery {
    pub filter: FilterConfig,

    /// Unknown names fall back to `total`.
    pub sort_by: Option<String>,
    pub ascending: bool,
    pub limit: usize,
}

///
/// FilterResult
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FilterResult {
    /// Matches before truncation.
    pub matched: usize,
    pub applied: Vec<String>,
    pub sort_by: NumericField,
    pub direction: Direction,
    pub records: Vec<EntityRecord>,
}

impl RowCount for FilterResult {
    fn row_count(&self) -> usize {
        self.records.len()
    }
}

/// Multi-criteria filter: compile, mask, stable sort, truncate.
pub fn filter(
    table: &DatasetTable,
    query: &FilterQuery,
) -> Result<Outcome<FilterResult>, QueryError> {
    sink::observe(OP, || {
        let compiled = query.filter.compile()?;
        let sort_by = resolve_sort_field(query.sort_by.as_deref());
        let direction = Direction::from_ascending(query.ascending);

        if table.is_empty() {
            return Ok(Outcome::Empty(EmptyReason::EmptyTable));
        }

        let records = table.records();
        sink::scanned(OP, records.len());

        let mut indices = compiled.predicate.select(records);
        if indices.is_empty() {
            return Ok(Outcome::Empty(EmptyReason::NoMatches));
        }

        let matched = indices.len();
        sort_indices(records, &mut indices, sort_by, direction);
        indices.truncate(query.limit);

        tracing::debug!(
            matched,
            returned = indices.len(),
            applied = ?compiled.applied,
            "filter evaluated"
        );

        Ok(Outcome::Found(FilterResult {
            matched,
            applied: compiled.applied,
            sort_by,
            direction,
            records: indices.iter().map(|&i| records[i].clone()).collect(),
        }))
    })
}

///
/// TESTS
///
