use crate::{
    model::{EntityRecord, NumericField},
    query::Direction,
};
use std::cmp::Ordering;

/// Compare two records on one field.
/// Absent values order after present ones in either direction.
#[must_use]
pub fn compare_field(
    a: &EntityRecord,
    b: &EntityRecord,
    field: NumericField,
    direction: Direction,
) -> Ordering {
    match (field.value(a), field.value(b)) {
        (Some(left), Some(right)) => {
            let ordering = left.total_cmp(&right);
            match direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort of record indices; ties keep their incoming order.
pub fn sort_indices(
    records: &[EntityRecord],
    indices: &mut [usize],
    field: NumericField,
    direction: Direction,
) {
    indices.sort_by(|&a, &b| compare_field(&records[a], &records[b], field, direction));
}

///
/// TESTS
///
