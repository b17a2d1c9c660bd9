//! Query vocabulary shared by every engine: outcomes, sort direction,
//! stable field ordering, and the predicate compiler.

mod filter;
mod order;
pub mod predicate;

pub use filter::{FilterQuery, FilterResult, filter};
pub use order::{compare_field, sort_indices};

use crate::{
    error::QueryError,
    model::{ElementType, NumericField, StatField},
};
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// EmptyReason
///
/// Why a successful query returned nothing.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// The table failed to load and is serving no rows.
    #[display("empty_table")]
    EmptyTable,

    #[display("no_matches")]
    NoMatches,
}

///
/// Outcome
///
/// Success payload of an engine operation.
/// Empty results are reported here, never as errors.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<T> {
    Found(T),
    Empty(EmptyReason),
}

impl<R> Outcome<Vec<R>> {
    /// `Found` for a non-empty row set, `Empty(NoMatches)` otherwise.
    #[must_use]
    pub fn from_rows(rows: Vec<R>) -> Self {
        if rows.is_empty() {
            Self::Empty(EmptyReason::NoMatches)
        } else {
            Self::Found(rows)
        }
    }
}

impl<T> Outcome<T> {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty(_))
    }

    #[must_use]
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Empty(_) => None,
        }
    }

    #[must_use]
    pub const fn empty_reason(&self) -> Option<EmptyReason> {
        match self {
            Self::Found(_) => None,
            Self::Empty(reason) => Some(*reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Found(value) => Outcome::Found(f(value)),
            Self::Empty(reason) => Outcome::Empty(reason),
        }
    }
}

///
/// RowCount
///
/// Number of rows a successful result carries, for metrics.
///

pub trait RowCount {
    fn row_count(&self) -> usize;
}

impl<T> RowCount for Vec<T> {
    fn row_count(&self) -> usize {
        self.len()
    }
}

///
/// Direction
///
/// Sort direction for list queries. Descending unless requested otherwise.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

impl Direction {
    #[must_use]
    pub const fn from_ascending(ascending: bool) -> Self {
        if ascending { Self::Asc } else { Self::Desc }
    }

    #[must_use]
    pub const fn is_ascending(self) -> bool {
        matches!(self, Self::Asc)
    }
}

/// Resolve an optional `sort_by` name, falling back to the default field.
#[must_use]
pub fn resolve_sort_field(sort_by: Option<&str>) -> NumericField {
    let Some(name) = sort_by else {
        return NumericField::DEFAULT_SORT;
    };

    NumericField::parse(name).unwrap_or_else(|| {
        tracing::debug!(sort_by = name, "unknown sort field; sorting by total");
        NumericField::DEFAULT_SORT
    })
}

/// Resolve a type name argument.
pub fn parse_element(argument: &str, name: &str) -> Result<ElementType, QueryError> {
    ElementType::parse(name)
        .ok_or_else(|| QueryError::invalid_argument(argument, format!("unknown type '{name}'")))
}

/// Resolve a stat name argument, aliases included.
pub fn parse_stat(argument: &str, name: &str) -> Result<StatField, QueryError> {
    StatField::parse(name)
        .ok_or_else(|| QueryError::invalid_argument(argument, format!("unknown stat '{name}'")))
}

pub fn check_generation(argument: &str, generation: u8) -> Result<(), QueryError> {
    if (1..=9).contains(&generation) {
        Ok(())
    } else {
        Err(QueryError::invalid_argument(
            argument,
            format!("generation {generation} is outside 1..=9"),
        ))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_distinguishes_empty() {
        assert_eq!(
            Outcome::<Vec<u8>>::from_rows(Vec::new()),
            Outcome::Empty(EmptyReason::NoMatches)
        );
        assert_eq!(Outcome::from_rows(vec![1]), Outcome::Found(vec![1]));
    }

    #[test]
    fn unknown_sort_field_falls_back_to_total() {
        assert_eq!(
            resolve_sort_field(Some("coolness")),
            NumericField::Stat(StatField::Total)
        );
        assert_eq!(resolve_sort_field(Some("Speed")), NumericField::Stat(StatField::Speed));
        assert_eq!(resolve_sort_field(None), NumericField::DEFAULT_SORT);
    }

    #[test]
    fn argument_parsers_name_the_argument() {
        assert_eq!(parse_stat("stat", "SpAtk"), Ok(StatField::SpAttack));
        assert_eq!(parse_element("type1", "FIGHT"), Ok(ElementType::Fighting));
        assert_eq!(
            parse_stat("stat", "luck"),
            Err(QueryError::invalid_argument("stat", "unknown stat 'luck'"))
        );
        assert!(check_generation("generation", 0).is_err());
        assert!(check_generation("generation", 9).is_ok());
    }

    #[test]
    fn direction_defaults_to_descending() {
        assert_eq!(Direction::default(), Direction::Desc);
        assert!(Direction::from_ascending(true).is_ascending());
    }
}
