//! Predicate tree and its evaluation into boolean masks over the table.
//!
//! The tree is schema-aware and already validated: every leaf names a
//! resolved field or type, so evaluation never fails.

mod compile;

#[cfg(test)]
mod tests;

pub use compile::{CompiledFilter, FilterConfig};

use crate::model::{ElementType, EntityRecord, NumericField};
use std::ops::{BitAnd, BitOr};

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Gte,
    Lte,
}

impl CompareOp {
    #[must_use]
    #[expect(clippy::float_cmp)]
    pub fn eval(self, left: f64, right: f64) -> bool {
        match self {
            Self::Eq => left == right,
            Self::Gte => left >= right,
            Self::Lte => left <= right,
        }
    }
}

///
/// TypeSlot
/// Which type column a type test reads.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TypeSlot {
    Primary,
    Secondary,
    Either,
}

///
/// Predicate
///

#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    True,
    And(Vec<Self>),
    Or(Vec<Self>),

    /// Numeric comparison; a record lacking the field never matches.
    Compare {
        field: NumericField,
        op: CompareOp,
        value: f64,
    },
    Type {
        slot: TypeSlot,
        element: ElementType,
    },

    /// Secondary type is absent.
    MonoType,
    Legendary(bool),

    /// Any ability in the set; names are stored lowercase.
    AnyAbility(Vec<String>),
}

impl Predicate {
    #[must_use]
    pub const fn compare(field: NumericField, op: CompareOp, value: f64) -> Self {
        Self::Compare { field, op, value }
    }

    #[must_use]
    pub const fn has_type(slot: TypeSlot, element: ElementType) -> Self {
        Self::Type { slot, element }
    }

    /// Ability membership test; lowercases the wanted names once.
    #[must_use]
    pub fn any_ability<S: AsRef<str>>(abilities: &[S]) -> Self {
        Self::AnyAbility(
            abilities
                .iter()
                .map(|ability| ability.as_ref().trim().to_lowercase())
                .collect(),
        )
    }

    #[must_use]
    pub fn matches(&self, record: &EntityRecord) -> bool {
        match self {
            Self::True => true,
            Self::And(children) => children.iter().all(|child| child.matches(record)),
            Self::Or(children) => children.iter().any(|child| child.matches(record)),
            Self::Compare { field, op, value } => field
                .value(record)
                .is_some_and(|actual| op.eval(actual, *value)),
            Self::Type { slot, element } => match slot {
                TypeSlot::Primary => record.primary_type == *element,
                TypeSlot::Secondary => record.secondary_type == Some(*element),
                TypeSlot::Either => record.has_type(*element),
            },
            Self::MonoType => record.secondary_type.is_none(),
            Self::Legendary(wanted) => record.is_legendary == *wanted,
            Self::AnyAbility(wanted) => record.has_any_ability(wanted),
        }
    }

    /// Evaluate against every record, in table order.
    #[must_use]
    pub fn mask(&self, records: &[EntityRecord]) -> Vec<bool> {
        records.iter().map(|record| self.matches(record)).collect()
    }

    /// Indices of matching records, in table order.
    #[must_use]
    pub fn select(&self, records: &[EntityRecord]) -> Vec<usize> {
        self.mask(records)
            .into_iter()
            .enumerate()
            .filter_map(|(index, keep)| keep.then_some(index))
            .collect()
    }
}

impl BitAnd for Predicate {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::True, other) | (other, Self::True) => other,
            (Self::And(mut left), Self::And(right)) => {
                left.extend(right);
                Self::And(left)
            }
            (Self::And(mut left), other) => {
                left.push(other);
                Self::And(left)
            }
            (left, right) => Self::And(vec![left, right]),
        }
    }
}

impl BitOr for Predicate {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Or(mut left), Self::Or(right)) => {
                left.extend(right);
                Self::Or(left)
            }
            (Self::Or(mut left), other) => {
                left.push(other);
                Self::Or(left)
            }
            (left, right) => Self::Or(vec![left, right]),
        }
    }
}
