//! Core runtime for Statdex: the immutable dataset table, the record model,
//! the predicate compiler, and the read-only analytics engines built on them.
#![warn(unreachable_pub)]

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod obs;
pub mod query;
pub mod table;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// CONSTANTS
///

/// Number of matchup categories carried by every record (`against_<type>`).
pub const MATCHUP_TYPE_COUNT: usize = 18;

/// Number of base stats that make up a record's total.
pub const BASE_STAT_COUNT: usize = 6;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// Engines, loaders, and errors stay behind their own modules.
///

pub mod prelude {
    pub use crate::{
        model::{BaseStats, ElementType, EntityRecord, Matchups, NumericField, StatField},
        query::{Direction, EmptyReason, Outcome},
        table::{DatasetTable, TableHandle},
    };
}
