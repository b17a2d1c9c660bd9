//! Record model: the typed row, its field vocabulary, and the discrete
//! matchup multiplier set.

mod element;
mod field;
mod multiplier;
mod record;

pub use element::ElementType;
pub use field::{NumericField, StatField};
pub use multiplier::Multiplier;
pub use record::{BaseStats, EntityRecord, Matchups, name_key};
