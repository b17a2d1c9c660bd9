//! Read-only analytics engines.
//!
//! Every operation takes the shared table plus a typed query and returns
//! `Result<Outcome<T>, QueryError>`. Arguments are validated first, then the
//! degraded (empty) table is reported, and only then does any scan begin.

pub mod aggregate;
pub mod compare;
pub mod lookup;
pub mod matchup;
pub mod rank;
pub mod similar;

pub use aggregate::{
    Bin, DistributionQuery, DistributionResult, StatSummary, TypeStatsQuery, TypeStatsResult,
    aggregate_by_type, bst_distribution,
};
pub use compare::{CompareQuery, HeadToHead, Side, StatComparison, Winner, compare_head_to_head};
pub use lookup::{
    AbilityQuery, ExtremeEntry, ExtremeMetric, ExtremeQuery, ExtremeResult, Extremity,
    GenerationQuery, Leaderboard, ListResult, RankedRecord, RecordDetails, RecordQuery,
    StatRangeQuery, TopQuery, TypeCombinationQuery, by_ability, by_generation,
    by_type_combination, extreme, get_record, stat_range, top_by_stat,
};
pub use matchup::{
    AttackMultiplier, EffectivenessQuery, EffectivenessResult, MatchupProfile, ProfileResult,
    ResistantMatch, ResistantQuery, ResistantResult, Verdict, categorize, find_resistant,
    resistances_and_weaknesses, type_effectiveness,
};
pub use rank::{Neighbor, PercentileQuery, PercentileResult, stat_percentile};
pub use similar::{SimilarMatch, SimilarQuery, SimilarResult, find_similar};
