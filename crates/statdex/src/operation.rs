use derive_more::Display;
use serde::Serialize;

///
/// OperationKind
///
/// Every operation the registry can dispatch, by stable name.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    #[display("filter_multi_criteria")]
    FilterMultiCriteria,
    #[display("stat_percentile")]
    StatPercentile,
    #[display("find_similar")]
    FindSimilar,
    #[display("type_effectiveness")]
    TypeEffectiveness,
    #[display("resistances_and_weaknesses")]
    ResistancesAndWeaknesses,
    #[display("find_resistant")]
    FindResistant,
    #[display("aggregate_by_type")]
    AggregateByType,
    #[display("bst_distribution")]
    BstDistribution,
    #[display("compare_head_to_head")]
    CompareHeadToHead,
    #[display("get_record")]
    GetRecord,
    #[display("stat_range")]
    StatRange,
    #[display("top_by_stat")]
    TopByStat,
    #[display("by_generation")]
    ByGeneration,
    #[display("by_type_combination")]
    ByTypeCombination,
    #[display("by_ability")]
    ByAbility,
    #[display("extreme")]
    Extreme,
}

impl OperationKind {
    pub const ALL: [Self; 16] = [
        Self::FilterMultiCriteria,
        Self::StatPercentile,
        Self::FindSimilar,
        Self::TypeEffectiveness,
        Self::ResistancesAndWeaknesses,
        Self::FindResistant,
        Self::AggregateByType,
        Self::BstDistribution,
        Self::CompareHeadToHead,
        Self::GetRecord,
        Self::StatRange,
        Self::TopByStat,
        Self::ByGeneration,
        Self::ByTypeCombination,
        Self::ByAbility,
        Self::Extreme,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FilterMultiCriteria => "filter_multi_criteria",
            Self::StatPercentile => "stat_percentile",
            Self::FindSimilar => "find_similar",
            Self::TypeEffectiveness => "type_effectiveness",
            Self::ResistancesAndWeaknesses => "resistances_and_weaknesses",
            Self::FindResistant => "find_resistant",
            Self::AggregateByType => "aggregate_by_type",
            Self::BstDistribution => "bst_distribution",
            Self::CompareHeadToHead => "compare_head_to_head",
            Self::GetRecord => "get_record",
            Self::StatRange => "stat_range",
            Self::TopByStat => "top_by_stat",
            Self::ByGeneration => "by_generation",
            Self::ByTypeCombination => "by_type_combination",
            Self::ByAbility => "by_ability",
            Self::Extreme => "extreme",
        }
    }

    /// Exact-name lookup; operation names are case-sensitive.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::FilterMultiCriteria => {
                "Filter records by type, stat bounds, physical size, generation, legendary status and abilities"
            }
            Self::StatPercentile => {
                "Rank one record on a stat and report its percentile and neighbors"
            }
            Self::FindSimilar => "Find records with the closest standardized base-stat profile",
            Self::TypeEffectiveness => {
                "Multipliers of one or two attacking types against a defending record"
            }
            Self::ResistancesAndWeaknesses => {
                "Partition all attacking types against one record by multiplier"
            }
            Self::FindResistant => "Find records resisting every listed attacking type",
            Self::AggregateByType => "Mean, median, min and max of every stat for one type",
            Self::BstDistribution => "Histogram of base stat totals",
            Self::CompareHeadToHead => {
                "Compare two records stat by stat and by best attacking multiplier"
            }
            Self::GetRecord => "Full details of one record",
            Self::StatRange => "Records whose stat lies within an inclusive range",
            Self::TopByStat => "Leaderboard for one stat",
            Self::ByGeneration => "Records introduced in one generation",
            Self::ByTypeCombination => "Records with a primary type and optional secondary type",
            Self::ByAbility => "Records carrying an ability",
            Self::Extreme => "Records with the highest or lowest physical or breeding metric",
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_round_trip_and_are_unique() {
        let mut seen = HashSet::new();

        for kind in OperationKind::ALL {
            assert_eq!(OperationKind::parse(kind.as_str()), Some(kind));
            assert_eq!(kind.to_string(), kind.as_str());
            assert!(seen.insert(kind.as_str()));
        }
        assert_eq!(seen.len(), 16);
    }

    #[test]
    fn parse_is_exact() {
        assert_eq!(OperationKind::parse("Extreme"), None);
        assert_eq!(OperationKind::parse("get_pokemon_stats"), None);
    }
}
