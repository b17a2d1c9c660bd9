//! Statically typed inputs, one per operation.
//!
//! Each input names the keys it accepts, converts itself into the engine's
//! query type (applying configured default limits), and runs the engine.

use crate::{error::Error, operation::OperationKind};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use statdex_core::{
    config::LimitsConfig,
    engine::{self, ExtremeMetric, Extremity},
    error::QueryError,
    model::ElementType,
    query::{self, Outcome, parse_element, parse_stat, predicate::FilterConfig},
    table::DatasetTable,
};

///
/// OperationInput
///

pub trait OperationInput: DeserializeOwned {
    const KIND: OperationKind;

    /// Every top-level argument key, aliases included.
    const KEYS: &'static [&'static str];

    type Query;
    type Output: Serialize;

    fn accepts(key: &str) -> bool {
        Self::KEYS.contains(&key)
    }

    /// Keys listed to callers; defaults to `KEYS`.
    fn documented_keys() -> Vec<&'static str> {
        Self::KEYS.to_vec()
    }

    fn into_query(self, limits: &LimitsConfig) -> Result<Self::Query, QueryError>;

    fn execute(
        table: &DatasetTable,
        query: &Self::Query,
    ) -> Result<Outcome<Self::Output>, QueryError>;
}

/// Decode an argument bag into a typed input.
/// Unknown keys are rejected in strict mode and dropped otherwise.
pub fn decode<I: OperationInput>(args: &Value, strict: bool) -> Result<I, Error> {
    let mut bag = match args {
        Value::Null => Map::new(),
        Value::Object(map) => map.clone(),
        other => {
            return Err(Error::invalid_arguments(format!(
                "arguments must be a JSON object, got {other}"
            )));
        }
    };

    let unknown: Vec<String> = bag.keys().filter(|key| !I::accepts(key)).cloned().collect();
    if !unknown.is_empty() {
        if strict {
            return Err(Error::invalid_arguments(format!(
                "{}: unknown argument(s) {}",
                I::KIND,
                unknown.join(", ")
            )));
        }

        let operation = I::KIND;
        tracing::debug!(%operation, ?unknown, "ignoring unknown arguments");
        for key in &unknown {
            bag.remove(key);
        }
    }

    serde_json::from_value(Value::Object(bag))
        .map_err(|err| Error::invalid_arguments(format!("{}: {err}", I::KIND)))
}

const fn default_true() -> bool {
    true
}

fn parse_elements(argument: &str, names: &[String]) -> Result<Vec<ElementType>, QueryError> {
    names
        .iter()
        .map(|name| parse_element(argument, name))
        .collect()
}

///
/// FilterInput
///

#[derive(Clone, Debug, Deserialize)]
pub struct FilterInput {
    #[serde(flatten)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub ascending: bool,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl OperationInput for FilterInput {
    const KIND: OperationKind = OperationKind::FilterMultiCriteria;
    const KEYS: &'static [&'static str] = &["sort_by", "ascending", "limit"];

    type Query = query::FilterQuery;
    type Output = query::FilterResult;

    fn accepts(key: &str) -> bool {
        Self::KEYS.contains(&key) || FilterConfig::KEYS.contains(&key)
    }

    fn documented_keys() -> Vec<&'static str> {
        FilterConfig::KEYS.iter().chain(Self::KEYS).copied().collect()
    }

    fn into_query(self, limits: &LimitsConfig) -> Result<Self::Query, QueryError> {
        Ok(query::FilterQuery {
            filter: self.filter,
            sort_by: self.sort_by,
            ascending: self.ascending,
            limit: self.limit.unwrap_or(limits.filter),
        })
    }

    fn execute(
        table: &DatasetTable,
        query: &Self::Query,
    ) -> Result<Outcome<Self::Output>, QueryError> {
        query::filter(table, query)
    }
}

///
/// PercentileInput
///

#[derive(Clone, Debug, Deserialize)]
pub struct PercentileInput {
    pub pokemon_name: String,
    pub stat: String,
}

impl OperationInput for PercentileInput {
    const KIND: OperationKind = OperationKind::StatPercentile;
    const KEYS: &'static [&'static str] = &["pokemon_name", "stat"];

    type Query = engine::PercentileQuery;
    type Output = engine::PercentileResult;

    fn into_query(self, _: &LimitsConfig) -> Result<Self::Query, QueryError> {
        Ok(engine::PercentileQuery {
            stat: parse_stat("stat", &self.stat)?,
            name: self.pokemon_name,
        })
    }

    fn execute(
        table: &DatasetTable,
        query: &Self::Query,
    ) -> Result<Outcome<Self::Output>, QueryError> {
        engine::stat_percentile(table, query)
    }
}

///
/// SimilarInput
///

#[derive(Clone, Debug, Deserialize)]
pub struct SimilarInput {
    pub pokemon_name: String,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub min_similarity: Option<f64>,
}

impl OperationInput for SimilarInput {
    const KIND: OperationKind = OperationKind::FindSimilar;
    const KEYS: &'static [&'static str] = &["pokemon_name", "limit", "min_similarity"];

    type Query = engine::SimilarQuery;
    type Output = engine::SimilarResult;

    fn into_query(self, limits: &LimitsConfig) -> Result<Self::Query, QueryError> {
        Ok(engine::SimilarQuery {
            name: self.pokemon_name,
            limit: self.limit.unwrap_or(limits.similar),
            min_similarity: self.min_similarity.unwrap_or(limits.similar_min_similarity),
        })
    }

    fn execute(
        table: &DatasetTable,
        query: &Self::Query,
    ) -> Result<Outcome<Self::Output>, QueryError> {
        engine::find_similar(table, query)
    }
}

///
/// EffectivenessInput
///

#[derive(Clone, Debug, Deserialize)]
pub struct EffectivenessInput {
    pub defender_name: String,
    pub attacker_types: Vec<String>,
}

impl OperationInput for EffectivenessInput {
    const KIND: OperationKind = OperationKind::TypeEffectiveness;
    const KEYS: &'static [&'static str] = &["defender_name", "attacker_types"];

    type Query = engine::EffectivenessQuery;
    type Output = engine::EffectivenessResult;

    fn into_query(self, _: &LimitsConfig) -> Result<Self::Query, QueryError> {
        Ok(engine::EffectivenessQuery {
            attackers: parse_elements("attacker_types", &self.attacker_types)?,
            defender: self.defender_name,
        })
    }

    fn execute(
        table: &DatasetTable,
        query: &Self::Query,
    ) -> Result<Outcome<Self::Output>, QueryError> {
        engine::type_effectiveness(table, query)
    }
}

///
/// ProfileInput
///

#[derive(Clone, Debug, Deserialize)]
pub struct ProfileInput {
    pub pokemon_name: String,
}

impl OperationInput for ProfileInput {
    const KIND: OperationKind = OperationKind::ResistancesAndWeaknesses;
    const KEYS: &'static [&'static str] = &["pokemon_name"];

    type Query = String;
    type Output = engine::ProfileResult;

    fn into_query(self, _: &LimitsConfig) -> Result<Self::Query, QueryError> {
        Ok(self.pokemon_name)
    }

    fn execute(
        table: &DatasetTable,
        query: &Self::Query,
    ) -> Result<Outcome<Self::Output>, QueryError> {
        engine::resistances_and_weaknesses(table, query)
    }
}

///
/// ResistantInput
///

#[derive(Clone, Debug, Deserialize)]
pub struct ResistantInput {
    pub resist_types: Vec<String>,
    #[serde(default = "ResistantInput::default_max_multiplier")]
    pub max_multiplier: f64,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ResistantInput {
    const fn default_max_multiplier() -> f64 {
        0.5
    }
}

impl OperationInput for ResistantInput {
    const KIND: OperationKind = OperationKind::FindResistant;
    const KEYS: &'static [&'static str] = &["resist_types", "max_multiplier", "limit"];

    type Query = engine::ResistantQuery;
    type Output = engine::ResistantResult;

    fn into_query(self, limits: &LimitsConfig) -> Result<Self::Query, QueryError> {
        Ok(engine::ResistantQuery {
            resist_types: parse_elements("resist_types", &self.resist_types)?,
            max_multiplier: self.max_multiplier,
            limit: self.limit.unwrap_or(limits.resistant),
        })
    }

    fn execute(
        table: &DatasetTable,
        query: &Self::Query,
    ) -> Result<Outcome<Self::Output>, QueryError> {
        engine::find_resistant(table, query)
    }
}

///
/// TypeStatsInput
///

#[derive(Clone, Debug, Deserialize)]
pub struct TypeStatsInput {
    pub pokemon_type: String,
    #[serde(default)]
    pub primary_only: bool,
}

impl OperationInput for TypeStatsInput {
    const KIND: OperationKind = OperationKind::AggregateByType;
    const KEYS: &'static [&'static str] = &["pokemon_type", "primary_only"];

    type Query = engine::TypeStatsQuery;
    type Output = engine::TypeStatsResult;

    fn into_query(self, _: &LimitsConfig) -> Result<Self::Query, QueryError> {
        Ok(engine::TypeStatsQuery {
            element: parse_element("pokemon_type", &self.pokemon_type)?,
            primary_only: self.primary_only,
        })
    }

    fn execute(
        table: &DatasetTable,
        query: &Self::Query,
    ) -> Result<Outcome<Self::Output>, QueryError> {
        engine::aggregate_by_type(table, query)
    }
}

///
/// DistributionInput
///

#[derive(Clone, Debug, Deserialize)]
pub struct DistributionInput {
    #[serde(default)]
    pub bin_size: Option<u32>,
    #[serde(default = "default_true")]
    pub include_legendaries: bool,
}

impl OperationInput for DistributionInput {
    const KIND: OperationKind = OperationKind::BstDistribution;
    const KEYS: &'static [&'static str] = &["bin_size", "include_legendaries"];

    type Query = engine::DistributionQuery;
    type Output = engine::DistributionResult;

    fn into_query(self, limits: &LimitsConfig) -> Result<Self::Query, QueryError> {
        Ok(engine::DistributionQuery {
            bin_size: self.bin_size.unwrap_or(limits.bin_size),
            include_legendaries: self.include_legendaries,
        })
    }

    fn execute(
        table: &DatasetTable,
        query: &Self::Query,
    ) -> Result<Outcome<Self::Output>, QueryError> {
        engine::bst_distribution(table, query)
    }
}

///
/// CompareInput
///

#[derive(Clone, Debug, Deserialize)]
pub struct CompareInput {
    pub pokemon1: String,
    pub pokemon2: String,
}

impl OperationInput for CompareInput {
    const KIND: OperationKind = OperationKind::CompareHeadToHead;
    const KEYS: &'static [&'static str] = &["pokemon1", "pokemon2"];

    type Query = engine::CompareQuery;
    type Output = engine::HeadToHead;

    fn into_query(self, _: &LimitsConfig) -> Result<Self::Query, QueryError> {
        Ok(engine::CompareQuery {
            first: self.pokemon1,
            second: self.pokemon2,
        })
    }

    fn execute(
        table: &DatasetTable,
        query: &Self::Query,
    ) -> Result<Outcome<Self::Output>, QueryError> {
        engine::compare_head_to_head(table, query)
    }
}

///
/// RecordInput
///

#[derive(Clone, Debug, Deserialize)]
pub struct RecordInput {
    pub name: String,
    #[serde(default = "default_true")]
    pub detailed: bool,
}

impl OperationInput for RecordInput {
    const KIND: OperationKind = OperationKind::GetRecord;
    const KEYS: &'static [&'static str] = &["name", "detailed"];

    type Query = engine::RecordQuery;
    type Output = engine::RecordDetails;

    fn into_query(self, _: &LimitsConfig) -> Result<Self::Query, QueryError> {
        Ok(engine::RecordQuery {
            name: self.name,
            detailed: self.detailed,
        })
    }

    fn execute(
        table: &DatasetTable,
        query: &Self::Query,
    ) -> Result<Outcome<Self::Output>, QueryError> {
        engine::get_record(table, query)
    }
}

///
/// StatRangeInput
///

#[derive(Clone, Debug, Deserialize)]
pub struct StatRangeInput {
    pub stat_name: String,
    pub min_value: u16,
    #[serde(default)]
    pub max_value: Option<u16>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl OperationInput for StatRangeInput {
    const KIND: OperationKind = OperationKind::StatRange;
    const KEYS: &'static [&'static str] = &["stat_name", "min_value", "max_value", "limit"];

    type Query = engine::StatRangeQuery;
    type Output = engine::ListResult;

    fn into_query(self, limits: &LimitsConfig) -> Result<Self::Query, QueryError> {
        Ok(engine::StatRangeQuery {
            stat: parse_stat("stat_name", &self.stat_name)?,
            min_value: self.min_value,
            max_value: self.max_value,
            limit: self.limit.unwrap_or(limits.stat_range),
        })
    }

    fn execute(
        table: &DatasetTable,
        query: &Self::Query,
    ) -> Result<Outcome<Self::Output>, QueryError> {
        engine::stat_range(table, query)
    }
}

///
/// TopInput
///

#[derive(Clone, Debug, Deserialize)]
pub struct TopInput {
    pub stat: String,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub exclude_legendaries: bool,
    #[serde(default)]
    pub generation: Option<u8>,
}

impl OperationInput for TopInput {
    const KIND: OperationKind = OperationKind::TopByStat;
    const KEYS: &'static [&'static str] = &["stat", "limit", "exclude_legendaries", "generation"];

    type Query = engine::TopQuery;
    type Output = engine::Leaderboard;

    fn into_query(self, limits: &LimitsConfig) -> Result<Self::Query, QueryError> {
        Ok(engine::TopQuery {
            stat: parse_stat("stat", &self.stat)?,
            limit: self.limit.unwrap_or(limits.top),
            exclude_legendaries: self.exclude_legendaries,
            generation: self.generation,
        })
    }

    fn execute(
        table: &DatasetTable,
        query: &Self::Query,
    ) -> Result<Outcome<Self::Output>, QueryError> {
        engine::top_by_stat(table, query)
    }
}

///
/// GenerationInput
///

#[derive(Clone, Debug, Deserialize)]
pub struct GenerationInput {
    pub generation: u8,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub ascending: bool,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl OperationInput for GenerationInput {
    const KIND: OperationKind = OperationKind::ByGeneration;
    const KEYS: &'static [&'static str] = &["generation", "sort_by", "ascending", "limit"];

    type Query = engine::GenerationQuery;
    type Output = engine::ListResult;

    fn into_query(self, limits: &LimitsConfig) -> Result<Self::Query, QueryError> {
        Ok(engine::GenerationQuery {
            generation: self.generation,
            sort_by: self.sort_by,
            ascending: self.ascending,
            limit: self.limit.unwrap_or(limits.generation),
        })
    }

    fn execute(
        table: &DatasetTable,
        query: &Self::Query,
    ) -> Result<Outcome<Self::Output>, QueryError> {
        engine::by_generation(table, query)
    }
}

///
/// TypeCombinationInput
///

#[derive(Clone, Debug, Deserialize)]
pub struct TypeCombinationInput {
    pub type1: String,
    #[serde(default)]
    pub type2: Option<String>,
    #[serde(default = "default_true")]
    pub exact_match: bool,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl OperationInput for TypeCombinationInput {
    const KIND: OperationKind = OperationKind::ByTypeCombination;
    const KEYS: &'static [&'static str] = &["type1", "type2", "exact_match", "limit"];

    type Query = engine::TypeCombinationQuery;
    type Output = engine::ListResult;

    fn into_query(self, limits: &LimitsConfig) -> Result<Self::Query, QueryError> {
        Ok(engine::TypeCombinationQuery {
            type1: parse_element("type1", &self.type1)?,
            type2: self
                .type2
                .as_deref()
                .map(|name| parse_element("type2", name))
                .transpose()?,
            exact_match: self.exact_match,
            limit: self.limit.unwrap_or(limits.type_combination),
        })
    }

    fn execute(
        table: &DatasetTable,
        query: &Self::Query,
    ) -> Result<Outcome<Self::Output>, QueryError> {
        engine::by_type_combination(table, query)
    }
}

///
/// AbilityInput
///

#[derive(Clone, Debug, Deserialize)]
pub struct AbilityInput {
    pub ability: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl OperationInput for AbilityInput {
    const KIND: OperationKind = OperationKind::ByAbility;
    const KEYS: &'static [&'static str] = &["ability", "limit"];

    type Query = engine::AbilityQuery;
    type Output = engine::ListResult;

    fn into_query(self, limits: &LimitsConfig) -> Result<Self::Query, QueryError> {
        Ok(engine::AbilityQuery {
            ability: self.ability,
            limit: self.limit.unwrap_or(limits.ability),
        })
    }

    fn execute(
        table: &DatasetTable,
        query: &Self::Query,
    ) -> Result<Outcome<Self::Output>, QueryError> {
        engine::by_ability(table, query)
    }
}

///
/// ExtremeInput
///

#[derive(Clone, Debug, Deserialize)]
pub struct ExtremeInput {
    pub metric: String,
    pub extremity: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl OperationInput for ExtremeInput {
    const KIND: OperationKind = OperationKind::Extreme;
    const KEYS: &'static [&'static str] = &["metric", "extremity", "limit"];

    type Query = engine::ExtremeQuery;
    type Output = engine::ExtremeResult;

    fn into_query(self, limits: &LimitsConfig) -> Result<Self::Query, QueryError> {
        let metric = ExtremeMetric::parse(&self.metric).ok_or_else(|| {
            QueryError::invalid_argument("metric", format!("unknown metric '{}'", self.metric))
        })?;
        let extremity = Extremity::parse(&self.extremity).ok_or_else(|| {
            QueryError::invalid_argument(
                "extremity",
                format!("expected 'max' or 'min', got '{}'", self.extremity),
            )
        })?;

        Ok(engine::ExtremeQuery {
            metric,
            extremity,
            limit: self.limit.unwrap_or(limits.extreme),
        })
    }

    fn execute(
        table: &DatasetTable,
        query: &Self::Query,
    ) -> Result<Outcome<Self::Output>, QueryError> {
        engine::extreme(table, query)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, ErrorOrigin, QueryErrorKind};
    use serde_json::json;

    #[test]
    fn lenient_decoding_drops_unknown_keys() {
        let input: AbilityInput =
            decode(&json!({ "ability": "Static", "colour": "yellow" }), false).unwrap();

        assert_eq!(input.ability, "Static");
        assert_eq!(input.limit, None);
    }

    #[test]
    fn strict_decoding_rejects_unknown_keys() {
        let err = decode::<AbilityInput>(&json!({ "ability": "Static", "colour": "yellow" }), true)
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Query(QueryErrorKind::InvalidArgument));
        assert_eq!(err.origin, ErrorOrigin::Arguments);
        assert!(err.message.contains("colour"), "{}", err.message);
    }

    #[test]
    fn filter_accepts_every_config_key_in_strict_mode() {
        let input: FilterInput = decode(
            &json!({
                "type1": "electric",
                "min_base_total": 300,
                "min_stats": { "speed": 90 },
                "sort_by": "speed",
                "limit": 3
            }),
            true,
        )
        .unwrap();

        assert_eq!(input.filter.type1.as_deref(), Some("electric"));
        assert_eq!(input.filter.min_total, Some(300));
        assert_eq!(input.limit, Some(3));
    }

    #[test]
    fn missing_required_key_is_invalid() {
        let err = decode::<CompareInput>(&json!({ "pokemon1": "Pika" }), false).unwrap_err();

        assert_eq!(err.kind, ErrorKind::Query(QueryErrorKind::InvalidArgument));
    }

    #[test]
    fn null_arguments_decode_as_empty_bag() {
        let input: DistributionInput = decode(&Value::Null, true).unwrap();

        assert_eq!(input.bin_size, None);
        assert!(input.include_legendaries);
    }

    #[test]
    fn non_object_arguments_are_rejected() {
        assert!(decode::<DistributionInput>(&json!([1, 2]), false).is_err());
    }

    #[test]
    fn configured_limits_fill_missing_values() {
        let limits = LimitsConfig {
            similar: 9,
            ..LimitsConfig::default()
        };
        let query = SimilarInput {
            pokemon_name: "Pika".to_string(),
            limit: None,
            min_similarity: None,
        }
        .into_query(&limits)
        .unwrap();

        assert_eq!(query.limit, 9);
        assert!((query.min_similarity - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_names_fail_conversion() {
        let err = TopInput {
            stat: "luck".to_string(),
            limit: None,
            exclude_legendaries: false,
            generation: None,
        }
        .into_query(&LimitsConfig::default())
        .unwrap_err();
        assert!(matches!(err, QueryError::InvalidArgument { argument, .. } if argument == "stat"));

        let err = ExtremeInput {
            metric: "weight".to_string(),
            extremity: "median".to_string(),
            limit: None,
        }
        .into_query(&LimitsConfig::default())
        .unwrap_err();
        assert!(
            matches!(err, QueryError::InvalidArgument { argument, .. } if argument == "extremity")
        );
    }
}
