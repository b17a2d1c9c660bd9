use crate::{
    error::Error,
    input::{
        AbilityInput, CompareInput, DistributionInput, EffectivenessInput, ExtremeInput,
        FilterInput, GenerationInput, OperationInput, PercentileInput, ProfileInput, RecordInput,
        ResistantInput, SimilarInput, StatRangeInput, TopInput, TypeCombinationInput,
        TypeStatsInput, decode,
    },
    operation::OperationKind,
    payload::Payload,
};
use serde::Serialize;
use serde_json::Value;
use statdex_core::{config::EngineConfig, table::DatasetTable};

type Handler = fn(&Value, &DatasetTable, &EngineConfig) -> Result<Payload, Error>;

///
/// OperationInfo
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct OperationInfo {
    pub name: OperationKind,
    pub description: &'static str,
    pub keys: Vec<&'static str>,
}

///
/// Entry
///

struct Entry {
    info: OperationInfo,
    handler: Handler,
}

impl Entry {
    fn of<I: OperationInput>() -> Self {
        Self {
            info: OperationInfo {
                name: I::KIND,
                description: I::KIND.description(),
                keys: I::documented_keys(),
            },
            handler: run::<I>,
        }
    }
}

// Decode, convert, execute, render.
fn run<I: OperationInput>(
    args: &Value,
    table: &DatasetTable,
    config: &EngineConfig,
) -> Result<Payload, Error> {
    let input = decode::<I>(args, config.strict_arguments)?;
    let query = input.into_query(&config.limits)?;
    let outcome = I::execute(table, &query)?;

    Payload::render(I::KIND, outcome)
}

///
/// Registry
///
/// Operation tag to handler table, built once at startup.
///

pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        let entries = vec![
            Entry::of::<FilterInput>(),
            Entry::of::<PercentileInput>(),
            Entry::of::<SimilarInput>(),
            Entry::of::<EffectivenessInput>(),
            Entry::of::<ProfileInput>(),
            Entry::of::<ResistantInput>(),
            Entry::of::<TypeStatsInput>(),
            Entry::of::<DistributionInput>(),
            Entry::of::<CompareInput>(),
            Entry::of::<RecordInput>(),
            Entry::of::<StatRangeInput>(),
            Entry::of::<TopInput>(),
            Entry::of::<GenerationInput>(),
            Entry::of::<TypeCombinationInput>(),
            Entry::of::<AbilityInput>(),
            Entry::of::<ExtremeInput>(),
        ];

        Self { entries }
    }

    /// Every registered operation, in registration order.
    pub fn operations(&self) -> impl Iterator<Item = &OperationInfo> {
        self.entries.iter().map(|entry| &entry.info)
    }

    /// Run one operation by name against the shared table.
    pub fn dispatch(
        &self,
        name: &str,
        args: &Value,
        table: &DatasetTable,
        config: &EngineConfig,
    ) -> Result<Payload, Error> {
        let entry = OperationKind::parse(name)
            .and_then(|kind| self.entries.iter().find(|entry| entry.info.name == kind))
            .ok_or_else(|| Error::unknown_operation(name))?;

        tracing::debug!(operation = name, strict = config.strict_arguments, "dispatching");
        let result = (entry.handler)(args, table, config);
        if let Err(err) = &result {
            tracing::debug!(operation = name, error = %err, "operation failed");
        }

        result
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
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
    fn every_operation_kind_is_registered_once() {
        let registry = Registry::new();
        let names: Vec<OperationKind> = registry.operations().map(|info| info.name).collect();

        assert_eq!(names, OperationKind::ALL.to_vec());
        assert_eq!(names.iter().collect::<HashSet<_>>().len(), 16);
    }

    #[test]
    fn filter_lists_config_keys() {
        let registry = Registry::new();
        let filter = registry
            .operations()
            .find(|info| info.name == OperationKind::FilterMultiCriteria)
            .unwrap();

        assert!(filter.keys.contains(&"min_speed"));
        assert!(filter.keys.contains(&"sort_by"));
    }
}
