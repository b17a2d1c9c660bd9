use super::*;
use crate::{
    error::QueryError,
    model::StatField,
    test_fixtures::{RecordFixture, fixture_records, names, pika, table_of},
};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn selected(config: &FilterConfig) -> Vec<String> {
    let records = fixture_records();
    let compiled = config.compile().unwrap();

    compiled
        .predicate
        .select(&records)
        .into_iter()
        .map(|i| records[i].name.clone())
        .collect()
}

#[test]
fn empty_config_is_identity() {
    let records = fixture_records();
    let compiled = FilterConfig::default().compile().unwrap();

    assert_eq!(compiled.predicate, Predicate::True);
    assert!(compiled.applied.is_empty());
    assert_eq!(
        compiled.predicate.select(&records),
        (0..records.len()).collect::<Vec<_>>()
    );
}

#[test]
fn applied_options_follow_canonical_order() {
    let config = FilterConfig {
        abilities: vec!["Static".to_string()],
        max_speed: Some(120),
        type1: Some("electric".to_string()),
        min_stats: BTreeMap::from([("speed".to_string(), 60.0)]),
        generations: vec![1],
        ..FilterConfig::default()
    };
    let compiled = config.compile().unwrap();

    assert_eq!(
        compiled.applied,
        vec![
            "type1",
            "max_speed",
            "abilities",
            "generations",
            "min_stats.speed"
        ]
    );
}

#[test]
fn scenario_a_single_electric_attacker() {
    let pichu = RecordFixture::new(172, "Pichu", ElementType::Electric, [20, 40, 15, 35, 35, 60])
        .generation(2)
        .build();
    let snorlax = RecordFixture::new(143, "Snorlax", ElementType::Normal, [160, 110, 65, 65, 110, 30])
        .build();
    let table = table_of(vec![pichu, pika(), snorlax]);

    let config = FilterConfig {
        type1: Some("electric".to_string()),
        min_attack: Some(50),
        ..FilterConfig::default()
    };
    let compiled = config.compile().unwrap();
    let hits: Vec<&EntityRecord> = compiled
        .predicate
        .select(table.records())
        .into_iter()
        .map(|i| &table.records()[i])
        .collect();

    assert_eq!(names(hits.iter().copied()), vec!["Pika"]);
    assert_eq!(hits[0].total, 320);
}

#[test]
fn abilities_match_any_ignoring_case() {
    let config = FilterConfig {
        abilities: vec!["STATIC".to_string(), "pressure".to_string()],
        ..FilterConfig::default()
    };

    assert_eq!(selected(&config), vec!["Pika", "Raichu", "Mewtwo"]);
}

#[test]
fn types_match_either_slot() {
    let config = FilterConfig {
        types: vec!["Psychic".to_string(), "poison".to_string()],
        ..FilterConfig::default()
    };

    assert_eq!(selected(&config), vec!["Gengar", "Mewtwo", "Metagross"]);
}

#[test]
fn type2_reads_only_the_secondary_slot() {
    let config = FilterConfig {
        type2: Some("psychic".to_string()),
        ..FilterConfig::default()
    };

    assert_eq!(selected(&config), vec!["Metagross"]);
}

#[test]
fn absent_weight_never_satisfies_a_bound() {
    let config = FilterConfig {
        max_weight: Some(1000.0),
        ..FilterConfig::default()
    };

    let hits = selected(&config);
    assert_eq!(hits.len(), 8);
    assert!(!hits.contains(&"Metagross".to_string()));
}

#[test]
fn bounds_are_inclusive() {
    let config = FilterConfig {
        min_total: Some(534),
        max_stats: BTreeMap::from([("bst".to_string(), 600.0)]),
        ..FilterConfig::default()
    };

    assert_eq!(selected(&config), vec!["Charizard", "Snorlax", "Metagross"]);
}

#[test]
fn unknown_type_is_rejected() {
    let config = FilterConfig {
        type1: Some("plasma".to_string()),
        ..FilterConfig::default()
    };

    assert!(matches!(
        config.compile().unwrap_err(),
        QueryError::InvalidArgument { argument, .. } if argument == "type1"
    ));
}

#[test]
fn out_of_range_generation_is_rejected() {
    let config = FilterConfig {
        generations: vec![1, 10],
        ..FilterConfig::default()
    };

    assert!(matches!(
        config.compile().unwrap_err(),
        QueryError::InvalidArgument { argument, .. } if argument == "generations"
    ));
}

#[test]
fn unknown_nested_stat_is_rejected() {
    let config = FilterConfig {
        min_stats: BTreeMap::from([("coolness".to_string(), 1.0)]),
        ..FilterConfig::default()
    };

    assert!(matches!(
        config.compile().unwrap_err(),
        QueryError::InvalidArgument { argument, .. } if argument == "min_stats.coolness"
    ));
}

#[test]
fn and_with_true_is_identity() {
    let leaf = Predicate::compare(NumericField::Stat(StatField::Hp), CompareOp::Gte, 80.0);

    assert_eq!(Predicate::True & leaf.clone(), leaf);
    assert_eq!(leaf.clone() & Predicate::True, leaf);
}

#[test]
fn config_deserializes_with_aliases() {
    let config: FilterConfig = serde_json::from_value(serde_json::json!({
        "type1": "fire",
        "min_base_total": 500,
        "min_stats": { "speed": 90 }
    }))
    .unwrap();

    assert_eq!(config.min_total, Some(500));
    assert_eq!(config.min_stats.get("speed"), Some(&90.0));
}

///
/// Properties
///

fn arb_config() -> impl Strategy<Value = FilterConfig> {
    (
        prop::option::of(prop::sample::select(vec![
            "electric", "fire", "psychic", "ghost", "water",
        ])),
        prop::option::of(0u16..200),
        prop::option::of(0u16..200),
        prop::option::of(any::<bool>()),
        prop::collection::vec(1u8..=9, 0..3),
        prop::option::of(0.0f64..500.0),
        prop::collection::vec(
            prop::sample::select(vec!["static", "blaze", "pressure", "levitate"]),
            0..3,
        ),
    )
        .prop_map(
            |(type1, min_speed, max_hp, is_legendary, generations, max_weight, abilities)| {
                FilterConfig {
                    type1: type1.map(str::to_string),
                    min_speed,
                    max_hp,
                    is_legendary,
                    generations,
                    max_weight,
                    abilities: abilities.into_iter().map(str::to_string).collect(),
                    ..FilterConfig::default()
                }
            },
        )
}

proptest! {
    #[test]
    fn filtering_yields_an_ordered_subset(config in arb_config()) {
        let records = fixture_records();
        let selected = config.compile().unwrap().predicate.select(&records);

        prop_assert!(selected.len() <= records.len());
        prop_assert!(selected.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert!(selected.iter().all(|&i| i < records.len()));
    }

    #[test]
    fn filtering_is_idempotent(config in arb_config()) {
        let records = fixture_records();
        let predicate = config.compile().unwrap().predicate;

        let once: Vec<EntityRecord> = predicate
            .select(&records)
            .into_iter()
            .map(|i| records[i].clone())
            .collect();
        let twice = predicate.select(&once);

        prop_assert_eq!(twice, (0..once.len()).collect::<Vec<_>>());
    }

    #[test]
    fn mask_agrees_with_matches(config in arb_config()) {
        let records = fixture_records();
        let predicate = config.compile().unwrap().predicate;
        let mask = predicate.mask(&records);

        for (record, keep) in records.iter().zip(mask) {
            prop_assert_eq!(predicate.matches(record), keep);
        }
    }
}
