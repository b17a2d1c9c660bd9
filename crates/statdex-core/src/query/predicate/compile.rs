use crate::{
    error::QueryError,
    model::{NumericField, StatField},
    query::{
        check_generation, parse_element,
        predicate::{CompareOp, Predicate, TypeSlot},
    },
};
use serde::Deserialize;
use std::collections::BTreeMap;

///
/// FilterConfig
///
/// Declarative filter options; every option is optional.
/// Present options are ANDed; an empty config matches every record.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    pub type1: Option<String>,
    pub type2: Option<String>,

    pub min_hp: Option<u16>,
    pub min_attack: Option<u16>,
    pub min_defense: Option<u16>,
    pub min_sp_attack: Option<u16>,
    pub min_sp_defense: Option<u16>,
    pub min_speed: Option<u16>,
    #[serde(alias = "min_base_total")]
    pub min_total: Option<u16>,

    pub max_hp: Option<u16>,
    pub max_attack: Option<u16>,
    pub max_defense: Option<u16>,
    pub max_sp_attack: Option<u16>,
    pub max_sp_defense: Option<u16>,
    pub max_speed: Option<u16>,
    #[serde(alias = "max_base_total")]
    pub max_total: Option<u16>,

    pub min_weight: Option<f64>,
    pub max_weight: Option<f64>,
    pub min_height: Option<f64>,
    pub max_height: Option<f64>,
    pub generation: Option<u8>,
    pub is_legendary: Option<bool>,
    pub min_capture_rate: Option<u16>,
    pub abilities: Vec<String>,

    /// Matches type1 OR type2 against any listed type.
    pub types: Vec<String>,
    pub generations: Vec<u8>,

    /// Field name to inclusive bound; any numeric field is accepted.
    pub min_stats: BTreeMap<String, f64>,
    pub max_stats: BTreeMap<String, f64>,
}

///
/// CompiledFilter
///

#[derive(Clone, Debug, PartialEq)]
pub struct CompiledFilter {
    pub predicate: Predicate,

    /// Applied option names, in canonical order.
    pub applied: Vec<String>,
}

impl FilterConfig {
    /// Every key this config accepts, aliases included.
    pub const KEYS: &'static [&'static str] = &[
        "type1",
        "type2",
        "min_hp",
        "min_attack",
        "min_defense",
        "min_sp_attack",
        "min_sp_defense",
        "min_speed",
        "min_total",
        "min_base_total",
        "max_hp",
        "max_attack",
        "max_defense",
        "max_sp_attack",
        "max_sp_defense",
        "max_speed",
        "max_total",
        "max_base_total",
        "min_weight",
        "max_weight",
        "min_height",
        "max_height",
        "generation",
        "is_legendary",
        "min_capture_rate",
        "abilities",
        "types",
        "generations",
        "min_stats",
        "max_stats",
    ];

    /// Validate every option and build the conjunction.
    /// Nothing is evaluated until the whole config is known to be valid.
    pub fn compile(&self) -> Result<CompiledFilter, QueryError> {
        let mut builder = Builder::default();

        if let Some(name) = &self.type1 {
            let element = parse_element("type1", name)?;
            builder.push("type1", Predicate::has_type(TypeSlot::Primary, element));
        }
        if let Some(name) = &self.type2 {
            let element = parse_element("type2", name)?;
            builder.push("type2", Predicate::has_type(TypeSlot::Secondary, element));
        }

        for (key, bound, stat, op) in self.stat_bounds() {
            if let Some(bound) = bound {
                builder.push_bound(key, NumericField::Stat(stat), op, f64::from(bound));
            }
        }

        let physical = [
            ("min_weight", self.min_weight, NumericField::Weight, CompareOp::Gte),
            ("max_weight", self.max_weight, NumericField::Weight, CompareOp::Lte),
            ("min_height", self.min_height, NumericField::Height, CompareOp::Gte),
            ("max_height", self.max_height, NumericField::Height, CompareOp::Lte),
        ];
        for (key, bound, field, op) in physical {
            if let Some(bound) = bound {
                builder.push_bound(key, field, op, bound);
            }
        }

        if let Some(generation) = self.generation {
            check_generation("generation", generation)?;
            builder.push_bound(
                "generation",
                NumericField::Generation,
                CompareOp::Eq,
                f64::from(generation),
            );
        }
        if let Some(legendary) = self.is_legendary {
            builder.push("is_legendary", Predicate::Legendary(legendary));
        }
        if let Some(rate) = self.min_capture_rate {
            builder.push_bound(
                "min_capture_rate",
                NumericField::CaptureRate,
                CompareOp::Gte,
                f64::from(rate),
            );
        }
        if !self.abilities.is_empty() {
            builder.push("abilities", Predicate::any_ability(&self.abilities));
        }

        if !self.types.is_empty() {
            let mut any = Vec::with_capacity(self.types.len());
            for name in &self.types {
                any.push(Predicate::has_type(TypeSlot::Either, parse_element("types", name)?));
            }
            builder.push("types", Predicate::Or(any));
        }
        if !self.generations.is_empty() {
            let mut any = Vec::with_capacity(self.generations.len());
            for &generation in &self.generations {
                check_generation("generations", generation)?;
                any.push(Predicate::compare(
                    NumericField::Generation,
                    CompareOp::Eq,
                    f64::from(generation),
                ));
            }
            builder.push("generations", Predicate::Or(any));
        }

        for (prefix, bounds, op) in [
            ("min_stats", &self.min_stats, CompareOp::Gte),
            ("max_stats", &self.max_stats, CompareOp::Lte),
        ] {
            for (name, &bound) in bounds {
                let key = format!("{prefix}.{name}");
                let field = NumericField::parse(name).ok_or_else(|| {
                    QueryError::invalid_argument(&key, format!("unknown field '{name}'"))
                })?;
                builder.push_bound(key, field, op, bound);
            }
        }

        Ok(builder.finish())
    }

    // Per-stat bounds in canonical order: every minimum, then every maximum.
    const fn stat_bounds(&self) -> [(&'static str, Option<u16>, StatField, CompareOp); 14] {
        use CompareOp::{Gte, Lte};

        [
            ("min_hp", self.min_hp, StatField::Hp, Gte),
            ("min_attack", self.min_attack, StatField::Attack, Gte),
            ("min_defense", self.min_defense, StatField::Defense, Gte),
            ("min_sp_attack", self.min_sp_attack, StatField::SpAttack, Gte),
            ("min_sp_defense", self.min_sp_defense, StatField::SpDefense, Gte),
            ("min_speed", self.min_speed, StatField::Speed, Gte),
            ("min_total", self.min_total, StatField::Total, Gte),
            ("max_hp", self.max_hp, StatField::Hp, Lte),
            ("max_attack", self.max_attack, StatField::Attack, Lte),
            ("max_defense", self.max_defense, StatField::Defense, Lte),
            ("max_sp_attack", self.max_sp_attack, StatField::SpAttack, Lte),
            ("max_sp_defense", self.max_sp_defense, StatField::SpDefense, Lte),
            ("max_speed", self.max_speed, StatField::Speed, Lte),
            ("max_total", self.max_total, StatField::Total, Lte),
        ]
    }
}

///
/// Builder
///

#[derive(Default)]
struct Builder {
    predicate: Option<Predicate>,
    applied: Vec<String>,
}

impl Builder {
    fn push(&mut self, key: impl Into<String>, predicate: Predicate) {
        self.applied.push(key.into());
        self.predicate = Some(match self.predicate.take() {
            Some(existing) => existing & predicate,
            None => predicate,
        });
    }

    fn push_bound(&mut self, key: impl Into<String>, field: NumericField, op: CompareOp, bound: f64) {
        self.push(key, Predicate::compare(field, op, bound));
    }

    fn finish(self) -> CompiledFilter {
        CompiledFilter {
            predicate: self.predicate.unwrap_or(Predicate::True),
            applied: self.applied,
        }
    }
}
