use crate::model::EntityRecord;
use derive_more::Display;
use serde::{Serialize, Serializer};

///
/// StatField
///
/// The six base stats plus their derived total.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatField {
    #[display("hp")]
    Hp,
    #[display("attack")]
    Attack,
    #[display("defense")]
    Defense,
    #[display("sp_attack")]
    SpAttack,
    #[display("sp_defense")]
    SpDefense,
    #[display("speed")]
    Speed,
    #[display("total")]
    Total,
}

impl StatField {
    /// Base stats in canonical order; their sum is the total.
    pub const BASE: [Self; crate::BASE_STAT_COUNT] = [
        Self::Hp,
        Self::Attack,
        Self::Defense,
        Self::SpAttack,
        Self::SpDefense,
        Self::Speed,
    ];

    /// Base stats followed by the total.
    pub const ALL: [Self; 7] = [
        Self::Hp,
        Self::Attack,
        Self::Defense,
        Self::SpAttack,
        Self::SpDefense,
        Self::Speed,
        Self::Total,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hp => "hp",
            Self::Attack => "attack",
            Self::Defense => "defense",
            Self::SpAttack => "sp_attack",
            Self::SpDefense => "sp_defense",
            Self::Speed => "speed",
            Self::Total => "total",
        }
    }

    /// Resolve a stat name or one of its common aliases.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace(' ', "_");

        let stat = match normalized.as_str() {
            "hp" => Self::Hp,
            "attack" | "atk" => Self::Attack,
            "defense" | "def" => Self::Defense,
            "sp_attack" | "spatk" | "special_attack" => Self::SpAttack,
            "sp_defense" | "spdef" | "special_defense" => Self::SpDefense,
            "speed" | "spe" => Self::Speed,
            "total" | "base_total" | "bst" => Self::Total,
            _ => return None,
        };

        Some(stat)
    }

    #[must_use]
    pub fn value(self, record: &EntityRecord) -> u16 {
        let stats = &record.stats;
        match self {
            Self::Hp => u16::from(stats.hp),
            Self::Attack => u16::from(stats.attack),
            Self::Defense => u16::from(stats.defense),
            Self::SpAttack => u16::from(stats.sp_attack),
            Self::SpDefense => u16::from(stats.sp_defense),
            Self::Speed => u16::from(stats.speed),
            Self::Total => record.total,
        }
    }
}

///
/// NumericField
///
/// Any numeric column a query may sort or bound on.
/// Optional columns yield `None` for records that lack them.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum NumericField {
    #[display("id")]
    Id,
    #[display("{_0}")]
    Stat(StatField),
    #[display("generation")]
    Generation,
    #[display("capture_rate")]
    CaptureRate,
    #[display("base_happiness")]
    BaseHappiness,
    #[display("egg_steps")]
    EggSteps,
    #[display("height")]
    Height,
    #[display("weight")]
    Weight,
    #[display("percent_male")]
    PercentMale,
}

impl NumericField {
    /// Default sort field for list queries.
    pub const DEFAULT_SORT: Self = Self::Stat(StatField::Total);

    /// Resolve a column name, accepting the dataset's spellings as aliases.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        if let Some(stat) = StatField::parse(name) {
            return Some(Self::Stat(stat));
        }

        let field = match name.trim().to_ascii_lowercase().as_str() {
            "id" | "pokedex_number" => Self::Id,
            "generation" => Self::Generation,
            "capture_rate" => Self::CaptureRate,
            "base_happiness" => Self::BaseHappiness,
            "egg_steps" | "base_egg_steps" => Self::EggSteps,
            "height" | "height_m" => Self::Height,
            "weight" | "weight_kg" => Self::Weight,
            "percent_male" | "percentage_male" => Self::PercentMale,
            _ => return None,
        };

        Some(field)
    }

    #[must_use]
    pub fn value(self, record: &EntityRecord) -> Option<f64> {
        match self {
            Self::Id => Some(f64::from(record.id)),
            Self::Stat(stat) => Some(f64::from(stat.value(record))),
            Self::Generation => Some(f64::from(record.generation)),
            Self::CaptureRate => Some(f64::from(record.capture_rate)),
            Self::BaseHappiness => Some(f64::from(record.base_happiness)),
            Self::EggSteps => Some(f64::from(record.egg_steps)),
            Self::Height => record.height,
            Self::Weight => record.weight,
            Self::PercentMale => record.percent_male,
        }
    }
}

impl Serialize for NumericField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

///
/// TESTS
///
