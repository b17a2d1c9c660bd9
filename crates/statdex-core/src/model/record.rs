use crate::{
    MATCHUP_TYPE_COUNT,
    model::{ElementType, StatField},
};
use serde::{Serialize, Serializer, ser::SerializeMap};

///
/// BaseStats
///
/// The six base stats, each within [1, 255].
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct BaseStats {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
    pub speed: u8,
}

impl BaseStats {
    #[must_use]
    pub const fn new(values: [u8; crate::BASE_STAT_COUNT]) -> Self {
        let [hp, attack, defense, sp_attack, sp_defense, speed] = values;

        Self {
            hp,
            attack,
            defense,
            sp_attack,
            sp_defense,
            speed,
        }
    }

    #[must_use]
    pub const fn to_array(self) -> [u8; crate::BASE_STAT_COUNT] {
        [
            self.hp,
            self.attack,
            self.defense,
            self.sp_attack,
            self.sp_defense,
            self.speed,
        ]
    }

    #[must_use]
    pub fn sum(self) -> u16 {
        self.to_array().into_iter().map(u16::from).sum()
    }
}

///
/// Matchups
///
/// Raw `against_<type>` multipliers indexed by `ElementType::slot`.
/// `None` means the source carried no column for that type.
///

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Matchups([Option<f64>; MATCHUP_TYPE_COUNT]);

impl Matchups {
    #[must_use]
    pub const fn new(values: [Option<f64>; MATCHUP_TYPE_COUNT]) -> Self {
        Self(values)
    }

    /// Every type at the same multiplier.
    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self([Some(value); MATCHUP_TYPE_COUNT])
    }

    #[must_use]
    pub const fn get(&self, element: ElementType) -> Option<f64> {
        self.0[element.slot()]
    }

    /// Multiplier for one attacking type; a missing column reads as neutral.
    #[must_use]
    pub fn get_or_neutral(&self, element: ElementType) -> f64 {
        self.get(element).unwrap_or(1.0)
    }

    pub const fn set(&mut self, element: ElementType, value: Option<f64>) {
        self.0[element.slot()] = value;
    }

    #[must_use]
    pub const fn with(mut self, element: ElementType, value: f64) -> Self {
        self.0[element.slot()] = Some(value);
        self
    }
}

impl Serialize for Matchups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present = self.0.iter().filter(|value| value.is_some()).count();
        let mut map = serializer.serialize_map(Some(present))?;
        for element in ElementType::ALL {
            if let Some(value) = self.get(element) {
                map.serialize_entry(element.as_str(), &value)?;
            }
        }
        map.end()
    }
}

///
/// EntityRecord
///
/// One immutable row of the dataset table.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EntityRecord {
    pub id: u32,
    pub name: String,
    pub primary_type: ElementType,
    pub secondary_type: Option<ElementType>,
    pub stats: BaseStats,
    pub total: u16,
    pub generation: u8,
    pub is_legendary: bool,
    pub capture_rate: u16,
    pub base_happiness: u16,
    pub egg_steps: u32,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub percent_male: Option<f64>,
    pub abilities: Vec<String>,
    pub matchups: Matchups,
}

impl EntityRecord {
    /// Case-insensitive lookup key for the record name.
    #[must_use]
    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }

    /// Primary type followed by the secondary type, when present.
    pub fn types(&self) -> impl Iterator<Item = ElementType> + '_ {
        std::iter::once(self.primary_type).chain(self.secondary_type)
    }

    #[must_use]
    pub fn has_type(&self, element: ElementType) -> bool {
        self.primary_type == element || self.secondary_type == Some(element)
    }

    /// Case-insensitive membership test against lowercase ability names.
    #[must_use]
    pub fn has_any_ability(&self, wanted: &[String]) -> bool {
        self.abilities
            .iter()
            .any(|ability| wanted.contains(&ability.to_lowercase()))
    }

    #[must_use]
    pub fn stat(&self, stat: StatField) -> u16 {
        stat.value(self)
    }

    /// Check the row-level invariants every table row must hold.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        for (stat, value) in StatField::BASE.into_iter().zip(self.stats.to_array()) {
            if value == 0 {
                return Err(format!("{stat} must be within [1, 255], found 0"));
            }
        }
        let sum = self.stats.sum();
        if self.total != sum {
            return Err(format!(
                "total {} does not equal the sum of base stats {sum}",
                self.total
            ));
        }
        if !(1..=9).contains(&self.generation) {
            return Err(format!(
                "generation must be within [1, 9], found {}",
                self.generation
            ));
        }
        if self.abilities.is_empty() {
            return Err("at least one ability is required".to_string());
        }

        Ok(())
    }
}

/// Normalize a record name for case-insensitive comparison.
#[must_use]
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

///
/// TESTS
///
