use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// ElementType
///
/// Fixed 18-member type enumeration. Declaration order matches the
/// `against_<type>` matchup columns and is used as their slot index.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[remain::sorted]
pub enum ElementType {
    #[display("bug")]
    Bug,
    #[display("dark")]
    Dark,
    #[display("dragon")]
    Dragon,
    #[display("electric")]
    Electric,
    #[display("fairy")]
    Fairy,
    #[display("fighting")]
    Fighting,
    #[display("fire")]
    Fire,
    #[display("flying")]
    Flying,
    #[display("ghost")]
    Ghost,
    #[display("grass")]
    Grass,
    #[display("ground")]
    Ground,
    #[display("ice")]
    Ice,
    #[display("normal")]
    Normal,
    #[display("poison")]
    Poison,
    #[display("psychic")]
    Psychic,
    #[display("rock")]
    Rock,
    #[display("steel")]
    Steel,
    #[display("water")]
    Water,
}

impl ElementType {
    pub const ALL: [Self; crate::MATCHUP_TYPE_COUNT] = [
        Self::Bug,
        Self::Dark,
        Self::Dragon,
        Self::Electric,
        Self::Fairy,
        Self::Fighting,
        Self::Fire,
        Self::Flying,
        Self::Ghost,
        Self::Grass,
        Self::Ground,
        Self::Ice,
        Self::Normal,
        Self::Poison,
        Self::Psychic,
        Self::Rock,
        Self::Steel,
        Self::Water,
    ];

    /// Slot of this type inside a record's matchup row.
    #[must_use]
    pub const fn slot(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bug => "bug",
            Self::Dark => "dark",
            Self::Dragon => "dragon",
            Self::Electric => "electric",
            Self::Fairy => "fairy",
            Self::Fighting => "fighting",
            Self::Fire => "fire",
            Self::Flying => "flying",
            Self::Ghost => "ghost",
            Self::Grass => "grass",
            Self::Ground => "ground",
            Self::Ice => "ice",
            Self::Normal => "normal",
            Self::Poison => "poison",
            Self::Psychic => "psychic",
            Self::Rock => "rock",
            Self::Steel => "steel",
            Self::Water => "water",
        }
    }

    /// Resolve a type name, ignoring case and surrounding whitespace.
    /// `fight` is the dataset's column spelling of `fighting`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase();
        if normalized == "fight" {
            return Some(Self::Fighting);
        }

        Self::ALL
            .into_iter()
            .find(|element| element.as_str() == normalized)
    }

    /// Column names accepted for this type's matchup multiplier.
    #[must_use]
    pub const fn matchup_columns(self) -> &'static [&'static str] {
        match self {
            Self::Bug => &["against_bug"],
            Self::Dark => &["against_dark"],
            Self::Dragon => &["against_dragon"],
            Self::Electric => &["against_electric"],
            Self::Fairy => &["against_fairy"],
            Self::Fighting => &["against_fighting", "against_fight"],
            Self::Fire => &["against_fire"],
            Self::Flying => &["against_flying"],
            Self::Ghost => &["against_ghost"],
            Self::Grass => &["against_grass"],
            Self::Ground => &["against_ground"],
            Self::Ice => &["against_ice"],
            Self::Normal => &["against_normal"],
            Self::Poison => &["against_poison"],
            Self::Psychic => &["against_psychic"],
            Self::Rock => &["against_rock"],
            Self::Steel => &["against_steel"],
            Self::Water => &["against_water"],
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_follow_declaration_order() {
        for (slot, element) in ElementType::ALL.into_iter().enumerate() {
            assert_eq!(element.slot(), slot);
        }
    }

    #[test]
    fn parse_ignores_case_and_accepts_fight_alias() {
        assert_eq!(ElementType::parse(" Electric "), Some(ElementType::Electric));
        assert_eq!(ElementType::parse("FIGHT"), Some(ElementType::Fighting));
        assert_eq!(ElementType::parse("fighting"), Some(ElementType::Fighting));
        assert_eq!(ElementType::parse("sound"), None);
    }

    #[test]
    fn display_matches_canonical_name() {
        for element in ElementType::ALL {
            assert_eq!(element.to_string(), element.as_str());
        }
    }
}
