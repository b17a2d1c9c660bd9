use derive_more::Display;
use serde::Serialize;

///
/// Multiplier
///
/// Discrete damage-scaling factor of one attacking type against a defender.
/// Raw column values outside this set are integrity violations.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Multiplier {
    #[display("0x")]
    Immune,
    #[display("0.25x")]
    Quarter,
    #[display("0.5x")]
    Half,
    #[display("1x")]
    Neutral,
    #[display("2x")]
    Double,
    #[display("4x")]
    Quadruple,
}

impl Multiplier {
    pub const ALL: [Self; 6] = [
        Self::Immune,
        Self::Quarter,
        Self::Half,
        Self::Neutral,
        Self::Double,
        Self::Quadruple,
    ];

    /// Classify a raw multiplier by exact value.
    #[must_use]
    #[expect(clippy::float_cmp)]
    pub fn classify(value: f64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|multiplier| multiplier.value() == value)
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Immune => 0.0,
            Self::Quarter => 0.25,
            Self::Half => 0.5,
            Self::Neutral => 1.0,
            Self::Double => 2.0,
            Self::Quadruple => 4.0,
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
    fn classify_accepts_only_the_discrete_set() {
        assert_eq!(Multiplier::classify(0.0), Some(Multiplier::Immune));
        assert_eq!(Multiplier::classify(0.25), Some(Multiplier::Quarter));
        assert_eq!(Multiplier::classify(4.0), Some(Multiplier::Quadruple));
        assert_eq!(Multiplier::classify(0.75), None);
        assert_eq!(Multiplier::classify(8.0), None);
        assert_eq!(Multiplier::classify(f64::NAN), None);
    }

    #[test]
    fn ordering_follows_value() {
        let mut sorted = Multiplier::ALL;
        sorted.sort_by(|a, b| a.value().total_cmp(&b.value()));

        assert_eq!(sorted, Multiplier::ALL);
    }
}
