use crate::{
    error::QueryError,
    model::{ElementType, EntityRecord, Multiplier},
    obs::sink,
    query::{EmptyReason, Outcome, RowCount},
    table::DatasetTable,
};
use derive_more::Display;
use serde::Serialize;

///
/// Verdict
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    #[display("immune")]
    Immune,
    #[display("not_very_effective")]
    NotVeryEffective,
    #[display("neutral")]
    Neutral,
    #[display("super_effective")]
    SuperEffective,
}

impl Verdict {
    /// Verdict for the strongest multiplier among an attacker's types.
    #[must_use]
    pub fn from_best(best: Multiplier) -> Self {
        match best {
            Multiplier::Immune => Self::Immune,
            Multiplier::Quarter | Multiplier::Half => Self::NotVeryEffective,
            Multiplier::Neutral => Self::Neutral,
            Multiplier::Double | Multiplier::Quadruple => Self::SuperEffective,
        }
    }
}

/// Read and classify one defender multiplier.
/// A type with no column reads as neutral.
pub fn multiplier_against(
    defender: &EntityRecord,
    attacker: ElementType,
) -> Result<Multiplier, QueryError> {
    let raw = defender.matchups.get_or_neutral(attacker);

    Multiplier::classify(raw).ok_or_else(|| {
        QueryError::data_integrity(
            &defender.name,
            format!("against_{attacker} = {raw} is not a valid multiplier"),
        )
    })
}

/// Best multiplier any of `attackers` achieves against `defender`.
pub fn best_multiplier(
    attackers: impl IntoIterator<Item = ElementType>,
    defender: &EntityRecord,
) -> Result<Multiplier, QueryError> {
    let mut best = None;
    for attacker in attackers {
        let multiplier = multiplier_against(defender, attacker)?;
        best = best.max(Some(multiplier));
    }

    Ok(best.unwrap_or(Multiplier::Neutral))
}

///
/// EffectivenessQuery
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EffectivenessQuery {
    pub defender: String,

    /// One or two attacking types.
    pub attackers: Vec<ElementType>,
}

///
/// EffectivenessResult
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EffectivenessResult {
    pub defender: String,
    pub defender_types: Vec<ElementType>,
    pub multipliers: Vec<AttackMultiplier>,
    pub verdict: Verdict,
}

impl RowCount for EffectivenessResult {
    fn row_count(&self) -> usize {
        1
    }
}

///
/// AttackMultiplier
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct AttackMultiplier {
    pub attacker: ElementType,
    pub multiplier: Multiplier,
}

pub fn type_effectiveness(
    table: &DatasetTable,
    query: &EffectivenessQuery,
) -> Result<Outcome<EffectivenessResult>, QueryError> {
    const OP: &str = "type_effectiveness";

    sink::observe(OP, || {
        if !(1..=2).contains(&query.attackers.len()) {
            return Err(QueryError::invalid_argument(
                "attacker_types",
                format!("expected 1 or 2 types, got {}", query.attackers.len()),
            ));
        }
        if table.is_empty() {
            return Ok(Outcome::Empty(EmptyReason::EmptyTable));
        }

        let (_, defender) = table.require(&query.defender)?;
        sink::scanned(OP, 1);

        let multipliers = query
            .attackers
            .iter()
            .map(|&attacker| {
                multiplier_against(defender, attacker).map(|multiplier| AttackMultiplier {
                    attacker,
                    multiplier,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let best = multipliers
            .iter()
            .map(|entry| entry.multiplier)
            .max()
            .unwrap_or(Multiplier::Neutral);

        Ok(Outcome::Found(EffectivenessResult {
            defender: defender.name.clone(),
            defender_types: defender.types().collect(),
            multipliers,
            verdict: Verdict::from_best(best),
        }))
    })
}

///
/// MatchupProfile
///
/// All eighteen attacking types partitioned by exact multiplier.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct MatchupProfile {
    pub immunities: Vec<ElementType>,
    pub ultra_resistances: Vec<ElementType>,
    pub resistances: Vec<ElementType>,
    pub neutral: Vec<ElementType>,
    pub weaknesses: Vec<ElementType>,
    pub ultra_weaknesses: Vec<ElementType>,
}

impl MatchupProfile {
    #[must_use]
    pub const fn bucket(&self, multiplier: Multiplier) -> &Vec<ElementType> {
        match multiplier {
            Multiplier::Immune => &self.immunities,
            Multiplier::Quarter => &self.ultra_resistances,
            Multiplier::Half => &self.resistances,
            Multiplier::Neutral => &self.neutral,
            Multiplier::Double => &self.weaknesses,
            Multiplier::Quadruple => &self.ultra_weaknesses,
        }
    }

    const fn bucket_mut(&mut self, multiplier: Multiplier) -> &mut Vec<ElementType> {
        match multiplier {
            Multiplier::Immune => &mut self.immunities,
            Multiplier::Quarter => &mut self.ultra_resistances,
            Multiplier::Half => &mut self.resistances,
            Multiplier::Neutral => &mut self.neutral,
            Multiplier::Double => &mut self.weaknesses,
            Multiplier::Quadruple => &mut self.ultra_weaknesses,
        }
    }

    /// Types taking less than neutral damage, immunities included.
    #[must_use]
    pub fn total_resistances(&self) -> usize {
        self.immunities.len() + self.ultra_resistances.len() + self.resistances.len()
    }

    #[must_use]
    pub fn total_weaknesses(&self) -> usize {
        self.weaknesses.len() + self.ultra_weaknesses.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        Multiplier::ALL.iter().map(|&m| self.bucket(m).len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition every attacking type against one defender.
/// Any multiplier outside the discrete set fails the whole profile.
pub fn categorize(defender: &EntityRecord) -> Result<MatchupProfile, QueryError> {
    let mut profile = MatchupProfile::default();

    for attacker in ElementType::ALL {
        let multiplier = multiplier_against(defender, attacker)?;
        profile.bucket_mut(multiplier).push(attacker);
    }

    Ok(profile)
}

///
/// ProfileResult
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProfileResult {
    pub name: String,
    pub types: Vec<ElementType>,
    pub profile: MatchupProfile,
    pub total_resistances: usize,
    pub total_weaknesses: usize,
}

impl RowCount for ProfileResult {
    fn row_count(&self) -> usize {
        1
    }
}

pub fn resistances_and_weaknesses(
    table: &DatasetTable,
    name: &str,
) -> Result<Outcome<ProfileResult>, QueryError> {
    const OP: &str = "resistances_and_weaknesses";

    sink::observe(OP, || {
        if table.is_empty() {
            return Ok(Outcome::Empty(EmptyReason::EmptyTable));
        }

        let (_, record) = table.require(name)?;
        sink::scanned(OP, 1);
        let profile = categorize(record)?;

        Ok(Outcome::Found(ProfileResult {
            name: record.name.clone(),
            types: record.types().collect(),
            total_resistances: profile.total_resistances(),
            total_weaknesses: profile.total_weaknesses(),
            profile,
        }))
    })
}

///
/// ResistantQuery
///

#[derive(Clone, Debug, PartialEq)]
pub struct ResistantQuery {
    pub resist_types: Vec<ElementType>,

    /// Inclusive upper bound every listed type must satisfy.
    pub max_multiplier: f64,
    pub limit: usize,
}

///
/// ResistantResult
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResistantResult {
    /// Requested types, duplicates removed.
    pub resist_types: Vec<ElementType>,
    pub max_multiplier: f64,
    pub matched: usize,
    pub matches: Vec<ResistantMatch>,
}

impl RowCount for ResistantResult {
    fn row_count(&self) -> usize {
        self.matches.len()
    }
}

///
/// ResistantMatch
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResistantMatch {
    pub multipliers: Vec<AttackMultiplier>,

    /// Mean of the listed multipliers; lower is more resistant.
    pub resistance_score: f64,
    pub record: EntityRecord,
}

/// Records resisting every listed type at or below the threshold,
/// most resistant first.
pub fn find_resistant(
    table: &DatasetTable,
    query: &ResistantQuery,
) -> Result<Outcome<ResistantResult>, QueryError> {
    const OP: &str = "find_resistant";

    sink::observe(OP, || {
        if query.resist_types.is_empty() {
            return Err(QueryError::invalid_argument(
                "resist_types",
                "at least one type is required",
            ));
        }
        if !query.max_multiplier.is_finite() || query.max_multiplier < 0.0 {
            return Err(QueryError::invalid_argument(
                "max_multiplier",
                format!("{} is not a non-negative multiplier", query.max_multiplier),
            ));
        }
        if table.is_empty() {
            return Ok(Outcome::Empty(EmptyReason::EmptyTable));
        }

        let mut resist_types = Vec::with_capacity(query.resist_types.len());
        for &element in &query.resist_types {
            if !resist_types.contains(&element) {
                resist_types.push(element);
            }
        }

        let records = table.records();
        sink::scanned(OP, records.len());

        // One pass over every record reads all requested columns together.
        let mut matches = Vec::new();
        for record in records {
            let mut multipliers = Vec::with_capacity(resist_types.len());
            let mut keep = true;

            for &attacker in &resist_types {
                let multiplier = multiplier_against(record, attacker)?;
                keep &= multiplier.value() <= query.max_multiplier;
                multipliers.push(AttackMultiplier {
                    attacker,
                    multiplier,
                });
            }

            if keep {
                let resistance_score = multipliers
                    .iter()
                    .map(|entry| entry.multiplier.value())
                    .sum::<f64>()
                    / multipliers.len() as f64;

                matches.push(ResistantMatch {
                    multipliers,
                    resistance_score,
                    record: record.clone(),
                });
            }
        }

        if matches.is_empty() {
            return Ok(Outcome::Empty(EmptyReason::NoMatches));
        }

        let matched = matches.len();
        matches.sort_by(|a, b| a.resistance_score.total_cmp(&b.resistance_score));
        matches.truncate(query.limit);

        Ok(Outcome::Found(ResistantResult {
            resist_types,
            max_multiplier: query.max_multiplier,
            matched,
            matches,
        }))
    })
}

///
/// TESTS
///
