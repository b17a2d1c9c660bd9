use crate::{
    error::LoadError,
    model::{BaseStats, ElementType, EntityRecord, Matchups},
};
use csv::StringRecord;
use std::{fs::File, io::Read, path::Path, str::FromStr};

///
/// Columns
///
/// Header positions resolved once per load; the source may order columns freely.
///

struct Columns {
    id: usize,
    name: usize,
    type1: usize,
    type2: Option<usize>,
    stats: [usize; crate::BASE_STAT_COUNT],
    total: usize,
    generation: usize,
    is_legendary: usize,
    capture_rate: usize,
    base_happiness: usize,
    egg_steps: usize,
    height: Option<usize>,
    weight: Option<usize>,
    percent_male: Option<usize>,
    abilities: usize,
    matchups: [Option<usize>; crate::MATCHUP_TYPE_COUNT],
}

const STAT_COLUMNS: [&str; crate::BASE_STAT_COUNT] =
    ["hp", "attack", "defense", "sp_attack", "sp_defense", "speed"];

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, LoadError> {
        let position = |column: &str| headers.iter().position(|h| h.trim() == column);
        let required = |column: &'static str| {
            position(column).ok_or(LoadError::MissingColumn { column })
        };

        let mut stats = [0; crate::BASE_STAT_COUNT];
        for (slot, column) in stats.iter_mut().zip(STAT_COLUMNS) {
            *slot = required(column)?;
        }

        let mut matchups = [None; crate::MATCHUP_TYPE_COUNT];
        for element in ElementType::ALL {
            matchups[element.slot()] = element
                .matchup_columns()
                .iter()
                .find_map(|column| position(column));
        }

        Ok(Self {
            id: required("pokedex_number")?,
            name: required("name")?,
            type1: required("type1")?,
            type2: position("type2"),
            stats,
            total: required("base_total")?,
            generation: required("generation")?,
            is_legendary: required("is_legendary")?,
            capture_rate: required("capture_rate")?,
            base_happiness: required("base_happiness")?,
            egg_steps: required("base_egg_steps")?,
            height: position("height_m"),
            weight: position("weight_kg"),
            percent_male: position("percentage_male"),
            abilities: required("abilities")?,
            matchups,
        })
    }
}

/// Read every row of a CSV dataset file into typed records.
pub(super) fn read_records(path: &Path) -> Result<Vec<EntityRecord>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    read_records_from(file)
}

/// Read every row of a CSV dataset from any reader.
pub(super) fn read_records_from(reader: impl Read) -> Result<Vec<EntityRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns = Columns::resolve(reader.headers()?)?;

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        records.push(parse_row(&columns, &RowCursor::new(index + 1, &row))?);
    }

    Ok(records)
}

///
/// RowCursor
///
/// One CSV row plus its 1-based data row number for error reporting.
///

struct RowCursor<'a> {
    row: usize,
    cells: &'a StringRecord,
}

impl<'a> RowCursor<'a> {
    const fn new(row: usize, cells: &'a StringRecord) -> Self {
        Self { row, cells }
    }

    fn optional(&self, position: Option<usize>) -> Option<&'a str> {
        position
            .and_then(|p| self.cells.get(p))
            .map(str::trim)
            .filter(|cell| !cell.is_empty() && !cell.eq_ignore_ascii_case("nan"))
    }

    fn required(&self, position: usize, column: &'static str) -> Result<&'a str, LoadError> {
        self.optional(Some(position)).ok_or(LoadError::EmptyField {
            row: self.row,
            column,
        })
    }

    fn invalid(&self, column: &str, value: &str) -> LoadError {
        LoadError::InvalidField {
            row: self.row,
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    // Integers may be written as whole floats ("45.0") by some exporters.
    fn int<T: FromStr + TryFrom<i64>>(
        &self,
        position: usize,
        column: &'static str,
    ) -> Result<T, LoadError> {
        let raw = self.required(position, column)?;
        parse_int(raw).ok_or_else(|| self.invalid(column, raw))
    }

    fn float(&self, position: Option<usize>, column: &'static str) -> Result<Option<f64>, LoadError> {
        self.optional(position)
            .map(|raw| {
                raw.parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| self.invalid(column, raw))
            })
            .transpose()
    }

    fn element(&self, raw: &str, column: &'static str) -> Result<ElementType, LoadError> {
        ElementType::parse(raw).ok_or_else(|| self.invalid(column, raw))
    }
}

fn parse_row(columns: &Columns, cursor: &RowCursor<'_>) -> Result<EntityRecord, LoadError> {
    let mut stats = [0u8; crate::BASE_STAT_COUNT];
    for ((slot, position), column) in stats.iter_mut().zip(columns.stats).zip(STAT_COLUMNS) {
        *slot = cursor.int(position, column)?;
    }

    let secondary_type = cursor
        .optional(columns.type2)
        .map(|raw| cursor.element(raw, "type2"))
        .transpose()?;

    let capture_raw = cursor.required(columns.capture_rate, "capture_rate")?;
    let capture_rate =
        parse_leading_int(capture_raw).ok_or_else(|| cursor.invalid("capture_rate", capture_raw))?;

    let legendary_raw = cursor.required(columns.is_legendary, "is_legendary")?;
    let is_legendary =
        parse_flag(legendary_raw).ok_or_else(|| cursor.invalid("is_legendary", legendary_raw))?;

    let abilities_raw = cursor.required(columns.abilities, "abilities")?;
    let abilities = parse_abilities(abilities_raw);
    if abilities.is_empty() {
        return Err(cursor.invalid("abilities", abilities_raw));
    }

    let mut matchups = Matchups::default();
    for element in ElementType::ALL {
        let position = columns.matchups[element.slot()];
        let column = element.matchup_columns()[0];
        matchups.set(element, cursor.float(position, column)?);
    }

    Ok(EntityRecord {
        id: cursor.int(columns.id, "pokedex_number")?,
        name: cursor.required(columns.name, "name")?.to_string(),
        primary_type: cursor.element(cursor.required(columns.type1, "type1")?, "type1")?,
        secondary_type,
        stats: BaseStats::new(stats),
        total: cursor.int(columns.total, "base_total")?,
        generation: cursor.int(columns.generation, "generation")?,
        is_legendary,
        capture_rate,
        base_happiness: cursor.int(columns.base_happiness, "base_happiness")?,
        egg_steps: cursor.int(columns.egg_steps, "base_egg_steps")?,
        height: cursor.float(columns.height, "height_m")?,
        weight: cursor.float(columns.weight, "weight_kg")?,
        percent_male: cursor.float(columns.percent_male, "percentage_male")?,
        abilities,
        matchups,
    })
}

fn parse_int<T: FromStr + TryFrom<i64>>(raw: &str) -> Option<T> {
    if let Ok(value) = raw.parse::<T>() {
        return Some(value);
    }

    let float = raw.parse::<f64>().ok()?;
    if float.fract() != 0.0 || !float.is_finite() {
        return None;
    }

    T::try_from(float as i64).ok()
}

// Annotated cells such as "30 (Meteorite)255 (Core)" keep their first number.
fn parse_leading_int(raw: &str) -> Option<u16> {
    let digits: String = raw.chars().take_while(char::is_ascii_digit).collect();

    digits.parse().ok()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" => Some(true),
        "0" | "0.0" | "false" => Some(false),
        _ => None,
    }
}

// Abilities arrive as a bracketed, quoted list: "['Overgrow', 'Chlorophyll']".
fn parse_abilities(raw: &str) -> Vec<String> {
    raw.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|item| item.trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}

///
/// TESTS
///
