use std::collections::HashMap;
use std::io::Read;

use chrono::{DateTime, NaiveDate, Utc};
use csv::StringRecord;

use super::RatingImportError;
use crate::reputation::domain::{
    BlockRecord, Consideration, Qualities, RatingField, RatingRecord, SafetyAndRespect, SubjectId,
};

/// Column lookup built from the header row.
struct Columns(HashMap<String, usize>);

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let index = headers
            .iter()
            .enumerate()
            .map(|(position, name)| (normalize_header(name), position))
            .collect();
        Self(index)
    }

    fn require(&self, name: &'static str) -> Result<(), RatingImportError> {
        if self.0.contains_key(&normalize_header(name)) {
            Ok(())
        } else {
            Err(RatingImportError::MissingColumn(name))
        }
    }

    fn cell<'r>(&self, record: &'r StringRecord, name: &str) -> Option<&'r str> {
        let position = *self.0.get(&normalize_header(name))?;
        record
            .get(position)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

pub(crate) fn parse_ratings<R: Read>(reader: R) -> Result<Vec<RatingRecord>, RatingImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns = Columns::from_headers(csv_reader.headers()?);
    for required in ["rater", "ratee", "createdAt"] {
        columns.require(required)?;
    }

    let mut ratings = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = index + 2;
        ratings.push(parse_rating_row(&columns, &record, row)?);
    }

    Ok(ratings)
}

pub(crate) fn parse_blocks<R: Read>(reader: R) -> Result<Vec<BlockRecord>, RatingImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns = Columns::from_headers(csv_reader.headers()?);
    for required in ["blocker", "blocked", "createdAt"] {
        columns.require(required)?;
    }

    let mut blocks = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = index + 2;
        blocks.push(BlockRecord {
            blocker: subject(&columns, &record, row, "blocker")?,
            blocked: subject(&columns, &record, row, "blocked")?,
            created_at: timestamp(&columns, &record, row)?,
        });
    }

    Ok(blocks)
}

fn parse_rating_row(
    columns: &Columns,
    record: &StringRecord,
    row: usize,
) -> Result<RatingRecord, RatingImportError> {
    let answers = FieldAnswers::read(columns, record, row)?;

    Ok(RatingRecord {
        rater: subject(columns, record, row, "rater")?,
        ratee: subject(columns, record, row, "ratee")?,
        safety_and_respect: answers.safety_and_respect(),
        consideration: answers.consideration(),
        qualities: answers.qualities(),
        did_not_show_up: flag(columns, record, row, "didNotShowUp")?.unwrap_or(false),
        cancelled: flag(columns, record, row, "cancelled")?.unwrap_or(false),
        created_at: timestamp(columns, record, row)?,
    })
}

/// Parsed boolean cells for one row, keyed by field.
struct FieldAnswers(HashMap<RatingField, bool>);

impl FieldAnswers {
    fn read(
        columns: &Columns,
        record: &StringRecord,
        row: usize,
    ) -> Result<Self, RatingImportError> {
        let mut answers = HashMap::new();
        for field in RatingField::all() {
            if let Some(value) = flag(columns, record, row, field.key())? {
                answers.insert(field, value);
            }
        }
        Ok(Self(answers))
    }

    fn get(&self, field: RatingField) -> Option<bool> {
        self.0.get(&field).copied()
    }

    fn safety_and_respect(&self) -> Option<SafetyAndRespect> {
        let section = SafetyAndRespect {
            made_me_feel_safe: self.get(RatingField::MadeMeFeelSafe),
            as_described_in_profile: self.get(RatingField::AsDescribedInProfile),
            respectful_of_boundaries: self.get(RatingField::RespectfulOfBoundaries),
        };
        (section != SafetyAndRespect::default()).then_some(section)
    }

    fn consideration(&self) -> Option<Consideration> {
        let section = Consideration {
            on_time: self.get(RatingField::OnTime),
            attentive: self.get(RatingField::Attentive),
            good_manners: self.get(RatingField::GoodManners),
            communicated_clearly: self.get(RatingField::CommunicatedClearly),
        };
        (section != Consideration::default()).then_some(section)
    }

    fn qualities(&self) -> Option<Qualities> {
        let section = Qualities {
            dressed_well: self.get(RatingField::DressedWell),
            smelled_nice: self.get(RatingField::SmelledNice),
            good_energy: self.get(RatingField::GoodEnergy),
            charming_smile: self.get(RatingField::CharmingSmile),
            athletic: self.get(RatingField::Athletic),
            competitive_drive: self.get(RatingField::CompetitiveDrive),
            open_to_anything: self.get(RatingField::OpenToAnything),
        };
        (section != Qualities::default()).then_some(section)
    }
}

fn subject(
    columns: &Columns,
    record: &StringRecord,
    row: usize,
    column: &'static str,
) -> Result<SubjectId, RatingImportError> {
    columns
        .cell(record, column)
        .map(SubjectId::new)
        .ok_or(RatingImportError::MissingValue { row, column })
}

fn flag(
    columns: &Columns,
    record: &StringRecord,
    row: usize,
    column: &'static str,
) -> Result<Option<bool>, RatingImportError> {
    let Some(raw) = columns.cell(record, column) else {
        return Ok(None);
    };

    parse_bool(raw)
        .map(Some)
        .ok_or_else(|| RatingImportError::InvalidBoolean {
            row,
            column,
            value: raw.to_string(),
        })
}

fn timestamp(
    columns: &Columns,
    record: &StringRecord,
    row: usize,
) -> Result<DateTime<Utc>, RatingImportError> {
    let raw = columns
        .cell(record, "createdAt")
        .ok_or(RatingImportError::MissingValue {
            row,
            column: "createdAt",
        })?;

    parse_timestamp(raw).ok_or_else(|| RatingImportError::InvalidTimestamp {
        row,
        value: raw.to_string(),
    })
}

fn normalize_header(value: &str) -> String {
    value
        .replace(['\u{feff}', '\u{200b}'], "")
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
