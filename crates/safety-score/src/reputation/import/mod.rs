mod parser;

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::reputation::domain::{BlockRecord, RatingRecord, SubjectId};

#[derive(Debug)]
pub enum RatingImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingColumn(&'static str),
    MissingValue { row: usize, column: &'static str },
    InvalidBoolean {
        row: usize,
        column: &'static str,
        value: String,
    },
    InvalidTimestamp { row: usize, value: String },
}

impl std::fmt::Display for RatingImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatingImportError::Io(err) => write!(f, "failed to read rating export: {}", err),
            RatingImportError::Csv(err) => write!(f, "invalid rating CSV data: {}", err),
            RatingImportError::MissingColumn(column) => {
                write!(f, "rating export is missing the '{}' column", column)
            }
            RatingImportError::MissingValue { row, column } => {
                write!(f, "row {}: '{}' is required", row, column)
            }
            RatingImportError::InvalidBoolean { row, column, value } => write!(
                f,
                "row {}: '{}' must be true/false, got '{}'",
                row, column, value
            ),
            RatingImportError::InvalidTimestamp { row, value } => write!(
                f,
                "row {}: createdAt '{}' is not RFC 3339 or YYYY-MM-DD",
                row, value
            ),
        }
    }
}

impl std::error::Error for RatingImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RatingImportError::Io(err) => Some(err),
            RatingImportError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RatingImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RatingImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads flat CSV exports of ratings and blocks.
pub struct RatingImporter;

impl RatingImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<BTreeMap<SubjectId, Vec<RatingRecord>>, RatingImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Ratings grouped by ratee, each history oldest first.
    pub fn from_reader<R: Read>(
        reader: R,
    ) -> Result<BTreeMap<SubjectId, Vec<RatingRecord>>, RatingImportError> {
        let mut grouped: BTreeMap<SubjectId, Vec<RatingRecord>> = BTreeMap::new();
        for rating in parser::parse_ratings(reader)? {
            grouped.entry(rating.ratee.clone()).or_default().push(rating);
        }

        for history in grouped.values_mut() {
            history.sort_by_key(|rating| rating.created_at);
        }

        Ok(grouped)
    }

    pub fn blocks_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<BlockRecord>, RatingImportError> {
        let file = std::fs::File::open(path)?;
        Self::blocks_from_reader(file)
    }

    pub fn blocks_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<BlockRecord>, RatingImportError> {
        parser::parse_blocks(reader)
    }
}
