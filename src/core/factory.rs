//! Conversion between inventory records and their one-line text form.
//!
//! ```text
//! Book,<title>,<cost>,<genre>,<platform>,<releaseYear>,<author>,<publisher>
//! Movie,<title>,<cost>,<genre>,<platform>,<releaseYear>,<director>,<durationMinutes>
//! Game,<title>,<cost>,<genre>,<platform>,<releaseYear>,<developer>,<rating>
//! ```
//!
//! Fields are not escaped; a value containing a comma cannot be stored.

use chrono::TimeDelta;
use regex::Regex;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

use crate::domain::model::{InventoryRecord, ItemDetails, ItemInfo, ItemKind};

pub const FIELD_DELIMITER: char = ',';
pub const FIELD_COUNT: usize = 8;

// Plain decimal notation only: `Decimal::from_str` would also take `1_0` and `1e2`.
static COST_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)$").ok());

/// Why a line could not become a record. The loader discards these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordParseError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("unknown item type `{0}`")]
    UnknownKind(String),

    #[error("field `{field}` is not a valid number: `{value}`")]
    InvalidNumber { field: &'static str, value: String },

    #[error("title is empty")]
    MissingTitle,
}

/// Parses one line of the inventory file.
///
/// Blank lines yield `Ok(None)`. Every other line either becomes a record or
/// fails as a whole; no partial record is ever produced.
pub fn parse_record(line: &str) -> Result<Option<InventoryRecord>, RecordParseError> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if fields.len() != FIELD_COUNT {
        return Err(RecordParseError::FieldCount {
            expected: FIELD_COUNT,
            found: fields.len(),
        });
    }

    let kind = ItemKind::from_tag(fields[0])
        .ok_or_else(|| RecordParseError::UnknownKind(fields[0].to_string()))?;

    let title = fields[1];
    if title.trim().is_empty() {
        return Err(RecordParseError::MissingTitle);
    }

    let info = ItemInfo {
        title: title.to_string(),
        cost: parse_cost(fields[2])?,
        genre: fields[3].to_string(),
        platform: fields[4].to_string(),
        release_year: parse_number::<u32>("releaseYear", fields[5])?,
    };

    let details = match kind {
        ItemKind::Book => ItemDetails::Book {
            author: fields[6].to_string(),
            publisher: fields[7].to_string(),
        },
        ItemKind::Movie => {
            let minutes = parse_number::<i32>("durationMinutes", fields[7])?;
            ItemDetails::Movie {
                director: fields[6].to_string(),
                duration: TimeDelta::minutes(i64::from(minutes)),
            }
        }
        ItemKind::VideoGame => {
            let rating = parse_number::<f32>("rating", fields[7])?;
            if !rating.is_finite() {
                return Err(RecordParseError::InvalidNumber {
                    field: "rating",
                    value: fields[7].to_string(),
                });
            }
            ItemDetails::VideoGame {
                developer: fields[6].to_string(),
                rating,
            }
        }
    };

    // Title, duration and rating were checked above, so construction holds.
    InventoryRecord::new(info, details)
        .map(Some)
        .map_err(|_| RecordParseError::MissingTitle)
}

fn parse_cost(raw: &str) -> Result<Decimal, RecordParseError> {
    let plain = COST_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(raw.trim()));
    if !plain {
        return Err(RecordParseError::InvalidNumber {
            field: "cost",
            value: raw.to_string(),
        });
    }
    parse_number("cost", raw)
}

fn parse_number<T: FromStr>(field: &'static str, raw: &str) -> Result<T, RecordParseError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| RecordParseError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

/// Formats a record as one line, in the field order [`parse_record`] reads.
pub fn format_record(record: &InventoryRecord) -> String {
    record.to_string()
}

impl fmt::Display for InventoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{},",
            self.kind().tag(),
            self.title(),
            self.cost(),
            self.genre(),
            self.platform(),
            self.release_year()
        )?;

        match self.details() {
            ItemDetails::Book { author, publisher } => write!(f, "{},{}", author, publisher),
            ItemDetails::Movie { director, duration } => {
                write!(f, "{},{}", director, duration.num_minutes())
            }
            ItemDetails::VideoGame { developer, rating } => write!(f, "{},{}", developer, rating),
        }
    }
}
