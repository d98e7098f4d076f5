//! Typed attendance and unknown-card records and their persisted line formats.
//!
//! Record files are TAB-separated, one record per line, with the same
//! timestamp format on write and parse so a restart can replay its own
//! output. Person fields in the attendance file are denormalized for
//! human readers; only the identifier and timestamp are re-hydrated.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::person::Person;
use crate::types::{CardId, ValidationError};

/// Field separator in record files.
pub const RECORD_SEPARATOR: char = '\t';

/// Timestamp format in record files, e.g. `2026-04-06-Mon 09:05:00`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%a %H:%M:%S";

/// Errors from parsing a persisted record line.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("invalid timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),
    #[error("invalid sequence number: {0}")]
    Sequence(#[from] std::num::ParseIntError),
    #[error(transparent)]
    Id(#[from] ValidationError),
}

/// A known person's first check-in within the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub card: CardId,
    pub time: NaiveDateTime,
}

impl AttendanceRecord {
    /// Formats the persisted line, denormalizing the person's fields.
    #[must_use]
    pub fn to_line(&self, person: &Person) -> String {
        [
            self.time.format(TIMESTAMP_FORMAT).to_string(),
            self.card.to_string(),
            person.fullname.clone(),
            person.furigana.clone(),
            person.gender.clone().unwrap_or_default(),
        ]
        .join(&RECORD_SEPARATOR.to_string())
    }

    /// Parses one attendance line back into a record.
    pub fn parse_line(line: &str) -> Result<Self, RecordError> {
        let fields: Vec<&str> = line.split(RECORD_SEPARATOR).collect();
        if fields.len() != 5 {
            return Err(RecordError::FieldCount {
                expected: 5,
                found: fields.len(),
            });
        }
        Ok(Self {
            time: NaiveDateTime::parse_from_str(fields[0], TIMESTAMP_FORMAT)?,
            card: CardId::new(fields[1])?,
        })
    }
}

/// A non-roster card's first read within the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCardRecord {
    pub card: CardId,
    pub time: NaiveDateTime,
    /// Per-session sequence number, starting at 1 for the first unknown card.
    pub sequence: u32,
}

impl UnknownCardRecord {
    /// Formats the persisted line.
    #[must_use]
    pub fn to_line(&self) -> String {
        [
            self.time.format(TIMESTAMP_FORMAT).to_string(),
            self.card.to_string(),
            self.sequence.to_string(),
        ]
        .join(&RECORD_SEPARATOR.to_string())
    }

    /// Parses one unknown-card line back into a record.
    pub fn parse_line(line: &str) -> Result<Self, RecordError> {
        let fields: Vec<&str> = line.split(RECORD_SEPARATOR).collect();
        if fields.len() != 3 {
            return Err(RecordError::FieldCount {
                expected: 3,
                found: fields.len(),
            });
        }
        Ok(Self {
            time: NaiveDateTime::parse_from_str(fields[0], TIMESTAMP_FORMAT)?,
            card: CardId::new(fields[1])?,
            sequence: fields[2].parse()?,
        })
    }
}
