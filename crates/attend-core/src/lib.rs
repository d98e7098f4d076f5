//! Core domain logic for the attendance check-in system.
//!
//! This crate contains the fundamental types and logic for:
//! - Card identifiers and roster lookup
//! - Session scheduling: mapping wall-clock time to a class session
//! - Typed attendance and unknown-card records with their line formats

pub mod person;
pub mod record;
pub mod schedule;
mod types;

pub use person::{Person, Roster, RosterError};
pub use record::{AttendanceRecord, RecordError, UnknownCardRecord};
pub use schedule::Schedule;
pub use types::{CardId, ValidationError};
