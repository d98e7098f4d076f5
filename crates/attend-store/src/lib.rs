//! Storage layer for the attendance check-in system.
//!
//! Two durable, session-scoped stores over append-only TAB-separated
//! text files: [`AttendanceStore`] for known card holders and
//! [`UnknownCardStore`] for cards that match no roster entry.
//!
//! # Rotation
//!
//! Both stores are keyed by the schedule's session file stem
//! (`YYYY-MM-DD-Ddd-<index>`), recomputed at every write. When a write's
//! stem differs from the open one, the store opens the new target,
//! replays any pre-existing content for that stem, swaps in the new
//! handle (closing the old one), and only then accepts the write. The
//! in-memory set always mirrors exactly one on-disk file.
//!
//! # Durability
//!
//! Every accepted write is appended as one line and flushed before the
//! call returns. A write failure is not locally recoverable: losing an
//! attendance line silently is worse than stopping, so callers are
//! expected to treat [`StoreError::Io`] as fatal.
//!
//! # Replay
//!
//! Opening a store whose file already exists replays every parseable
//! line into memory, which recovers state after a process restart within
//! the same session. Blank lines, `#`-comment lines, and malformed lines
//! are skipped with a warning, never aborting the load.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use thiserror::Error;

use attend_core::{AttendanceRecord, CardId, Person, RecordError, Schedule, UnknownCardRecord};

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An error from the filesystem. Fatal for writes: the caller must
    /// not keep accepting reads it cannot durably record.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Returns the attendance file path for a session stem.
#[must_use]
pub fn attendance_path(var_dir: &Path, stem: &str) -> PathBuf {
    var_dir.join(format!("{stem}.csv"))
}

/// Returns the unknown-card file path for a session stem.
#[must_use]
pub fn unknown_path(var_dir: &Path, stem: &str) -> PathBuf {
    var_dir.join(format!("{stem}.unknown.csv"))
}

/// Replays a record file, skipping blank, comment, and malformed lines.
pub fn replay_records<T>(
    path: &Path,
    parse: impl Fn(&str) -> Result<T, RecordError>,
) -> Result<Vec<T>, StoreError> {
    let mut records = Vec::new();
    if !path.exists() {
        return Ok(records);
    }

    let reader = BufReader::new(File::open(path)?);
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    line = lineno + 1,
                    error = %e,
                    "skipping malformed record line"
                );
            }
        }
    }

    Ok(records)
}

/// Opens a record file for appending, creating it if necessary.
fn open_append(path: &Path) -> Result<File, StoreError> {
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Durable record of which known identifiers have checked in this session.
pub struct AttendanceStore {
    var_dir: PathBuf,
    schedule: Schedule,
    stem: String,
    file: File,
    records: HashMap<CardId, AttendanceRecord>,
}

impl AttendanceStore {
    /// Opens the store for the session containing `now`.
    ///
    /// If the session's file already exists on disk its records are
    /// replayed into memory before any write is accepted.
    pub fn open(var_dir: &Path, schedule: Schedule, now: NaiveDateTime) -> Result<Self, StoreError> {
        fs::create_dir_all(var_dir)?;
        let stem = schedule.session_stem(now);
        let (file, records) = Self::open_target(var_dir, &stem)?;
        Ok(Self {
            var_dir: var_dir.to_path_buf(),
            schedule,
            stem,
            file,
            records,
        })
    }

    fn open_target(
        var_dir: &Path,
        stem: &str,
    ) -> Result<(File, HashMap<CardId, AttendanceRecord>), StoreError> {
        let path = attendance_path(var_dir, stem);
        let records = replay_records(&path, AttendanceRecord::parse_line)?
            .into_iter()
            .map(|r| (r.card.clone(), r))
            .collect();
        let file = open_append(&path)?;
        Ok((file, records))
    }

    /// True iff the identifier already checked in within the current session.
    #[must_use]
    pub fn has(&self, card: &CardId) -> bool {
        self.records.contains_key(card)
    }

    pub fn get(&self, card: &CardId) -> Option<&AttendanceRecord> {
        self.records.get(card)
    }

    /// The session stem the store is currently writing to.
    #[must_use]
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Number of check-ins recorded for the current session.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records a first check-in: rotates if the session boundary was
    /// crossed, inserts the in-memory record, appends one line, flushes.
    pub fn record_checkin(
        &mut self,
        person: &Person,
        now: NaiveDateTime,
    ) -> Result<AttendanceRecord, StoreError> {
        self.rotate_if_needed(now)?;

        let record = AttendanceRecord {
            card: person.id.clone(),
            time: now,
        };
        self.records.insert(record.card.clone(), record.clone());
        writeln!(self.file, "{}", record.to_line(person))?;
        self.file.flush()?;
        Ok(record)
    }

    fn rotate_if_needed(&mut self, now: NaiveDateTime) -> Result<(), StoreError> {
        let stem = self.schedule.session_stem(now);
        if stem == self.stem {
            return Ok(());
        }

        tracing::info!(old = %self.stem, new = %stem, "rotating attendance store");
        let (file, records) = Self::open_target(&self.var_dir, &stem)?;
        // Assigning drops the old handle; no write can go through it.
        self.file = file;
        self.records = records;
        self.stem = stem;
        Ok(())
    }
}

/// Durable record of non-roster identifiers seen this session, plus the
/// monotonic per-session sequence counter.
pub struct UnknownCardStore {
    var_dir: PathBuf,
    schedule: Schedule,
    stem: String,
    file: File,
    records: HashMap<CardId, UnknownCardRecord>,
    /// Last allocated sequence number; 0 when none has been allocated.
    counter: u32,
}

impl UnknownCardStore {
    /// Opens the store for the session containing `now`, resuming the
    /// sequence counter past the maximum found on disk.
    pub fn open(var_dir: &Path, schedule: Schedule, now: NaiveDateTime) -> Result<Self, StoreError> {
        fs::create_dir_all(var_dir)?;
        let stem = schedule.session_stem(now);
        let (file, records, counter) = Self::open_target(var_dir, &stem)?;
        Ok(Self {
            var_dir: var_dir.to_path_buf(),
            schedule,
            stem,
            file,
            records,
            counter,
        })
    }

    fn open_target(
        var_dir: &Path,
        stem: &str,
    ) -> Result<(File, HashMap<CardId, UnknownCardRecord>, u32), StoreError> {
        let path = unknown_path(var_dir, stem);
        let replayed = replay_records(&path, UnknownCardRecord::parse_line)?;
        let counter = replayed.iter().map(|r| r.sequence).max().unwrap_or(0);
        let records = replayed.into_iter().map(|r| (r.card.clone(), r)).collect();
        let file = open_append(&path)?;
        Ok((file, records, counter))
    }

    #[must_use]
    pub fn has(&self, card: &CardId) -> bool {
        self.records.contains_key(card)
    }

    pub fn get(&self, card: &CardId) -> Option<&UnknownCardRecord> {
        self.records.get(card)
    }

    /// The session stem the store is currently writing to.
    #[must_use]
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Number of distinct unknown cards recorded for the current session.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records a first sighting of a non-roster identifier.
    ///
    /// Returns `Ok(None)` when the card was already recorded this
    /// session, in which case nothing is written and the caller must
    /// suppress any user-facing notification. Otherwise allocates the
    /// next sequence number, persists the record, and returns it.
    pub fn record_unknown(
        &mut self,
        card: &CardId,
        now: NaiveDateTime,
    ) -> Result<Option<UnknownCardRecord>, StoreError> {
        self.rotate_if_needed(now)?;

        if self.records.contains_key(card) {
            return Ok(None);
        }

        self.counter += 1;
        let record = UnknownCardRecord {
            card: card.clone(),
            time: now,
            sequence: self.counter,
        };
        self.records.insert(card.clone(), record.clone());
        writeln!(self.file, "{}", record.to_line())?;
        self.file.flush()?;
        Ok(Some(record))
    }

    fn rotate_if_needed(&mut self, now: NaiveDateTime) -> Result<(), StoreError> {
        let stem = self.schedule.session_stem(now);
        if stem == self.stem {
            return Ok(());
        }

        tracing::info!(old = %self.stem, new = %stem, "rotating unknown-card store");
        let (file, records, counter) = Self::open_target(&self.var_dir, &stem)?;
        self.file = file;
        self.records = records;
        self.counter = counter;
        self.stem = stem;
        Ok(())
    }
}
