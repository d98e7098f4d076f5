//! Status command: the current session and its counts.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use attend_core::{AttendanceRecord, Roster, UnknownCardRecord};
use attend_store::{attendance_path, replay_records, unknown_path};

use crate::Config;

pub fn run<W: Write>(writer: &mut W, config: &Config, now: NaiveDateTime) -> Result<()> {
    let roster = Roster::load(&config.roster_path)
        .with_context(|| format!("failed to load roster from {}", config.roster_path.display()))?;
    let schedule = config.schedule()?;

    let index = schedule.session_index(now);
    let stem = schedule.session_stem(now);

    // Read-only view of the session files; the stores themselves are not
    // opened so no empty file is created as a side effect.
    let checked_in = replay_records(
        &attendance_path(&config.var_dir, &stem),
        AttendanceRecord::parse_line,
    )?
    .len();
    let unknown = replay_records(
        &unknown_path(&config.var_dir, &stem),
        UnknownCardRecord::parse_line,
    )?
    .len();

    writeln!(writer, "Attendance status")?;
    writeln!(writer, "Var dir: {}", config.var_dir.display())?;
    writeln!(writer, "Roster: {} people", roster.len())?;
    if index == 0 {
        writeln!(writer, "Session: none (outside all session windows)")?;
    } else {
        writeln!(writer, "Session: {index}")?;
    }
    writeln!(writer, "Session file stem: {stem}")?;
    writeln!(writer, "Checked in: {checked_in}")?;
    writeln!(writer, "Unknown cards: {unknown}")?;

    Ok(())
}
