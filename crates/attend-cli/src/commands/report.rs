//! Report command: the current session's attendance records.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Serialize;

use attend_core::{AttendanceRecord, Roster, record::TIMESTAMP_FORMAT};
use attend_store::{attendance_path, replay_records};

use crate::Config;

/// One attendance row, re-joined with the roster for display.
#[derive(Debug, Serialize)]
struct ReportRow {
    time: String,
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fullname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    furigana: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gender: Option<String>,
}

pub fn run<W: Write>(writer: &mut W, config: &Config, now: NaiveDateTime, json: bool) -> Result<()> {
    let roster = Roster::load(&config.roster_path)
        .with_context(|| format!("failed to load roster from {}", config.roster_path.display()))?;
    let schedule = config.schedule()?;
    let stem = schedule.session_stem(now);

    let records = replay_records(
        &attendance_path(&config.var_dir, &stem),
        AttendanceRecord::parse_line,
    )?;

    // File order is write order, so rows come out chronologically.
    let rows: Vec<ReportRow> = records
        .iter()
        .map(|record| {
            let person = roster.get(&record.card);
            ReportRow {
                time: record.time.format(TIMESTAMP_FORMAT).to_string(),
                id: record.card.to_string(),
                fullname: person.map(|p| p.fullname.clone()),
                furigana: person.map(|p| p.furigana.clone()),
                gender: person.and_then(|p| p.gender.clone()),
            }
        })
        .collect();

    if json {
        serde_json::to_writer_pretty(&mut *writer, &rows).context("failed to encode report")?;
        writeln!(writer)?;
        return Ok(());
    }

    writeln!(writer, "Session {stem}: {} checked in", rows.len())?;
    for row in &rows {
        let name = row.fullname.as_deref().unwrap_or("(not on roster)");
        writeln!(writer, "{}  {}  {}", row.time, row.id, name)?;
    }

    Ok(())
}
