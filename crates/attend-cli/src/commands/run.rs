//! Run command: the check-in loop.

use std::io;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};

use attend_core::Roster;
use attend_store::{AttendanceStore, UnknownCardStore};

use crate::Config;
use crate::engine::CheckInEngine;
use crate::notify::{self, ConsoleNotifier, Notify};
use crate::reader::{CardSource, LineSource};

/// Runs the check-in loop over stdin until the source is exhausted.
pub fn run(config: &Config, speak: bool) -> Result<()> {
    let mut engine = open_engine(config)?;

    let stdin = io::stdin();
    let mut source = LineSource::new(stdin.lock());
    let mut notifier = ConsoleNotifier::new(io::stdout(), speak || config.speak);

    run_loop(&mut engine, &mut source, &mut notifier, || {
        Local::now().naive_local()
    })
}

/// Builds the engine from configuration: roster plus both stores opened
/// for the current session.
pub fn open_engine(config: &Config) -> Result<CheckInEngine> {
    let roster = Roster::load(&config.roster_path)
        .with_context(|| format!("failed to load roster from {}", config.roster_path.display()))?;
    tracing::info!(people = roster.len(), "loaded roster");

    let schedule = config.schedule()?;
    let now = Local::now().naive_local();
    let attendance = AttendanceStore::open(&config.var_dir, schedule.clone(), now)
        .context("failed to open attendance store")?;
    let unknown = UnknownCardStore::open(&config.var_dir, schedule, now)
        .context("failed to open unknown-card store")?;
    tracing::info!(
        stem = attendance.stem(),
        checked_in = attendance.len(),
        unknown = unknown.len(),
        "opened session stores"
    );

    Ok(CheckInEngine::new(roster, attendance, unknown))
}

/// Processes card reads one at a time: each event is fully handled, and
/// its outcome delivered, before the next read is accepted.
pub fn run_loop(
    engine: &mut CheckInEngine,
    source: &mut impl CardSource,
    notifier: &mut impl Notify,
    mut now: impl FnMut() -> NaiveDateTime,
) -> Result<()> {
    while let Some(card) = source.next_card()? {
        let outcome = engine
            .process(&card, now())
            .context("failed to record card read")?;
        if let Some(outcome) = outcome {
            notify::dispatch(&outcome, notifier).context("failed to deliver notification")?;
        }
    }
    Ok(())
}
