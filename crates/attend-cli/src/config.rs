//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use attend_core::Schedule;
use attend_core::schedule::{DEFAULT_EARLY_MARGIN, DEFAULT_LATE_MARGIN, DEFAULT_SESSION_STARTS};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory where session record files are written.
    pub var_dir: PathBuf,
    /// Path to the roster file.
    pub roster_path: PathBuf,
    /// Class session start times as `HH:MM`, in increasing order.
    pub session_starts: Vec<String>,
    /// Minutes a check-in is accepted before a session starts.
    pub early_margin_minutes: u32,
    /// Minutes a check-in is accepted after a session starts.
    pub late_margin_minutes: u32,
    /// Announce outcomes through the `say` command.
    pub speak: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("var_dir", &self.var_dir)
            .field("roster_path", &self.roster_path)
            .field("session_starts", &self.session_starts)
            .field("early_margin_minutes", &self.early_margin_minutes)
            .field("late_margin_minutes", &self.late_margin_minutes)
            .field("speak", &self.speak)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            var_dir: data_dir.join("records"),
            roster_path: data_dir.join("roster.csv"),
            session_starts: DEFAULT_SESSION_STARTS
                .iter()
                .map(|(h, m)| format!("{h:02}:{m:02}"))
                .collect(),
            early_margin_minutes: DEFAULT_EARLY_MARGIN,
            late_margin_minutes: DEFAULT_LATE_MARGIN,
            speak: false,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (ATTEND_*)
        figment = figment.merge(Env::prefixed("ATTEND_"));

        figment.extract()
    }

    /// Builds the session schedule from the configured start times.
    pub fn schedule(&self) -> Result<Schedule> {
        let mut starts = Vec::with_capacity(self.session_starts.len());
        for entry in &self.session_starts {
            starts.push(
                parse_start(entry)
                    .with_context(|| format!("invalid session start time: {entry}"))?,
            );
        }
        Ok(Schedule::new(
            starts,
            self.early_margin_minutes,
            self.late_margin_minutes,
        ))
    }
}

/// Parses an `HH:MM` session start entry.
fn parse_start(entry: &str) -> Option<(u32, u32)> {
    let (hour, minute) = entry.split_once(':')?;
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// Returns the platform-specific config directory for attend.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("attend"))
}

/// Returns the platform-specific data directory for attend.
///
/// On Linux: `~/.local/share/attend`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("attend"))
}
