//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Card-tap attendance check-in.
///
/// Checks attendees in at scheduled class sessions using contactless ID
/// cards, recording one attendance line per person per session.
#[derive(Debug, Parser)]
#[command(name = "attend", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Read card identifiers (one per line on stdin) and check them in.
    Run {
        /// Announce outcomes through the `say` command.
        #[arg(long)]
        speak: bool,
    },

    /// Show the current session and how many check-ins it has.
    Status,

    /// List the current session's attendance records.
    Report {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}
