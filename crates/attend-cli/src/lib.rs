//! Attendance check-in CLI library.
//!
//! This crate wires the roster, schedule, and stores into the check-in
//! engine and exposes the `attend` command-line interface.

mod cli;
pub mod commands;
mod config;
pub mod engine;
pub mod notify;
pub mod reader;

pub use cli::{Cli, Commands};
pub use config::Config;
