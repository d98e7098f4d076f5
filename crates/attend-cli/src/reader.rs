//! Card sources: where raw identifiers come from.
//!
//! The physical FeliCa poller is an external collaborator; it owns its
//! read timeouts and retries and hands the core nothing but usable
//! identifier strings. [`LineSource`] is the shipped stand-in: one
//! hex identifier per line from any reader, so the whole pipeline runs
//! from stdin or a prepared script.

use std::io::BufRead;

use anyhow::{Context, Result};

use attend_core::CardId;

/// Yields one card identifier per physical tap.
pub trait CardSource {
    /// Returns the next identifier, or `None` when the source is exhausted.
    fn next_card(&mut self) -> Result<Option<CardId>>;
}

/// Card source reading one identifier per line.
pub struct LineSource<R: BufRead> {
    reader: R,
}

impl<R: BufRead> LineSource<R> {
    pub const fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> CardSource for LineSource<R> {
    fn next_card(&mut self) -> Result<Option<CardId>> {
        let mut line = String::new();
        loop {
            line.clear();
            let read = self
                .reader
                .read_line(&mut line)
                .context("failed to read card identifier")?;
            if read == 0 {
                return Ok(None);
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            return Ok(Some(
                CardId::new(trimmed).context("invalid card identifier")?,
            ));
        }
    }
}
