//! Notification collaborator: console output and optional speech.

use std::io::{self, Write};
use std::process::Command;

use attend_core::{AttendanceRecord, Person, UnknownCardRecord};

use crate::engine::Outcome;

/// Consumer of classified check-in outcomes.
pub trait Notify {
    fn on_success(&mut self, record: &AttendanceRecord, person: &Person) -> io::Result<()>;
    fn on_double_read(&mut self, record: &AttendanceRecord, person: &Person) -> io::Result<()>;
    fn on_notice_ignorance(&mut self, record: &AttendanceRecord, person: &Person)
    -> io::Result<()>;
    fn on_unknown_card(&mut self, record: &UnknownCardRecord) -> io::Result<()>;
}

/// Routes an engine outcome to the matching notifier call.
pub fn dispatch(outcome: &Outcome, notifier: &mut impl Notify) -> io::Result<()> {
    match outcome {
        Outcome::Success { record, person } => notifier.on_success(record, person),
        Outcome::DoubleRead { record, person } => notifier.on_double_read(record, person),
        Outcome::Ignored { record, person } => notifier.on_notice_ignorance(record, person),
        Outcome::UnknownCard { record } => notifier.on_unknown_card(record),
    }
}

/// Notifier that prints one line per event and optionally speaks it.
pub struct ConsoleNotifier<W: Write> {
    writer: W,
    speak: bool,
}

impl<W: Write> ConsoleNotifier<W> {
    pub const fn new(writer: W, speak: bool) -> Self {
        Self { writer, speak }
    }

    /// Speaks a phrase through the system `say` command.
    ///
    /// Speech is best-effort; a missing or failing `say` binary is
    /// logged and never interrupts check-in processing.
    fn say(&self, phrase: &str) {
        if !self.speak {
            return;
        }
        if let Err(e) = Command::new("say").arg(phrase).status() {
            tracing::warn!(error = %e, "speech command failed");
        }
    }
}

impl<W: Write> Notify for ConsoleNotifier<W> {
    fn on_success(&mut self, record: &AttendanceRecord, person: &Person) -> io::Result<()> {
        writeln!(
            self.writer,
            "checked in: {}\t{}",
            record.card, person.fullname
        )?;
        self.say(&format!("Welcome, {}!", person.furigana));
        Ok(())
    }

    fn on_double_read(&mut self, record: &AttendanceRecord, _person: &Person) -> io::Result<()> {
        // Card resting on the reader; nothing user-facing.
        tracing::debug!(card = %record.card, "double read");
        Ok(())
    }

    fn on_notice_ignorance(
        &mut self,
        record: &AttendanceRecord,
        person: &Person,
    ) -> io::Result<()> {
        writeln!(
            self.writer,
            "already checked in: {}\t{}",
            record.card, person.fullname
        )?;
        self.say(&format!("Already checked in, {}!", person.furigana));
        Ok(())
    }

    fn on_unknown_card(&mut self, record: &UnknownCardRecord) -> io::Result<()> {
        writeln!(
            self.writer,
            "unknown card: {} (#{})",
            record.card, record.sequence
        )?;
        self.say("Unknown card.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attend_core::CardId;
    use chrono::NaiveDate;

    fn jane() -> Person {
        Person {
            id: CardId::new("S100").unwrap(),
            fullname: "Jane Doe".to_string(),
            furigana: "じぇーん".to_string(),
            gender: Some("F".to_string()),
        }
    }

    fn record() -> AttendanceRecord {
        AttendanceRecord {
            card: CardId::new("S100").unwrap(),
            time: NaiveDate::from_ymd_opt(2026, 4, 6)
                .unwrap()
                .and_hms_opt(9, 5, 0)
                .unwrap(),
        }
    }

    #[test]
    fn success_prints_one_line() {
        let mut output = Vec::new();
        let mut notifier = ConsoleNotifier::new(&mut output, false);
        notifier.on_success(&record(), &jane()).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "checked in: S100\tJane Doe\n"
        );
    }

    #[test]
    fn double_read_is_silent() {
        let mut output = Vec::new();
        let mut notifier = ConsoleNotifier::new(&mut output, false);
        notifier.on_double_read(&record(), &jane()).unwrap();

        assert!(output.is_empty());
    }

    #[test]
    fn unknown_card_line_carries_sequence() {
        let unknown = UnknownCardRecord {
            card: CardId::new("Z999").unwrap(),
            time: record().time,
            sequence: 1,
        };
        let mut output = Vec::new();
        let mut notifier = ConsoleNotifier::new(&mut output, false);
        notifier.on_unknown_card(&unknown).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "unknown card: Z999 (#1)\n"
        );
    }
}
