//! The check-in engine: classifies a single card-read event.

use chrono::NaiveDateTime;

use attend_core::{AttendanceRecord, CardId, Person, Roster, UnknownCardRecord};
use attend_store::{AttendanceStore, StoreError, UnknownCardStore};

/// Classified outcome of one card-read event.
///
/// Outcomes are handed to the notification collaborator; the engine
/// itself performs no I/O beyond the store writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// First check-in of a known identifier this session.
    Success {
        record: AttendanceRecord,
        person: Person,
    },
    /// Known, already checked in, and the immediately preceding read was
    /// the same card. Guards against rapid repeated polling of a card
    /// resting on the reader; silent at the notifier.
    DoubleRead {
        record: AttendanceRecord,
        person: Person,
    },
    /// Known, already checked in earlier this session, with at least one
    /// other read in between. The user is told the card was already
    /// accepted.
    Ignored {
        record: AttendanceRecord,
        person: Person,
    },
    /// First read of an identifier that matches no roster entry. Carries
    /// the assigned per-session sequence number in the record.
    UnknownCard { record: UnknownCardRecord },
}

/// Orchestrates one read event against the roster and both stores.
pub struct CheckInEngine {
    roster: Roster,
    attendance: AttendanceStore,
    unknown: UnknownCardStore,
    /// Identifier of the previous processed event, unknown cards included.
    last_card: Option<CardId>,
}

impl CheckInEngine {
    #[must_use]
    pub const fn new(
        roster: Roster,
        attendance: AttendanceStore,
        unknown: UnknownCardStore,
    ) -> Self {
        Self {
            roster,
            attendance,
            unknown,
            last_card: None,
        }
    }

    /// Processes one card read at the given timestamp.
    ///
    /// Returns `Ok(None)` for a repeat read of an unknown card, which is
    /// fully suppressed. Store write failures propagate; the caller must
    /// stop accepting reads it cannot durably record.
    pub fn process(
        &mut self,
        card: &CardId,
        now: NaiveDateTime,
    ) -> Result<Option<Outcome>, StoreError> {
        let outcome = if let Some(person) = self.roster.get(card).cloned() {
            if let Some(existing) = self.attendance.get(card).cloned() {
                if self.last_card.as_ref() == Some(card) {
                    Some(Outcome::DoubleRead {
                        record: existing,
                        person,
                    })
                } else {
                    Some(Outcome::Ignored {
                        record: existing,
                        person,
                    })
                }
            } else {
                let record = self.attendance.record_checkin(&person, now)?;
                Some(Outcome::Success { record, person })
            }
        } else {
            self.unknown
                .record_unknown(card, now)?
                .map(|record| Outcome::UnknownCard { record })
        };

        self.last_card = Some(card.clone());
        Ok(outcome)
    }

    /// The attendance store, for status inspection.
    #[must_use]
    pub const fn attendance(&self) -> &AttendanceStore {
        &self.attendance
    }

    /// The unknown-card store, for status inspection.
    #[must_use]
    pub const fn unknown_cards(&self) -> &UnknownCardStore {
        &self.unknown
    }
}
