//! Session scheduling: mapping wall-clock time to a class session.

use chrono::{NaiveDateTime, Timelike};

/// Default minutes a check-in is accepted before a session starts.
pub const DEFAULT_EARLY_MARGIN: u32 = 10;

/// Default minutes a check-in is accepted after a session starts.
pub const DEFAULT_LATE_MARGIN: u32 = 90;

/// Default class session start times, `(hour, minute)`.
pub const DEFAULT_SESSION_STARTS: &[(u32, u32)] =
    &[(9, 0), (10, 40), (13, 10), (14, 50), (16, 30), (18, 10)];

/// The day's session table with check-in margins.
///
/// Entry 0 is a sentinel at 00:00 so that index 0 always means "outside
/// any session"; configured class starts occupy indexes 1..=N. Entries
/// must be listed in increasing time order or the margin windows overlap
/// ambiguously; the first matching entry wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    starts: Vec<(u32, u32)>,
    early_margin_minutes: u32,
    late_margin_minutes: u32,
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new(
            DEFAULT_SESSION_STARTS.to_vec(),
            DEFAULT_EARLY_MARGIN,
            DEFAULT_LATE_MARGIN,
        )
    }
}

impl Schedule {
    /// Builds a schedule from class start times, prepending the sentinel.
    #[must_use]
    pub fn new(
        class_starts: Vec<(u32, u32)>,
        early_margin_minutes: u32,
        late_margin_minutes: u32,
    ) -> Self {
        let mut starts = Vec::with_capacity(class_starts.len() + 1);
        starts.push((0, 0));
        starts.extend(class_starts);
        Self {
            starts,
            early_margin_minutes,
            late_margin_minutes,
        }
    }

    /// Returns the session index for a timestamp.
    ///
    /// The first entry `i` whose window `start(i) - early ..= start(i) + late`
    /// contains the timestamp's minutes-since-midnight wins; 0 means the
    /// timestamp falls outside every session window.
    #[must_use]
    pub fn session_index(&self, at: NaiveDateTime) -> usize {
        let now = i64::from(at.hour()) * 60 + i64::from(at.minute());
        let early = i64::from(self.early_margin_minutes);
        let late = i64::from(self.late_margin_minutes);

        for (i, &(hour, minute)) in self.starts.iter().enumerate() {
            let start = i64::from(hour) * 60 + i64::from(minute);
            if start - early <= now && now <= start + late {
                return i;
            }
        }
        0
    }

    /// Returns the record file stem for a timestamp: `YYYY-MM-DD-Ddd-<index>`.
    ///
    /// Both stores key their rotation on this value, so a new day or a
    /// new session index means a new file.
    #[must_use]
    pub fn session_stem(&self, at: NaiveDateTime) -> String {
        format!("{}-{}", at.format("%Y-%m-%d-%a"), self.session_index(at))
    }
}
