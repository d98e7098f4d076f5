//! Roster loading: the table of known card holders.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::types::CardId;

/// Field separator in the roster file.
const ROSTER_SEPARATOR: char = ',';

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A person known to the roster.
///
/// Created once at roster load and never mutated. The furigana field
/// carries the phonetic reading of the name for the speech notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub id: CardId,
    pub fullname: String,
    pub furigana: String,
    pub gender: Option<String>,
}

/// Immutable lookup table from card identifier to person.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    people: HashMap<CardId, Person>,
}

impl Roster {
    /// Loads a roster from a comma-separated file.
    ///
    /// One person per line: `id,fullname,furigana,gender`. The gender
    /// column may be missing or empty. Lines starting with `#`, blank
    /// lines, and lines with fewer than three fields are skipped; a
    /// duplicate ID overwrites the earlier entry.
    pub fn load(path: &Path) -> Result<Self, RosterError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut people = HashMap::new();

        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split(ROSTER_SEPARATOR).collect();
            if fields.len() < 3 {
                tracing::warn!(line = lineno + 1, "skipping short roster line");
                continue;
            }

            let Ok(id) = CardId::new(fields[0].trim()) else {
                tracing::warn!(line = lineno + 1, "skipping roster line with empty ID");
                continue;
            };

            let gender = fields
                .get(3)
                .map(|g| g.trim())
                .filter(|g| !g.is_empty())
                .map(String::from);

            let person = Person {
                id: id.clone(),
                fullname: fields[1].trim().to_string(),
                furigana: fields[2].trim().to_string(),
                gender,
            };

            if people.insert(id, person).is_some() {
                tracing::warn!(line = lineno + 1, "duplicate roster ID, keeping last entry");
            }
        }

        Ok(Self { people })
    }

    pub fn get(&self, id: &CardId) -> Option<&Person> {
        self.people.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.people.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn roster_from(content: &str) -> Roster {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        Roster::load(file.path()).unwrap()
    }

    #[test]
    fn load_parses_full_lines() {
        let roster = roster_from("S100,Jane Doe,じぇーん,F\nS101,John Roe,じょん,M\n");

        assert_eq!(roster.len(), 2);
        let jane = roster.get(&CardId::new("S100").unwrap()).unwrap();
        assert_eq!(jane.fullname, "Jane Doe");
        assert_eq!(jane.furigana, "じぇーん");
        assert_eq!(jane.gender.as_deref(), Some("F"));
    }

    #[test]
    fn load_skips_comments_and_blank_lines() {
        let roster = roster_from("# roster for section A\n\nS100,Jane Doe,じぇーん,F\n\n");
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn load_skips_short_lines() {
        let roster = roster_from("S100,Jane Doe\nS101,John Roe,じょん,M\n");
        assert_eq!(roster.len(), 1);
        assert!(roster.get(&CardId::new("S100").unwrap()).is_none());
    }

    #[test]
    fn load_treats_gender_as_optional() {
        let roster = roster_from("S100,Jane Doe,じぇーん\nS101,John Roe,じょん,\n");

        let jane = roster.get(&CardId::new("S100").unwrap()).unwrap();
        assert_eq!(jane.gender, None);
        let john = roster.get(&CardId::new("S101").unwrap()).unwrap();
        assert_eq!(john.gender, None);
    }

    #[test]
    fn load_keeps_last_duplicate() {
        let roster = roster_from("S100,Jane Doe,じぇーん,F\nS100,Jane Q. Doe,じぇーん,F\n");

        assert_eq!(roster.len(), 1);
        let jane = roster.get(&CardId::new("S100").unwrap()).unwrap();
        assert_eq!(jane.fullname, "Jane Q. Doe");
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let result = Roster::load(Path::new("/nonexistent/roster.csv"));
        assert!(result.is_err());
    }
}
