//! Entry number formatting and sequencing rules.
//!
//! Entry numbers are unique and strictly increasing within
//! `(company, journal)`: `JOURNALCODE-YYYY-NNNNNN`. Allocation itself is an
//! atomic persistence-layer operation (a per-journal counter row updated in
//! the posting transaction); this module owns the pure parts (formatting,
//! parsing, ordering) so they can be tested without a database.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A parsed entry number.
///
/// Ordering is by `(year, sequence)`, which matches allocation order
/// within one journal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct EntryNumber {
    year: i32,
    sequence: i64,
    journal_code: String,
}

/// Errors parsing an entry number string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseEntryNumberError {
    /// The string does not have the `CODE-YYYY-NNNNNN` shape.
    #[error("Malformed entry number: {0}")]
    Malformed(String),
}

impl EntryNumber {
    /// Creates an entry number from its parts.
    #[must_use]
    pub fn new(journal_code: &str, year: i32, sequence: i64) -> Self {
        Self {
            year,
            sequence,
            journal_code: journal_code.to_string(),
        }
    }

    /// The journal code component.
    #[must_use]
    pub fn journal_code(&self) -> &str {
        &self.journal_code
    }

    /// The year component.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// The sequence component.
    #[must_use]
    pub const fn sequence(&self) -> i64 {
        self.sequence
    }
}

impl std::fmt::Display for EntryNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{:06}",
            self.journal_code, self.year, self.sequence
        )
    }
}

impl From<EntryNumber> for String {
    fn from(number: EntryNumber) -> Self {
        number.to_string()
    }
}

impl std::str::FromStr for EntryNumber {
    type Err = ParseEntryNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseEntryNumberError::Malformed(s.to_string());

        // The journal code may itself contain dashes; year and sequence
        // are the last two components.
        let (rest, seq_part) = s.rsplit_once('-').ok_or_else(malformed)?;
        let (code, year_part) = rest.rsplit_once('-').ok_or_else(malformed)?;

        if code.is_empty() {
            return Err(malformed());
        }
        let year: i32 = year_part.parse().map_err(|_| malformed())?;
        let sequence: i64 = seq_part.parse().map_err(|_| malformed())?;
        if sequence < 1 {
            return Err(malformed());
        }

        Ok(Self::new(code, year, sequence))
    }
}

impl TryFrom<String> for EntryNumber {
    type Error = ParseEntryNumberError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    #[test]
    fn test_format() {
        let number = EntryNumber::new("VE", 2026, 123);
        assert_eq!(number.to_string(), "VE-2026-000123");
    }

    #[test]
    fn test_parse_roundtrip() {
        let number = EntryNumber::from_str("BQ-2025-004217").unwrap();
        assert_eq!(number.journal_code(), "BQ");
        assert_eq!(number.year(), 2025);
        assert_eq!(number.sequence(), 4217);
        assert_eq!(number.to_string(), "BQ-2025-004217");
    }

    #[test]
    fn test_parse_dashed_journal_code() {
        let number = EntryNumber::from_str("OD-MISC-2026-000001").unwrap();
        assert_eq!(number.journal_code(), "OD-MISC");
        assert_eq!(number.sequence(), 1);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(EntryNumber::from_str("VE2026000123").is_err());
        assert!(EntryNumber::from_str("VE-2026").is_err());
        assert!(EntryNumber::from_str("-2026-000123").is_err());
        assert!(EntryNumber::from_str("VE-2026-000000").is_err());
        assert!(EntryNumber::from_str("VE-year-000123").is_err());
    }

    proptest! {
        /// *For any* two sequences a < b in the same journal and year, the
        /// allocated numbers order the same way: numbering is strictly
        /// increasing, and issued numbers are never reused.
        #[test]
        fn prop_sequence_order_is_number_order(
            a in 1i64..1_000_000,
            b in 1i64..1_000_000,
        ) {
            prop_assume!(a != b);
            let na = EntryNumber::new("VE", 2026, a);
            let nb = EntryNumber::new("VE", 2026, b);
            prop_assert_eq!(a < b, na < nb);
            prop_assert_ne!(na, nb);
        }

        /// Display/parse round-trips for well-formed components.
        #[test]
        fn prop_display_parse_roundtrip(
            code in "[A-Z]{1,6}",
            year in 1990i32..2100,
            sequence in 1i64..10_000_000,
        ) {
            let number = EntryNumber::new(&code, year, sequence);
            let parsed = EntryNumber::from_str(&number.to_string()).unwrap();
            prop_assert_eq!(parsed, number);
        }
    }
}
