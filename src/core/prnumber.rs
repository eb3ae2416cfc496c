//! PR-number construction and sequence suggestion
//!
//! A PR number encodes division, month, 2-digit year, and a per-division,
//! per-year sequence: `"{DIV}-{MMM}-{YY}-{NNN}"`, e.g. `IT-JAN-24-004`.
//! The suggested sequence is advisory only; whatever the user submits is
//! written, so duplicates are possible and reported by `pft validate`
//! rather than prevented here.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::entities::Record;

/// Month codes used in PR numbers, indexed by month number - 1
pub const MONTH_CODES: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// The month code for a date (e.g., "JAN")
pub fn month_code(date: NaiveDate) -> &'static str {
    MONTH_CODES[date.month0() as usize]
}

/// The 2-digit year segment for a date (e.g., "24")
pub fn year_code(date: NaiveDate) -> String {
    format!("{:02}", date.year() % 100)
}

/// A parsed PR number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PrNumber {
    pub division: String,
    pub month: String,
    pub year: String,
    pub sequence: String,
}

impl PrNumber {
    /// Build a PR number from its four parts
    ///
    /// Pure formatting; each part only has to be non-empty, the caller is
    /// responsible for anything stricter before submit.
    pub fn build(
        division: &str,
        month: &str,
        year: &str,
        sequence: &str,
    ) -> Result<Self, PrNumberError> {
        for (part, value) in [
            ("division", division),
            ("month", month),
            ("year", year),
            ("sequence", sequence),
        ] {
            if value.trim().is_empty() {
                return Err(PrNumberError::MissingPart(part));
            }
        }
        Ok(Self {
            division: division.to_string(),
            month: month.to_string(),
            year: year.to_string(),
            sequence: sequence.to_string(),
        })
    }
}

impl fmt::Display for PrNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.division, self.month, self.year, self.sequence
        )
    }
}

impl FromStr for PrNumber {
    type Err = PrNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 4 {
            return Err(PrNumberError::WrongSegmentCount {
                value: s.to_string(),
                found: parts.len(),
            });
        }
        Self::build(parts[0], parts[1], parts[2], parts[3])
    }
}

impl TryFrom<String> for PrNumber {
    type Error = PrNumberError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PrNumber> for String {
    fn from(pr: PrNumber) -> Self {
        pr.to_string()
    }
}

/// Suggest the next 3-digit sequence for a division and 2-digit year
///
/// Scans existing records whose PR number starts with `"{abbr}-"` and
/// contains `"-{year}-"`, takes the numeric maximum of their 4th segment
/// (unparseable segments count as 0), and returns max + 1 zero-padded.
pub fn next_sequence(abbreviation: &str, year: &str, records: &[Record]) -> String {
    let prefix = format!("{}-", abbreviation);
    let year_mark = format!("-{}-", year);

    let max = records
        .iter()
        .filter(|r| r.pr_number.starts_with(&prefix) && r.pr_number.contains(&year_mark))
        .map(|r| {
            r.pr_number
                .split('-')
                .nth(3)
                .and_then(|seg| seg.parse::<u32>().ok())
                .unwrap_or(0)
        })
        .max()
        .unwrap_or(0);

    format!("{:03}", max + 1)
}

/// Errors that can occur when parsing or building PR numbers
#[derive(Debug, Error)]
pub enum PrNumberError {
    #[error("expected 4 hyphen-separated segments in '{value}', found {found}")]
    WrongSegmentCount { value: String, found: usize },

    #[error("PR number {0} segment is empty")]
    MissingPart(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::record::{Location, ShelfPath};
    use crate::core::identity::{EntityId, EntityPrefix};

    fn record_with_pr(pr: &str) -> Record {
        Record::new(
            pr.to_string(),
            "test item".to_string(),
            Location::Shelf(ShelfPath {
                shelf: EntityId::new(EntityPrefix::Shf),
                cabinet: EntityId::new(EntityPrefix::Cab),
                folder: EntityId::new(EntityPrefix::Fld),
            }),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            "test".to_string(),
        )
    }

    #[test]
    fn test_next_sequence_skips_gaps() {
        // Gap at 002: the suggestion continues from the max, not the gap
        let records = vec![record_with_pr("IT-JAN-24-001"), record_with_pr("IT-JAN-24-003")];
        assert_eq!(next_sequence("IT", "24", &records), "004");
    }

    #[test]
    fn test_next_sequence_scoped_per_division_and_year() {
        let records = vec![
            record_with_pr("IT-JAN-24-007"),
            record_with_pr("HR-JAN-24-010"),
            record_with_pr("IT-DEC-23-099"),
        ];
        assert_eq!(next_sequence("IT", "24", &records), "008");
        assert_eq!(next_sequence("HR", "24", &records), "011");
        assert_eq!(next_sequence("IT", "23", &records), "100");
        assert_eq!(next_sequence("GSO", "24", &records), "001");
    }

    #[test]
    fn test_next_sequence_unparseable_segment_counts_as_zero() {
        let records = vec![record_with_pr("IT-JAN-24-abc")];
        assert_eq!(next_sequence("IT", "24", &records), "001");
    }

    #[test]
    fn test_pr_number_roundtrip() {
        let pr: PrNumber = "IT-JAN-24-004".parse().unwrap();
        assert_eq!(pr.division, "IT");
        assert_eq!(pr.month, "JAN");
        assert_eq!(pr.year, "24");
        assert_eq!(pr.sequence, "004");
        assert_eq!(pr.to_string(), "IT-JAN-24-004");
    }

    #[test]
    fn test_pr_number_rejects_wrong_shape() {
        assert!(matches!(
            "IT-JAN-24".parse::<PrNumber>(),
            Err(PrNumberError::WrongSegmentCount { found: 3, .. })
        ));
        assert!(matches!(
            "IT--24-001".parse::<PrNumber>(),
            Err(PrNumberError::MissingPart("month"))
        ));
    }

    #[test]
    fn test_month_codes() {
        assert_eq!(month_code(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()), "JAN");
        assert_eq!(month_code(NaiveDate::from_ymd_opt(2024, 12, 5).unwrap()), "DEC");
        assert_eq!(year_code(NaiveDate::from_ymd_opt(2024, 6, 5).unwrap()), "24");
    }
}
