//! Calendar date ranges and the overlap rule.
//!
//! # Boundary convention
//!
//! Ranges are **half-open**: `[start, end)`. `start` is the first night of the
//! stay and `end` is the check-out day, which is not itself occupied. Two
//! ranges overlap iff `a.start < b.end && b.start < a.end`, so a booking that
//! ends on day D and one that starts on day D do not conflict.
//!
//! The PostgreSQL schema uses the same convention
//! (`daterange(start_date, end_date, '[)')`); the two must stay in sync.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Date format accepted on input (`2025-12-10`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The two date fields of a booking request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateField {
    /// `startDate`
    StartDate,
    /// `endDate`
    EndDate,
}

impl DateField {
    /// Wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StartDate => "startDate",
            Self::EndDate => "endDate",
        }
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a pair of dates is not a valid range.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// A date string is not a calendar date in `YYYY-MM-DD` form.
    #[error("{field} is not a valid date: {value:?}")]
    Malformed {
        /// Offending field
        field: DateField,
        /// Raw input
        value: String,
    },

    /// The end date is on or before the start date.
    #[error("endDate {end} cannot be on or before startDate {start}")]
    EndNotAfterStart {
        /// Requested start
        start: NaiveDate,
        /// Requested end
        end: NaiveDate,
    },
}

impl RangeError {
    /// The field a user should correct.
    #[must_use]
    pub const fn field(&self) -> DateField {
        match self {
            Self::Malformed { field, .. } => *field,
            Self::EndNotAfterStart { .. } => DateField::EndDate,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDateRange {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = RangeError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        Self::new(raw.start_date, raw.end_date)
    }
}

/// A non-empty, half-open range of calendar dates.
///
/// The constructor enforces `start < end`, so every `DateRange` in the system
/// covers at least one night.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange", rename_all = "camelCase")]
pub struct DateRange {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl DateRange {
    /// Creates a range from two dates.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::EndNotAfterStart`] if `end <= start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if start >= end {
            return Err(RangeError::EndNotAfterStart { start, end });
        }
        Ok(Self {
            start_date: start,
            end_date: end,
        })
    }

    /// Parses `YYYY-MM-DD` strings into a range.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Malformed`] naming the first unparseable field, or
    /// [`RangeError::EndNotAfterStart`] if the dates are out of order.
    pub fn parse(start: &str, end: &str) -> Result<Self, RangeError> {
        let start = parse_date(DateField::StartDate, start)?;
        let end = parse_date(DateField::EndDate, end)?;
        Self::new(start, end)
    }

    /// First occupied day.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start_date
    }

    /// Check-out day (exclusive).
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end_date
    }

    /// Number of nights covered. Always at least 1.
    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Returns `true` if `date` is an occupied night of this range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date < self.end_date
    }

    /// Returns `true` if the two ranges share at least one night.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_date < other.end_date && other.start_date < self.end_date
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_date, self.end_date)
    }
}

fn parse_date(field: DateField, value: &str) -> Result<NaiveDate, RangeError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| RangeError::Malformed {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use proptest::prelude::*;

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::parse(start, end).unwrap()
    }

    #[test]
    fn rejects_empty_and_inverted_ranges() {
        assert!(matches!(
            DateRange::parse("2025-12-10", "2025-12-10"),
            Err(RangeError::EndNotAfterStart { .. })
        ));
        assert!(matches!(
            DateRange::parse("2025-12-15", "2025-12-10"),
            Err(RangeError::EndNotAfterStart { .. })
        ));
    }

    #[test]
    fn rejects_malformed_dates() {
        let err = DateRange::parse("2025-13-01", "2025-12-20").unwrap_err();
        assert_eq!(err.field(), DateField::StartDate);

        let err = DateRange::parse("2025-12-01", "next tuesday").unwrap_err();
        assert_eq!(err.field(), DateField::EndDate);

        let err = DateRange::parse("2025-02-30", "2025-03-02").unwrap_err();
        assert_eq!(err.field(), DateField::StartDate);
    }

    #[test]
    fn partial_overlap_conflicts() {
        assert!(range("2025-12-10", "2025-12-15").overlaps(&range("2025-12-12", "2025-12-20")));
        assert!(range("2025-12-12", "2025-12-20").overlaps(&range("2025-12-10", "2025-12-15")));
    }

    #[test]
    fn containment_conflicts() {
        assert!(range("2025-12-01", "2025-12-31").overlaps(&range("2025-12-10", "2025-12-11")));
        assert!(range("2025-12-10", "2025-12-11").overlaps(&range("2025-12-01", "2025-12-31")));
    }

    #[test]
    fn back_to_back_ranges_do_not_conflict() {
        let first = range("2025-12-10", "2025-12-15");
        let second = range("2025-12-15", "2025-12-18");
        assert!(!first.overlaps(&second));
        assert!(!second.overlaps(&first));
    }

    #[test]
    fn check_out_day_is_not_occupied() {
        let stay = range("2025-12-10", "2025-12-15");
        assert!(stay.contains(stay.start()));
        assert!(!stay.contains(stay.end()));
        assert_eq!(stay.nights(), 5);
    }

    #[test]
    fn deserialize_rejects_inverted_range() {
        let ok = serde_json::from_str::<DateRange>(r#"{"startDate":"2025-12-10","endDate":"2025-12-15"}"#);
        assert!(ok.is_ok());

        let bad = serde_json::from_str::<DateRange>(r#"{"startDate":"2025-12-15","endDate":"2025-12-10"}"#);
        assert!(bad.is_err());
    }

    fn arb_range() -> impl Strategy<Value = DateRange> {
        (0i64..365, 1i64..30).prop_map(|(offset, len)| {
            let base = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
            let start = base + chrono::Duration::days(offset);
            DateRange::new(start, start + chrono::Duration::days(len)).unwrap()
        })
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(a in arb_range(), b in arb_range()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn overlap_iff_a_shared_night_exists(a in arb_range(), b in arb_range()) {
            let shared = a.start().iter_days()
                .take_while(|d| *d < a.end())
                .any(|d| b.contains(d));
            prop_assert_eq!(a.overlaps(&b), shared);
        }

        #[test]
        fn every_range_overlaps_itself(a in arb_range()) {
            prop_assert!(a.overlaps(&a));
        }
    }
}
