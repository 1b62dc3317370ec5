//! Conflict checking for proposed bookings.
//!
//! The checker is a pure scan over the complete booking set of one space.
//! Callers are responsible for handing it *all* current bookings (no pages,
//! no partial reads) and for holding whatever lock makes "check, then insert"
//! atomic.

use crate::date_range::{DateField, DateRange};
use crate::types::Booking;
use serde::{Deserialize, Serialize};

/// Details of a rejected booking request, shaped for user-facing messages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConflict {
    /// Fields of the request that collide with an existing booking.
    pub fields: Vec<DateField>,
    /// The range that is already taken, when the engine knows it.
    ///
    /// `None` when the collision was detected by a storage constraint rather
    /// than by the scan.
    pub existing: Option<DateRange>,
}

impl BookingConflict {
    /// Conflict against a known existing range.
    #[must_use]
    pub fn with_existing(proposed: &DateRange, existing: &DateRange) -> Self {
        Self {
            fields: colliding_fields(proposed, existing),
            existing: Some(*existing),
        }
    }

    /// Conflict reported by the store without the colliding range.
    #[must_use]
    pub fn detected_by_store() -> Self {
        Self {
            fields: vec![DateField::StartDate, DateField::EndDate],
            existing: None,
        }
    }

    /// User-facing message for one field, e.g. for a form error.
    #[must_use]
    pub const fn message_for(field: DateField) -> &'static str {
        match field {
            DateField::StartDate => "Start date conflicts with an existing booking",
            DateField::EndDate => "End date conflicts with an existing booking",
        }
    }
}

/// Fields of `proposed` that collide with `existing`.
///
/// An overlap blocks the stay as a whole: moving only one end of the request
/// is not guaranteed to clear it, so both fields are named whenever the ranges
/// overlap. A single field is never reported, even when only one endpoint of
/// `proposed` falls inside `existing`. Returns an empty list when they do not
/// overlap.
#[must_use]
pub fn colliding_fields(proposed: &DateRange, existing: &DateRange) -> Vec<DateField> {
    if proposed.overlaps(existing) {
        vec![DateField::StartDate, DateField::EndDate]
    } else {
        Vec::new()
    }
}

/// Returns the first booking whose range overlaps `proposed`.
///
/// Scans every booking it is given; the result does not depend on order beyond
/// which of several conflicting bookings is reported.
pub fn find_conflict<'a, I>(proposed: &DateRange, bookings: I) -> Option<&'a Booking>
where
    I: IntoIterator<Item = &'a Booking>,
{
    bookings
        .into_iter()
        .find(|booking| booking.dates.overlaps(proposed))
}

/// Checks `proposed` against the full booking set of a space.
///
/// # Errors
///
/// Returns a [`BookingConflict`] describing the first overlapping booking.
pub fn check_availability<'a, I>(proposed: &DateRange, bookings: I) -> Result<(), BookingConflict>
where
    I: IntoIterator<Item = &'a Booking>,
{
    match find_conflict(proposed, bookings) {
        Some(existing) => Err(BookingConflict::with_existing(proposed, &existing.dates)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::types::{SpaceId, UserId};
    use chrono::Utc;

    fn booking(space_id: SpaceId, start: &str, end: &str) -> Booking {
        Booking::new(
            space_id,
            UserId::new(),
            DateRange::parse(start, end).unwrap(),
            Utc::now(),
        )
    }

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::parse(start, end).unwrap()
    }

    #[test]
    fn no_bookings_means_no_conflict() {
        let bookings: Vec<Booking> = Vec::new();
        assert!(find_conflict(&range("2025-12-10", "2025-12-15"), &bookings).is_none());
    }

    #[test]
    fn finds_overlap_regardless_of_position() {
        let space = SpaceId::new();
        let taken = booking(space, "2025-12-10", "2025-12-15");
        let mut bookings = vec![
            booking(space, "2025-01-01", "2025-01-05"),
            booking(space, "2025-06-01", "2025-06-10"),
            taken.clone(),
            booking(space, "2026-02-01", "2026-02-03"),
        ];

        let proposed = range("2025-12-12", "2025-12-20");
        assert_eq!(find_conflict(&proposed, &bookings).unwrap().id, taken.id);

        bookings.reverse();
        assert_eq!(find_conflict(&proposed, &bookings).unwrap().id, taken.id);
    }

    #[test]
    fn back_to_back_is_available() {
        let space = SpaceId::new();
        let bookings = vec![booking(space, "2025-12-10", "2025-12-15")];
        assert!(check_availability(&range("2025-12-15", "2025-12-18"), &bookings).is_ok());
        assert!(check_availability(&range("2025-12-05", "2025-12-10"), &bookings).is_ok());
    }

    #[test]
    fn conflict_names_both_fields_and_existing_range() {
        let space = SpaceId::new();
        let bookings = vec![booking(space, "2025-12-10", "2025-12-15")];

        let conflict = check_availability(&range("2025-12-12", "2025-12-20"), &bookings).unwrap_err();
        assert_eq!(conflict.fields, vec![DateField::StartDate, DateField::EndDate]);
        assert_eq!(conflict.existing, Some(range("2025-12-10", "2025-12-15")));
    }

    #[test]
    fn one_sided_overlap_still_names_both_fields() {
        let existing = range("2025-12-10", "2025-12-15");
        let both = vec![DateField::StartDate, DateField::EndDate];

        // Only the start falls inside the existing stay.
        assert_eq!(colliding_fields(&range("2025-12-14", "2025-12-20"), &existing), both);
        // Only the end falls inside.
        assert_eq!(colliding_fields(&range("2025-12-01", "2025-12-11"), &existing), both);
        // Neither endpoint inside, but the request swallows the stay.
        assert_eq!(colliding_fields(&range("2025-12-01", "2025-12-31"), &existing), both);
    }

    #[test]
    fn no_fields_collide_for_disjoint_ranges() {
        assert!(colliding_fields(&range("2025-01-01", "2025-01-02"), &range("2025-02-01", "2025-02-02")).is_empty());
    }
}
