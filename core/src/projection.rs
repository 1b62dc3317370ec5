//! Role-aware read models of bookings.
//!
//! A booking is never handed to a caller as-is. It is projected into one of
//! two views depending on who is asking:
//!
//! ```text
//!                    ┌─────────────────────────┐
//!  caller == owner ─►│ OwnerView               │ id, guest identity, guest name,
//!                    │                         │ dates, audit timestamps
//!                    └─────────────────────────┘
//!                    ┌─────────────────────────┐
//!  anyone else ─────►│ GuestView               │ space id and blocked dates only
//!                    └─────────────────────────┘
//! ```
//!
//! [`project`] is a pure function: the same inputs always give the same view.

use crate::types::{Booking, BookingId, SpaceId, User, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// What a space owner sees for each booking of their space.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerView {
    /// Booking ID
    pub id: BookingId,
    /// Booked space
    pub space_id: SpaceId,
    /// Guest who made the booking
    pub guest_user_id: UserId,
    /// Guest display name, if the guest's account is still known
    pub guest_name: Option<String>,
    /// First night
    pub start_date: NaiveDate,
    /// Check-out day
    pub end_date: NaiveDate,
    /// When the booking was created
    pub created_at: DateTime<Utc>,
    /// When the booking was last updated
    pub updated_at: DateTime<Utc>,
}

/// What everyone other than the owner sees: only that the dates are taken.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestView {
    /// Booked space
    pub space_id: SpaceId,
    /// First night
    pub start_date: NaiveDate,
    /// Check-out day
    pub end_date: NaiveDate,
}

/// A booking as shown to a particular caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookingView {
    /// Full detail for the space owner
    Owner(OwnerView),
    /// Blocked dates for everyone else
    Guest(GuestView),
}

impl BookingView {
    /// Returns `true` for the owner projection.
    #[must_use]
    pub const fn is_owner_view(&self) -> bool {
        matches!(self, Self::Owner(_))
    }

    /// Space the booking belongs to.
    #[must_use]
    pub const fn space_id(&self) -> SpaceId {
        match self {
            Self::Owner(view) => view.space_id,
            Self::Guest(view) => view.space_id,
        }
    }

    /// First night of the booking.
    #[must_use]
    pub const fn start_date(&self) -> NaiveDate {
        match self {
            Self::Owner(view) => view.start_date,
            Self::Guest(view) => view.start_date,
        }
    }

    /// Check-out day of the booking.
    #[must_use]
    pub const fn end_date(&self) -> NaiveDate {
        match self {
            Self::Owner(view) => view.end_date,
            Self::Guest(view) => view.end_date,
        }
    }
}

/// Projects a booking for `caller`.
///
/// `guest` is the booking's guest account. It only contributes to the owner
/// view and may be `None` for guest callers (the service does not look it up).
#[must_use]
pub fn project(
    booking: &Booking,
    guest: Option<&User>,
    caller: UserId,
    space_owner: UserId,
) -> BookingView {
    if caller == space_owner {
        BookingView::Owner(OwnerView {
            id: booking.id,
            space_id: booking.space_id,
            guest_user_id: booking.guest_id,
            guest_name: guest
                .filter(|user| user.id == booking.guest_id)
                .map(User::display_name),
            start_date: booking.start_date(),
            end_date: booking.end_date(),
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        })
    } else {
        BookingView::Guest(GuestView {
            space_id: booking.space_id,
            start_date: booking.start_date(),
            end_date: booking.end_date(),
        })
    }
}
