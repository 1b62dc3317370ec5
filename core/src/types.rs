//! Domain types for spaces, bookings and reviews.
//!
//! Bookings and reviews are plain records here: every rule about when they may
//! be created lives in [`crate::conflict`] and in the service that orchestrates
//! the store.

use crate::date_range::DateRange;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            #[doc = concat!("Creates a new random `", stringify!($name), "`")]
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            #[doc = concat!("Create a `", stringify!($name), "` from a `Uuid`")]
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the inner UUID
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id! {
    /// Unique identifier for a rentable space
    SpaceId
}

uuid_id! {
    /// Unique identifier for a booking
    BookingId
}

uuid_id! {
    /// Unique identifier for a review
    ReviewId
}

uuid_id! {
    /// Unique identifier for a user (owner, guest or review author)
    UserId
}

// ============================================================================
// Users and spaces
// ============================================================================

/// A user as far as this engine needs to know one.
///
/// Accounts are owned by the authentication collaborator; the engine only reads
/// them to put a guest's name on the owner's view of a booking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID
    pub id: UserId,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
}

impl User {
    /// Name shown to space owners, e.g. `"Demo Guest"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// A rentable space (a "spot" in the listing UI).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    /// Space ID
    pub id: SpaceId,
    /// The user who listed the space
    pub owner_id: UserId,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// State or region
    pub state: String,
    /// Country
    pub country: String,
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
    /// Listing title
    pub name: String,
    /// Listing description
    pub description: String,
    /// Nightly price in cents
    pub price_cents: u64,
}

impl Space {
    /// Returns `true` if `user_id` listed this space.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}

// ============================================================================
// Bookings
// ============================================================================

/// A confirmed reservation of a space for a date range.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Booking ID
    pub id: BookingId,
    /// The booked space
    pub space_id: SpaceId,
    /// The guest who made the booking
    pub guest_id: UserId,
    /// Booked dates (`startDate` / `endDate` on the wire)
    #[serde(flatten)]
    pub dates: DateRange,
    /// When the booking was created
    pub created_at: DateTime<Utc>,
    /// When the booking was last updated
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Creates a new booking stamped with `now`.
    #[must_use]
    pub fn new(space_id: SpaceId, guest_id: UserId, dates: DateRange, now: DateTime<Utc>) -> Self {
        Self {
            id: BookingId::new(),
            space_id,
            guest_id,
            dates,
            created_at: now,
            updated_at: now,
        }
    }

    /// First night of the stay.
    #[must_use]
    pub const fn start_date(&self) -> NaiveDate {
        self.dates.start()
    }

    /// Check-out day.
    #[must_use]
    pub const fn end_date(&self) -> NaiveDate {
        self.dates.end()
    }
}

// ============================================================================
// Reviews
// ============================================================================

/// Star rating attached to a review (1 to 5 inclusive).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Stars(u8);

/// Error returned when a star rating is outside `1..=5`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Stars must be an integer from 1 to 5, got {0}")]
pub struct InvalidStars(pub i64);

impl Stars {
    /// Lowest accepted rating.
    pub const MIN: u8 = 1;
    /// Highest accepted rating.
    pub const MAX: u8 = 5;

    /// Validates a raw rating.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStars`] if `value` is not in `1..=5`.
    pub fn new(value: i64) -> Result<Self, InvalidStars> {
        u8::try_from(value)
            .ok()
            .filter(|v| (Self::MIN..=Self::MAX).contains(v))
            .map(Self)
            .ok_or(InvalidStars(value))
    }

    /// The rating as a number.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Stars {
    type Error = InvalidStars;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Stars> for u8 {
    fn from(stars: Stars) -> Self {
        stars.0
    }
}

impl fmt::Display for Stars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A guest's review of a space.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Review ID
    pub id: ReviewId,
    /// The reviewed space
    pub space_id: SpaceId,
    /// The review author
    pub author_id: UserId,
    /// Star rating
    pub stars: Stars,
    /// Review text
    #[serde(rename = "review")]
    pub text: String,
    /// When the review was created
    pub created_at: DateTime<Utc>,
    /// When the review was last updated
    pub updated_at: DateTime<Utc>,
}

impl Review {
    /// Creates a new review stamped with `now`.
    #[must_use]
    pub fn new(
        space_id: SpaceId,
        author_id: UserId,
        stars: Stars,
        text: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ReviewId::new(),
            space_id,
            author_id,
            stars,
            text,
            created_at: now,
            updated_at: now,
        }
    }
}
