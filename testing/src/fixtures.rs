//! Builders for test data.
//!
//! Every helper takes only what a test usually cares about and fills the rest
//! with plausible values. Date helpers accept `YYYY-MM-DD` literals and panic
//! on bad input, which is what a test wants.

#![allow(clippy::expect_used)]
#![allow(clippy::missing_panics_doc)]

use crate::mocks::test_clock;
use spacebook_core::date_range::DateRange;
use spacebook_core::environment::Clock;
use spacebook_core::types::{Booking, Review, Space, SpaceId, Stars, User, UserId};

/// A user with a fresh id.
#[must_use]
pub fn user(first_name: &str, last_name: &str) -> User {
    User {
        id: UserId::new(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
    }
}

/// A space listed by `owner_id`.
#[must_use]
pub fn space_owned_by(owner_id: UserId) -> Space {
    Space {
        id: SpaceId::new(),
        owner_id,
        address: "123 Disney Lane".to_string(),
        city: "San Francisco".to_string(),
        state: "California".to_string(),
        country: "United States of America".to_string(),
        lat: 37.764_358_5,
        lng: -122.473_030_5,
        name: "App Academy".to_string(),
        description: "Place where web developers are created".to_string(),
        price_cents: 12_300,
    }
}

/// A valid date range from two `YYYY-MM-DD` literals.
#[must_use]
pub fn dates(start: &str, end: &str) -> DateRange {
    DateRange::parse(start, end).expect("fixture dates should be a valid range")
}

/// A booking stamped with [`test_clock`].
#[must_use]
pub fn booking(space_id: SpaceId, guest_id: UserId, start: &str, end: &str) -> Booking {
    Booking::new(space_id, guest_id, dates(start, end), test_clock().now())
}

/// A review stamped with [`test_clock`].
#[must_use]
pub fn review(space_id: SpaceId, author_id: UserId, stars: i64) -> Review {
    Review::new(
        space_id,
        author_id,
        Stars::new(stars).expect("fixture stars should be within 1..=5"),
        "This was an awesome spot!".to_string(),
        test_clock().now(),
    )
}
