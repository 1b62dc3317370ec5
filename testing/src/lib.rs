//! # Spacebook Testing
//!
//! Testing utilities and helpers for the Spacebook booking engine.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - [`InMemoryBookingStore`], a constraint-enforcing store without a database
//! - Fixture builders for users, spaces, bookings and reviews
//! - Property-based testing strategies
//!
//! ## Example
//!
//! ```ignore
//! use spacebook_testing::{InMemoryBookingStore, test_clock};
//! use spacebook_runtime::{BookingEnvironment, BookingService};
//!
//! #[tokio::test]
//! async fn owner_cannot_book() {
//!     let store = InMemoryBookingStore::new();
//!     let service = BookingService::new(BookingEnvironment::new(
//!         Arc::new(test_clock()),
//!         Arc::new(store.clone()),
//!     ));
//!     // seed, then call service.create_booking(...)
//! }
//! ```

use chrono::{DateTime, Utc};
use spacebook_core::environment::Clock;

pub mod fixtures;
pub mod store;

/// Mock implementations of Environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use spacebook_testing::mocks::FixedClock;
    /// use spacebook_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded timestamp fails to parse.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Test helpers and utilities.
pub mod helpers {
    /// Install a `tracing` subscriber that writes through the test harness.
    ///
    /// Safe to call from every test; only the first call installs anything.
    /// Honors `RUST_LOG`.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;
    use spacebook_core::date_range::DateRange;
    use spacebook_core::types::Stars;

    /// Day zero for generated ranges (2025-01-01).
    #[must_use]
    pub fn epoch() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default()
    }

    /// Valid date ranges starting within `days` of [`epoch`], 1 to 30 nights long.
    pub fn date_range_within(days: i64) -> impl Strategy<Value = DateRange> {
        (0..days, 1..=30i64).prop_filter_map("range should be valid", |(offset, nights)| {
            let start = epoch() + Duration::days(offset);
            DateRange::new(start, start + Duration::days(nights)).ok()
        })
    }

    /// Valid date ranges within the first year after [`epoch`].
    pub fn date_range() -> impl Strategy<Value = DateRange> {
        date_range_within(365)
    }

    /// Any accepted star rating.
    pub fn stars() -> impl Strategy<Value = Stars> {
        (i64::from(Stars::MIN)..=i64::from(Stars::MAX))
            .prop_filter_map("stars should be valid", |s| Stars::new(s).ok())
    }

    /// Raw star values the engine must reject.
    pub fn invalid_stars() -> impl Strategy<Value = i64> {
        prop_oneof![i64::MIN..i64::from(Stars::MIN), (i64::from(Stars::MAX) + 1)..i64::MAX]
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
pub use store::InMemoryBookingStore;
