//! # Spacebook Core
//!
//! Core types and rules for the Spacebook booking engine.
//!
//! Owners list spaces, guests book them for date ranges, and anyone who stayed
//! can leave a review. This crate holds everything about that domain that can
//! be decided without I/O:
//!
//! - **Date ranges**: half-open `[start, end)` calendar ranges and the overlap rule
//! - **Conflict checking**: scanning a space's bookings for a collision
//! - **Projection**: role-aware views of bookings (owner vs everyone else)
//! - **Rating**: review count and mean, with an explicit "unrated" sentinel
//! - **Errors**: the `NotFound` / `Forbidden` / `Validation` / `Conflict` /
//!   `Storage` taxonomy
//! - **Store**: the repository trait the service reads and writes through
//! - **Environment**: injected dependencies such as the clock
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell: pure rules here, orchestration in
//!   `spacebook-runtime`
//! - Dependency Injection via traits (`BookingStore`, `Clock`)
//! - Invariants enforced twice: by the service under a per-space lock, and by
//!   the store atomically with each write
//!
//! ## Example
//!
//! ```
//! use spacebook_core::conflict::find_conflict;
//! use spacebook_core::date_range::DateRange;
//! use spacebook_core::types::{Booking, SpaceId, UserId};
//! use chrono::Utc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let space = SpaceId::new();
//! let existing = vec![Booking::new(
//!     space,
//!     UserId::new(),
//!     DateRange::parse("2025-12-10", "2025-12-15")?,
//!     Utc::now(),
//! )];
//!
//! // Overlapping stay is rejected
//! let proposed = DateRange::parse("2025-12-12", "2025-12-20")?;
//! assert!(find_conflict(&proposed, &existing).is_some());
//!
//! // Check-in on the previous guest's check-out day is fine
//! let proposed = DateRange::parse("2025-12-15", "2025-12-18")?;
//! assert!(find_conflict(&proposed, &existing).is_none());
//! # Ok(())
//! # }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, NaiveDate, Utc};
pub use serde::{Deserialize, Serialize};

pub mod conflict;
pub mod date_range;
pub mod error;
pub mod projection;
pub mod rating;
pub mod store;
pub mod types;

pub use conflict::{BookingConflict, check_availability, find_conflict};
pub use date_range::{DateField, DateRange, RangeError};
pub use error::{BookingError, ConflictKind, Resource, StoreError};
pub use projection::{BookingView, GuestView, OwnerView, project};
pub use rating::{AverageRating, RatingSummary, summarize};
pub use store::{BookingStore, StoreFuture};
pub use types::{Booking, BookingId, Review, ReviewId, Space, SpaceId, Stars, User, UserId};

/// Environment module - Dependency injection traits
///
/// All external dependencies of the engine are abstracted behind traits and
/// injected, so tests can pin them down.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Production - uses system clock
    /// struct SystemClock;
    /// impl Clock for SystemClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         Utc::now()
    ///     }
    /// }
    ///
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall-clock time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
