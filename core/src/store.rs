//! Storage abstraction for spaces, bookings and reviews.
//!
//! The engine never talks to a database directly. It reads and writes through
//! [`BookingStore`], which is deliberately minimal: exactly the lookups and
//! inserts the booking and review flows need.
//!
//! # Implementations
//!
//! - `PostgresBookingStore` (in `spacebook-postgres`): production storage
//! - `InMemoryBookingStore` (in `spacebook-testing`): fast, deterministic tests
//!
//! # Invariants at the storage level
//!
//! Implementations must reject, atomically with the write:
//!
//! - a booking whose range overlaps another booking of the same space, with
//!   [`StoreError::Exclusion`]
//! - a second review by the same author for the same space, with
//!   [`StoreError::Duplicate`]
//!
//! The service already checks both rules before writing while holding a
//! per-space lock; the store-level check is what keeps them true across
//! processes sharing one database.
//!
//! # Example
//!
//! ```no_run
//! use spacebook_core::store::BookingStore;
//! use spacebook_core::types::SpaceId;
//! use spacebook_core::error::StoreError;
//!
//! async fn example(store: &dyn BookingStore, space_id: SpaceId) -> Result<(), StoreError> {
//!     if let Some(space) = store.get_space(space_id).await? {
//!         let bookings = store.list_bookings_by_space(space.id).await?;
//!         println!("{} bookings", bookings.len());
//!     }
//!     Ok(())
//! }
//! ```

use crate::error::StoreError;
use crate::types::{Booking, Review, Space, SpaceId, User, UserId};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Repository of spaces, bookings and reviews.
///
/// # Dyn Compatibility
///
/// Methods return boxed futures instead of using `async fn` so the service can
/// hold an `Arc<dyn BookingStore>` and switch backends from configuration.
pub trait BookingStore: Send + Sync {
    /// Look up a space.
    ///
    /// Returns `None` if no such space exists.
    ///
    /// # Errors
    ///
    /// `Database` if the query fails.
    fn get_space(&self, space_id: SpaceId) -> StoreFuture<'_, Option<Space>>;

    /// Load every booking of a space.
    ///
    /// Must return the complete current set (no pagination), in any order.
    ///
    /// # Errors
    ///
    /// `Database` if the query fails.
    fn list_bookings_by_space(&self, space_id: SpaceId) -> StoreFuture<'_, Vec<Booking>>;

    /// Persist a new booking.
    ///
    /// # Errors
    ///
    /// - `Exclusion` if it overlaps an existing booking of the same space
    /// - `Database` if the write fails
    fn insert_booking(&self, booking: Booking) -> StoreFuture<'_, Booking>;

    /// Load every review of a space.
    ///
    /// # Errors
    ///
    /// `Database` if the query fails.
    fn list_reviews_by_space(&self, space_id: SpaceId) -> StoreFuture<'_, Vec<Review>>;

    /// Persist a new review.
    ///
    /// # Errors
    ///
    /// - `Duplicate` if the author already reviewed the space
    /// - `Database` if the write fails
    fn insert_review(&self, review: Review) -> StoreFuture<'_, Review>;

    /// Returns `true` if `author_id` has already reviewed `space_id`.
    ///
    /// # Errors
    ///
    /// `Database` if the query fails.
    fn has_review_by_author(&self, space_id: SpaceId, author_id: UserId) -> StoreFuture<'_, bool>;

    /// Look up a user's public profile.
    ///
    /// Returns `None` for unknown users.
    ///
    /// # Errors
    ///
    /// `Database` if the query fails.
    fn get_user(&self, user_id: UserId) -> StoreFuture<'_, Option<User>>;
}
