//! In-memory booking store.
//!
//! [`InMemoryBookingStore`] implements [`BookingStore`] over plain collections
//! behind one `RwLock`. It enforces the same two write-time constraints as the
//! Postgres schema (no overlapping bookings per space, one review per author
//! per space), so service tests exercise the real failure paths.
//!
//! Two switches let tests reach paths that are otherwise timing-dependent:
//!
//! - [`InMemoryBookingStore::set_stale_reads`]: reads return no bookings or
//!   reviews, as if another process inserted after this one read
//! - [`InMemoryBookingStore::set_unavailable`]: every call fails with
//!   `StoreError::Database`

use spacebook_core::error::StoreError;
use spacebook_core::store::{BookingStore, StoreFuture};
use spacebook_core::types::{Booking, Review, Space, SpaceId, User, UserId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    spaces: HashMap<SpaceId, Space>,
    bookings: Vec<Booking>,
    reviews: Vec<Review>,
}

/// In-memory [`BookingStore`] for fast, deterministic tests and local demos.
///
/// Cloning is cheap and clones share data.
///
/// # Example
///
/// ```
/// use spacebook_testing::InMemoryBookingStore;
/// use spacebook_testing::fixtures::{space_owned_by, user};
/// use spacebook_core::store::BookingStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryBookingStore::new();
/// let owner = user("Demo", "Owner");
/// let space = space_owned_by(owner.id);
/// store.insert_user(owner);
/// store.insert_space(space.clone());
///
/// assert_eq!(store.get_space(space.id).await?, Some(space));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryBookingStore {
    tables: Arc<RwLock<Tables>>,
    stale_reads: Arc<AtomicBool>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryBookingStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user.
    pub fn insert_user(&self, user: User) {
        if let Ok(mut tables) = self.tables.write() {
            tables.users.insert(user.id, user);
        }
    }

    /// Seed a space.
    pub fn insert_space(&self, space: Space) {
        if let Ok(mut tables) = self.tables.write() {
            tables.spaces.insert(space.id, space);
        }
    }

    /// Number of bookings across all spaces.
    #[must_use]
    pub fn booking_count(&self) -> usize {
        self.tables.read().map_or(0, |tables| tables.bookings.len())
    }

    /// Number of reviews across all spaces.
    #[must_use]
    pub fn review_count(&self) -> usize {
        self.tables.read().map_or(0, |tables| tables.reviews.len())
    }

    /// Make reads ignore stored bookings and reviews.
    ///
    /// Writes still see everything, so the write-time constraints fire.
    pub fn set_stale_reads(&self, stale: bool) {
        self.stale_reads.store(stale, Ordering::SeqCst);
    }

    /// Make every operation fail with a database error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.check_available()?;
        self.tables
            .read()
            .map_err(|_| StoreError::Database("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.check_available()?;
        self.tables
            .write()
            .map_err(|_| StoreError::Database("store lock poisoned".to_string()))
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Database("store unavailable".to_string()));
        }
        Ok(())
    }

    fn stale(&self) -> bool {
        self.stale_reads.load(Ordering::SeqCst)
    }
}

impl BookingStore for InMemoryBookingStore {
    fn get_space(&self, space_id: SpaceId) -> StoreFuture<'_, Option<Space>> {
        Box::pin(async move { Ok(self.read()?.spaces.get(&space_id).cloned()) })
    }

    fn list_bookings_by_space(&self, space_id: SpaceId) -> StoreFuture<'_, Vec<Booking>> {
        Box::pin(async move {
            let tables = self.read()?;
            if self.stale() {
                return Ok(Vec::new());
            }
            Ok(tables
                .bookings
                .iter()
                .filter(|b| b.space_id == space_id)
                .cloned()
                .collect())
        })
    }

    fn insert_booking(&self, booking: Booking) -> StoreFuture<'_, Booking> {
        Box::pin(async move {
            let mut tables = self.write()?;
            let clash = tables
                .bookings
                .iter()
                .find(|b| b.space_id == booking.space_id && b.dates.overlaps(&booking.dates));
            if let Some(existing) = clash {
                return Err(StoreError::Exclusion(format!(
                    "{} overlaps booking {} ({})",
                    booking.dates, existing.id, existing.dates
                )));
            }
            tables.bookings.push(booking.clone());
            Ok(booking)
        })
    }

    fn list_reviews_by_space(&self, space_id: SpaceId) -> StoreFuture<'_, Vec<Review>> {
        Box::pin(async move {
            let tables = self.read()?;
            if self.stale() {
                return Ok(Vec::new());
            }
            Ok(tables
                .reviews
                .iter()
                .filter(|r| r.space_id == space_id)
                .cloned()
                .collect())
        })
    }

    fn insert_review(&self, review: Review) -> StoreFuture<'_, Review> {
        Box::pin(async move {
            let mut tables = self.write()?;
            let duplicate = tables
                .reviews
                .iter()
                .any(|r| r.space_id == review.space_id && r.author_id == review.author_id);
            if duplicate {
                return Err(StoreError::Duplicate(format!(
                    "user {} already reviewed space {}",
                    review.author_id, review.space_id
                )));
            }
            tables.reviews.push(review.clone());
            Ok(review)
        })
    }

    fn has_review_by_author(&self, space_id: SpaceId, author_id: UserId) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            let tables = self.read()?;
            if self.stale() {
                return Ok(false);
            }
            Ok(tables
                .reviews
                .iter()
                .any(|r| r.space_id == space_id && r.author_id == author_id))
        })
    }

    fn get_user(&self, user_id: UserId) -> StoreFuture<'_, Option<User>> {
        Box::pin(async move { Ok(self.read()?.users.get(&user_id).cloned()) })
    }
}
