//! The booking service.
//!
//! [`BookingService`] is the entry point the transport layer calls. Each
//! operation validates its request, consults the store and returns either the
//! result or exactly one [`BookingError`].
//!
//! # Write path
//!
//! ```text
//! create_booking
//!   ├─ space exists?            no  → NotFound
//!   ├─ caller owns it?          yes → Forbidden
//!   ├─ dates parse, start<end?  no  → Validation
//!   ├─ lock space
//!   │   ├─ scan all bookings    hit → Conflict
//!   │   └─ insert               store says overlap → Conflict
//!   └─ unlock
//! ```
//!
//! Reviews follow the same shape with the duplicate check in place of the
//! overlap scan.

use crate::locks::SpaceLocks;
use crate::metrics::{BookingMetrics, Outcome, ReviewMetrics, StoreMetrics};
use serde::{Deserialize, Serialize};
use spacebook_core::conflict::{BookingConflict, check_availability};
use spacebook_core::date_range::DateRange;
use spacebook_core::environment::Clock;
use spacebook_core::error::{BookingError, ConflictKind, FieldErrors, Resource, Result, StoreError};
use spacebook_core::projection::{BookingView, project};
use spacebook_core::rating::{AverageRating, RatingSummary, summarize};
use spacebook_core::store::BookingStore;
use spacebook_core::types::{Booking, Review, Space, SpaceId, Stars, User, UserId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Message returned when the review text is missing.
pub const REVIEW_TEXT_REQUIRED: &str = "Review Text is required";

/// Dependencies injected into the service.
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Source of audit timestamps
    pub clock: Arc<dyn Clock>,
    /// Persistence
    pub store: Arc<dyn BookingStore>,
}

impl BookingEnvironment {
    /// Bundle a clock and a store.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, store: Arc<dyn BookingStore>) -> Self {
        Self { clock, store }
    }
}

/// A space together with its current rating.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceDetails {
    /// The space
    #[serde(flatten)]
    pub space: Space,
    /// Number of reviews
    pub num_reviews: u32,
    /// Mean star rating, `null` when unrated
    pub avg_star_rating: AverageRating,
}

impl SpaceDetails {
    fn new(space: Space, rating: RatingSummary) -> Self {
        Self {
            space,
            num_reviews: rating.count,
            avg_star_rating: rating.average,
        }
    }
}

/// Booking and review operations over an injected store.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct BookingService {
    env: BookingEnvironment,
    locks: SpaceLocks,
}

impl BookingService {
    /// Create a service over `env`.
    #[must_use]
    pub fn new(env: BookingEnvironment) -> Self {
        Self {
            env,
            locks: SpaceLocks::new(),
        }
    }

    /// The injected environment.
    #[must_use]
    pub const fn environment(&self) -> &BookingEnvironment {
        &self.env
    }

    /// Reserve a space for `guest_id` from `start_date` (first night) to
    /// `end_date` (check-out day), both `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the space does not exist
    /// - `Forbidden` if the guest owns the space
    /// - `Validation` if a date is malformed or `start_date >= end_date`
    /// - `Conflict` if the range overlaps an existing booking of the space
    /// - `Storage` if the store fails
    #[tracing::instrument(skip(self), fields(booking_id = tracing::field::Empty))]
    pub async fn create_booking(
        &self,
        space_id: SpaceId,
        guest_id: UserId,
        start_date: &str,
        end_date: &str,
    ) -> Result<Booking> {
        let result = self
            .try_create_booking(space_id, guest_id, start_date, end_date)
            .await;

        let outcome = outcome_of(&result);
        BookingMetrics::record_outcome(outcome);
        match &result {
            Ok(booking) => {
                BookingMetrics::record_nights(booking.dates.nights());
                tracing::Span::current().record("booking_id", tracing::field::display(booking.id));
                tracing::info!(dates = %booking.dates, "Booking created");
            }
            Err(err) => log_rejection("booking", outcome, err),
        }
        result
    }

    async fn try_create_booking(
        &self,
        space_id: SpaceId,
        guest_id: UserId,
        start_date: &str,
        end_date: &str,
    ) -> Result<Booking> {
        let space = self.require_space(space_id).await?;
        if space.is_owned_by(guest_id) {
            return Err(BookingError::Forbidden {
                reason: "Owners cannot book their own space".to_string(),
            });
        }
        let dates = DateRange::parse(start_date, end_date)?;

        let _guard = self.lock_space(space_id).await;

        let existing = self
            .env
            .store
            .list_bookings_by_space(space_id)
            .await
            .map_err(|e| store_failure("list_bookings_by_space", e))?;
        check_availability(&dates, &existing)?;

        let booking = Booking::new(space_id, guest_id, dates, self.env.clock.now());
        self.env
            .store
            .insert_booking(booking)
            .await
            .map_err(|e| match e {
                StoreError::Exclusion(detail) => {
                    tracing::debug!(%detail, "Store rejected overlapping booking");
                    BookingError::from(BookingConflict::detected_by_store())
                }
                other => store_failure("insert_booking", other),
            })
    }

    /// Every booking of a space, projected for `caller`.
    ///
    /// The space owner gets full detail including the guest's name; anyone
    /// else sees only the blocked dates.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the space does not exist or has no bookings
    /// - `Storage` if the store fails
    #[tracing::instrument(skip(self))]
    pub async fn list_bookings_for_space(
        &self,
        space_id: SpaceId,
        caller: UserId,
    ) -> Result<Vec<BookingView>> {
        let space = self.require_space(space_id).await?;
        let bookings = self
            .env
            .store
            .list_bookings_by_space(space_id)
            .await
            .map_err(|e| store_failure("list_bookings_by_space", e))?;

        if bookings.is_empty() {
            tracing::debug!("Space has no bookings");
            return Err(BookingError::NotFound {
                resource: Resource::Bookings(space_id),
            });
        }

        let guests = if space.is_owned_by(caller) {
            self.load_guests(&bookings).await?
        } else {
            HashMap::new()
        };

        Ok(bookings
            .iter()
            .map(|booking| {
                project(booking, guests.get(&booking.guest_id), caller, space.owner_id)
            })
            .collect())
    }

    async fn load_guests(&self, bookings: &[Booking]) -> Result<HashMap<UserId, User>> {
        let mut guests = HashMap::new();
        for booking in bookings {
            if guests.contains_key(&booking.guest_id) {
                continue;
            }
            let user = self
                .env
                .store
                .get_user(booking.guest_id)
                .await
                .map_err(|e| store_failure("get_user", e))?;
            match user {
                Some(user) => {
                    guests.insert(user.id, user);
                }
                None => tracing::warn!(guest_id = %booking.guest_id, "Booking guest not found"),
            }
        }
        Ok(guests)
    }

    /// Leave a review of a space.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the space does not exist
    /// - `Validation` if `stars` is not in `1..=5` or `text` is blank
    /// - `Conflict` if `author_id` already reviewed the space
    /// - `Storage` if the store fails
    #[tracing::instrument(skip(self, text), fields(review_id = tracing::field::Empty))]
    pub async fn create_review(
        &self,
        space_id: SpaceId,
        author_id: UserId,
        stars: i64,
        text: &str,
    ) -> Result<Review> {
        let result = self.try_create_review(space_id, author_id, stars, text).await;

        let outcome = outcome_of(&result);
        ReviewMetrics::record_outcome(outcome);
        match &result {
            Ok(review) => {
                tracing::Span::current().record("review_id", tracing::field::display(review.id));
                tracing::info!(stars = %review.stars, "Review created");
            }
            Err(err) => log_rejection("review", outcome, err),
        }
        result
    }

    async fn try_create_review(
        &self,
        space_id: SpaceId,
        author_id: UserId,
        stars: i64,
        text: &str,
    ) -> Result<Review> {
        self.require_space(space_id).await?;
        let (stars, text) = validate_review(stars, text)?;

        let _guard = self.lock_space(space_id).await;

        let already_reviewed = self
            .env
            .store
            .has_review_by_author(space_id, author_id)
            .await
            .map_err(|e| store_failure("has_review_by_author", e))?;
        if already_reviewed {
            return Err(BookingError::Conflict(ConflictKind::DuplicateReview));
        }

        let review = Review::new(space_id, author_id, stars, text, self.env.clock.now());
        self.env
            .store
            .insert_review(review)
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => BookingError::Conflict(ConflictKind::DuplicateReview),
                other => store_failure("insert_review", other),
            })
    }

    /// Every review of a space. An empty list is a valid answer.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the space does not exist
    /// - `Storage` if the store fails
    #[tracing::instrument(skip(self))]
    pub async fn list_reviews_for_space(&self, space_id: SpaceId) -> Result<Vec<Review>> {
        self.require_space(space_id).await?;
        self.reviews_of(space_id).await
    }

    /// Review count and mean rating of a space, computed from the reviews
    /// stored right now.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the space does not exist
    /// - `Storage` if the store fails
    #[tracing::instrument(skip(self))]
    pub async fn rating_for_space(&self, space_id: SpaceId) -> Result<RatingSummary> {
        self.require_space(space_id).await?;
        Ok(summarize(&self.reviews_of(space_id).await?))
    }

    /// A space with its review count and mean rating.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the space does not exist
    /// - `Storage` if the store fails
    #[tracing::instrument(skip(self))]
    pub async fn space_details(&self, space_id: SpaceId) -> Result<SpaceDetails> {
        let space = self.require_space(space_id).await?;
        let rating = summarize(&self.reviews_of(space_id).await?);
        Ok(SpaceDetails::new(space, rating))
    }

    async fn require_space(&self, space_id: SpaceId) -> Result<Space> {
        self.env
            .store
            .get_space(space_id)
            .await
            .map_err(|e| store_failure("get_space", e))?
            .ok_or_else(|| BookingError::space_not_found(space_id))
    }

    async fn reviews_of(&self, space_id: SpaceId) -> Result<Vec<Review>> {
        self.env
            .store
            .list_reviews_by_space(space_id)
            .await
            .map_err(|e| store_failure("list_reviews_by_space", e))
    }

    async fn lock_space(&self, space_id: SpaceId) -> crate::locks::SpaceGuard {
        let started = Instant::now();
        let guard = self.locks.lock(space_id).await;
        BookingMetrics::record_lock_wait(started.elapsed());
        guard
    }
}

/// Checks both review fields and reports every problem at once.
fn validate_review(stars: i64, text: &str) -> Result<(Stars, String)> {
    let mut errors = FieldErrors::new();

    let stars = match Stars::new(stars) {
        Ok(stars) => Some(stars),
        Err(e) => {
            errors.insert("stars".to_string(), e.to_string());
            None
        }
    };
    let text = text.trim();
    if text.is_empty() {
        errors.insert("review".to_string(), REVIEW_TEXT_REQUIRED.to_string());
    }

    match stars {
        Some(stars) if errors.is_empty() => Ok((stars, text.to_string())),
        _ => Err(BookingError::Validation { errors }),
    }
}

fn store_failure(operation: &'static str, error: StoreError) -> BookingError {
    StoreMetrics::record_error(operation);
    tracing::error!(operation, error = %error, "Store operation failed");
    BookingError::Storage(error)
}

fn outcome_of<T>(result: &Result<T>) -> Outcome {
    match result {
        Ok(_) => Outcome::Created,
        Err(BookingError::Conflict(_)) => Outcome::Conflict,
        Err(BookingError::Storage(_)) => Outcome::Error,
        Err(_) => Outcome::Rejected,
    }
}

fn log_rejection(kind: &'static str, outcome: Outcome, error: &BookingError) {
    // Storage failures were already logged at error level where they occurred.
    if outcome != Outcome::Error {
        tracing::warn!(kind, outcome = outcome.as_str(), error = %error, "Request rejected");
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn review_validation_reports_both_fields() {
        let Err(BookingError::Validation { errors }) = validate_review(0, "   ") else {
            panic!("expected a validation error");
        };
        assert!(errors.contains_key("stars"));
        assert_eq!(errors.get("review").map(String::as_str), Some(REVIEW_TEXT_REQUIRED));
    }

    #[test]
    fn review_text_is_trimmed() {
        let (stars, text) = validate_review(4, "  Great stay \n").unwrap();
        assert_eq!(stars.get(), 4);
        assert_eq!(text, "Great stay");
    }

    #[test]
    fn outcomes_follow_error_kind() {
        assert_eq!(outcome_of(&Ok(())), Outcome::Created);
        assert_eq!(
            outcome_of::<()>(&Err(BookingError::Conflict(ConflictKind::DuplicateReview))),
            Outcome::Conflict
        );
        assert_eq!(
            outcome_of::<()>(&Err(BookingError::invalid("stars", "bad"))),
            Outcome::Rejected
        );
        assert_eq!(
            outcome_of::<()>(&Err(BookingError::Storage(StoreError::Database("x".into())))),
            Outcome::Error
        );
    }
}
