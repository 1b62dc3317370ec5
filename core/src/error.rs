//! Error types for the booking engine.
//!
//! Every rule the engine enforces surfaces as one [`BookingError`] kind. The
//! transport layer maps kinds to status codes and messages, but the decision of
//! which kind applies is made here.

use crate::conflict::BookingConflict;
use crate::date_range::RangeError;
use crate::types::{InvalidStars, SpaceId};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, BookingError>;

/// Errors raised by a [`crate::store::BookingStore`].
///
/// The engine treats these as opaque, except for the two constraint kinds that
/// back its own invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// An insert would make two bookings of one space overlap.
    #[error("Booking overlaps an existing booking: {0}")]
    Exclusion(String),

    /// An insert would give an author a second review of one space.
    #[error("Duplicate review: {0}")]
    Duplicate(String),

    /// Database connection or query failed.
    #[error("Database error: {0}")]
    Database(String),

    /// A stored row could not be decoded.
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Resource a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// The space itself
    Space(SpaceId),
    /// Any booking of the space
    Bookings(SpaceId),
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Space(id) => write!(f, "Space couldn't be found: {id}"),
            Self::Bookings(id) => write!(f, "No bookings found for space {id}"),
        }
    }
}

/// What kind of invariant a request would violate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictKind {
    /// The dates overlap an existing booking of the space.
    Booking(BookingConflict),
    /// The author has already reviewed the space.
    DuplicateReview,
}

/// Field name to user-facing message, like a form's error object.
pub type FieldErrors = BTreeMap<String, String>;

/// Engine error taxonomy.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BookingError {
    /// The referenced space (or its bookings) does not exist.
    #[error("{resource}")]
    NotFound {
        /// What was missing
        resource: Resource,
    },

    /// The caller may not perform this action.
    #[error("Forbidden: {reason}")]
    Forbidden {
        /// Why the action was refused
        reason: String,
    },

    /// The request is malformed.
    #[error("Validation failed: {}", summarize_fields(.errors))]
    Validation {
        /// Per-field messages
        errors: FieldErrors,
    },

    /// The request violates an invariant of the current state.
    #[error("{}", describe_conflict(.0))]
    Conflict(ConflictKind),

    /// The store failed for reasons the engine does not interpret.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl BookingError {
    /// Space not found.
    #[must_use]
    pub const fn space_not_found(space_id: SpaceId) -> Self {
        Self::NotFound {
            resource: Resource::Space(space_id),
        }
    }

    /// Validation failure on a single field.
    #[must_use]
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.into(), message.into());
        Self::Validation { errors }
    }

    /// Returns `true` if the caller can fix this by changing the request.
    ///
    /// # Examples
    ///
    /// ```
    /// # use spacebook_core::error::{BookingError, StoreError};
    /// assert!(BookingError::invalid("stars", "out of range").is_user_error());
    /// assert!(!BookingError::Storage(StoreError::Database("down".into())).is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }

    /// HTTP status the transport layer should answer with.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Forbidden { .. } => 403,
            Self::Validation { .. } => 400,
            Self::Conflict(_) => 409,
            Self::Storage(_) => 500,
        }
    }

    /// Per-field messages for form display, if this error has any.
    #[must_use]
    pub fn field_errors(&self) -> FieldErrors {
        match self {
            Self::Validation { errors } => errors.clone(),
            Self::Conflict(ConflictKind::Booking(conflict)) => conflict
                .fields
                .iter()
                .map(|field| {
                    (
                        field.as_str().to_string(),
                        BookingConflict::message_for(*field).to_string(),
                    )
                })
                .collect(),
            _ => FieldErrors::new(),
        }
    }
}

impl From<RangeError> for BookingError {
    fn from(error: RangeError) -> Self {
        Self::invalid(error.field().as_str(), error.to_string())
    }
}

impl From<InvalidStars> for BookingError {
    fn from(error: InvalidStars) -> Self {
        Self::invalid("stars", error.to_string())
    }
}

impl From<BookingConflict> for BookingError {
    fn from(conflict: BookingConflict) -> Self {
        Self::Conflict(ConflictKind::Booking(conflict))
    }
}

fn summarize_fields(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

fn describe_conflict(kind: &ConflictKind) -> String {
    match kind {
        ConflictKind::Booking(_) => {
            "Sorry, this spot is already booked for the specified dates".to_string()
        }
        ConflictKind::DuplicateReview => "User already has a review for this spot".to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::date_range::{DateField, DateRange};

    #[test]
    fn range_errors_become_field_validation() {
        let err: BookingError = DateRange::parse("2025-12-15", "2025-12-10")
            .map(|_| ())
            .map_err(BookingError::from)
            .unwrap_err();

        assert_eq!(err.status_code(), 400);
        assert!(err.field_errors().contains_key("endDate"));
    }

    #[test]
    fn booking_conflict_lists_both_fields() {
        let err = BookingError::from(BookingConflict::detected_by_store());
        let fields = err.field_errors();

        assert_eq!(err.status_code(), 409);
        assert_eq!(
            fields.get(DateField::StartDate.as_str()).map(String::as_str),
            Some("Start date conflicts with an existing booking")
        );
        assert_eq!(
            fields.get(DateField::EndDate.as_str()).map(String::as_str),
            Some("End date conflicts with an existing booking")
        );
        assert!(err.to_string().contains("already booked"));
    }

    #[test]
    fn storage_errors_are_not_user_errors() {
        let err = BookingError::from(StoreError::Database("connection refused".to_string()));
        assert!(!err.is_user_error());
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn not_found_message_names_space() {
        let id = SpaceId::new();
        let err = BookingError::space_not_found(id);
        assert_eq!(err.status_code(), 404);
        assert!(err.to_string().contains(&id.to_string()));
    }
}
