//! Row types and their conversion into domain types.

use chrono::{DateTime, NaiveDate, Utc};
use spacebook_core::date_range::DateRange;
use spacebook_core::error::StoreError;
use spacebook_core::types::{
    Booking, BookingId, Review, ReviewId, Space, SpaceId, Stars, User, UserId,
};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub(crate) struct UserRow {
    id: Uuid,
    first_name: String,
    last_name: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct SpaceRow {
    id: Uuid,
    owner_id: Uuid,
    address: String,
    city: String,
    state: String,
    country: String,
    lat: f64,
    lng: f64,
    name: String,
    description: String,
    price_cents: i64,
}

impl TryFrom<SpaceRow> for Space {
    type Error = StoreError;

    fn try_from(row: SpaceRow) -> Result<Self, Self::Error> {
        let price_cents = u64::try_from(row.price_cents).map_err(|_| {
            StoreError::Corrupt(format!("space {} has negative price {}", row.id, row.price_cents))
        })?;
        Ok(Self {
            id: SpaceId::from_uuid(row.id),
            owner_id: UserId::from_uuid(row.owner_id),
            address: row.address,
            city: row.city,
            state: row.state,
            country: row.country,
            lat: row.lat,
            lng: row.lng,
            name: row.name,
            description: row.description,
            price_cents,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct BookingRow {
    id: Uuid,
    space_id: Uuid,
    guest_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = StoreError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let dates = DateRange::new(row.start_date, row.end_date)
            .map_err(|e| StoreError::Corrupt(format!("booking {}: {e}", row.id)))?;
        Ok(Self {
            id: BookingId::from_uuid(row.id),
            space_id: SpaceId::from_uuid(row.space_id),
            guest_id: UserId::from_uuid(row.guest_id),
            dates,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ReviewRow {
    id: Uuid,
    space_id: Uuid,
    author_id: Uuid,
    stars: i16,
    review: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = StoreError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let stars = Stars::new(i64::from(row.stars))
            .map_err(|e| StoreError::Corrupt(format!("review {}: {e}", row.id)))?;
        Ok(Self {
            id: ReviewId::from_uuid(row.id),
            space_id: SpaceId::from_uuid(row.space_id),
            author_id: UserId::from_uuid(row.author_id),
            stars,
            text: row.review,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Converts every row, failing on the first that does not decode.
pub(crate) fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, StoreError>
where
    T: TryFrom<R, Error = StoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}
