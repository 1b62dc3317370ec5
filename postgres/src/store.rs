//! `PostgreSQL` implementation of [`BookingStore`].

use crate::rows::{BookingRow, ReviewRow, SpaceRow, UserRow, convert_all};
use spacebook_core::error::StoreError;
use spacebook_core::store::{BookingStore, StoreFuture};
use spacebook_core::types::{Booking, Review, Space, SpaceId, User, UserId};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

/// SQLSTATE `exclusion_violation`.
const EXCLUSION_VIOLATION: &str = "23P01";
/// SQLSTATE `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Connection pool settings.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of idle connections in the pool
    pub min_connections: u32,
    /// How long to wait for a connection
    pub acquire_timeout: Duration,
    /// Connections idle longer than this are closed
    pub idle_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }
}

/// `PostgreSQL`-backed booking store.
///
/// Overlapping bookings are rejected by the `bookings_no_overlap` exclusion
/// constraint and duplicate reviews by the `reviews_one_per_author` unique
/// constraint; both surface as the matching [`StoreError`] kind.
#[derive(Clone, Debug)]
pub struct PostgresBookingStore {
    pool: PgPool,
}

impl PostgresBookingStore {
    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` with the given pool settings.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the connection cannot be established.
    pub async fn connect(database_url: &str, settings: &PoolSettings) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(settings.acquire_timeout)
            .idle_timeout(settings.idle_timeout)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to connect: {e}")))?;
        Ok(Self::from_pool(pool))
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations.
    ///
    /// # Errors
    ///
    /// Returns error if migrations fail.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Migration failed: {e}")))?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    /// Insert or refresh a user profile.
    ///
    /// Users are owned by the account system; this exists for seeding.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the write fails.
    pub async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO users (id, first_name, last_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE
                SET first_name = EXCLUDED.first_name,
                    last_name = EXCLUDED.last_name
            ",
        )
        .bind(user.id.as_uuid())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(format!("Failed to insert user: {e}")))?;
        Ok(())
    }

    /// Insert or refresh a space listing.
    ///
    /// Listings are managed elsewhere; this exists for seeding.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the write fails (e.g. unknown owner).
    pub async fn insert_space(&self, space: &Space) -> Result<(), StoreError> {
        let price_cents = i64::try_from(space.price_cents)
            .map_err(|_| StoreError::Database(format!("price out of range: {}", space.price_cents)))?;

        sqlx::query(
            r"
            INSERT INTO spaces (
                id, owner_id, address, city, state, country,
                lat, lng, name, description, price_cents
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id) DO UPDATE
                SET address = EXCLUDED.address,
                    city = EXCLUDED.city,
                    state = EXCLUDED.state,
                    country = EXCLUDED.country,
                    lat = EXCLUDED.lat,
                    lng = EXCLUDED.lng,
                    name = EXCLUDED.name,
                    description = EXCLUDED.description,
                    price_cents = EXCLUDED.price_cents
            ",
        )
        .bind(space.id.as_uuid())
        .bind(space.owner_id.as_uuid())
        .bind(&space.address)
        .bind(&space.city)
        .bind(&space.state)
        .bind(&space.country)
        .bind(space.lat)
        .bind(space.lng)
        .bind(&space.name)
        .bind(&space.description)
        .bind(price_cents)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(format!("Failed to insert space: {e}")))?;
        Ok(())
    }
}

impl BookingStore for PostgresBookingStore {
    fn get_space(&self, space_id: SpaceId) -> StoreFuture<'_, Option<Space>> {
        Box::pin(async move {
            let row: Option<SpaceRow> = sqlx::query_as(
                r"
                SELECT id, owner_id, address, city, state, country,
                       lat, lng, name, description, price_cents
                FROM spaces
                WHERE id = $1
                ",
            )
            .bind(space_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to get space: {e}")))?;

            row.map(Space::try_from).transpose()
        })
    }

    fn list_bookings_by_space(&self, space_id: SpaceId) -> StoreFuture<'_, Vec<Booking>> {
        Box::pin(async move {
            let rows: Vec<BookingRow> = sqlx::query_as(
                r"
                SELECT id, space_id, guest_id, start_date, end_date, created_at, updated_at
                FROM bookings
                WHERE space_id = $1
                ORDER BY start_date
                ",
            )
            .bind(space_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to list bookings: {e}")))?;

            convert_all(rows)
        })
    }

    fn insert_booking(&self, booking: Booking) -> StoreFuture<'_, Booking> {
        Box::pin(async move {
            sqlx::query(
                r"
                INSERT INTO bookings (
                    id, space_id, guest_id, start_date, end_date, created_at, updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7)
                ",
            )
            .bind(booking.id.as_uuid())
            .bind(booking.space_id.as_uuid())
            .bind(booking.guest_id.as_uuid())
            .bind(booking.start_date())
            .bind(booking.end_date())
            .bind(booking.created_at)
            .bind(booking.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| classify("insert_booking", e))?;

            Ok(booking)
        })
    }

    fn list_reviews_by_space(&self, space_id: SpaceId) -> StoreFuture<'_, Vec<Review>> {
        Box::pin(async move {
            let rows: Vec<ReviewRow> = sqlx::query_as(
                r"
                SELECT id, space_id, author_id, stars, review, created_at, updated_at
                FROM reviews
                WHERE space_id = $1
                ORDER BY created_at
                ",
            )
            .bind(space_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to list reviews: {e}")))?;

            convert_all(rows)
        })
    }

    fn insert_review(&self, review: Review) -> StoreFuture<'_, Review> {
        Box::pin(async move {
            sqlx::query(
                r"
                INSERT INTO reviews (
                    id, space_id, author_id, stars, review, created_at, updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7)
                ",
            )
            .bind(review.id.as_uuid())
            .bind(review.space_id.as_uuid())
            .bind(review.author_id.as_uuid())
            .bind(i16::from(review.stars.get()))
            .bind(&review.text)
            .bind(review.created_at)
            .bind(review.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| classify("insert_review", e))?;

            Ok(review)
        })
    }

    fn has_review_by_author(&self, space_id: SpaceId, author_id: UserId) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            let (exists,): (bool,) = sqlx::query_as(
                r"
                SELECT EXISTS (
                    SELECT 1 FROM reviews WHERE space_id = $1 AND author_id = $2
                )
                ",
            )
            .bind(space_id.as_uuid())
            .bind(author_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to check reviews: {e}")))?;

            Ok(exists)
        })
    }

    fn get_user(&self, user_id: UserId) -> StoreFuture<'_, Option<User>> {
        Box::pin(async move {
            let row: Option<UserRow> =
                sqlx::query_as("SELECT id, first_name, last_name FROM users WHERE id = $1")
                    .bind(user_id.as_uuid())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| StoreError::Database(format!("Failed to get user: {e}")))?;

            Ok(row.map(User::from))
        })
    }
}

/// Maps constraint violations to their [`StoreError`] kinds.
fn classify(operation: &'static str, error: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &error {
        let detail = db.message().to_string();
        match db.code().as_deref() {
            Some(EXCLUSION_VIOLATION) => {
                metrics::counter!("spacebook_postgres_constraint_violations_total", "constraint" => "exclusion")
                    .increment(1);
                tracing::debug!(operation, constraint = db.constraint(), "Exclusion violation");
                return StoreError::Exclusion(detail);
            }
            Some(UNIQUE_VIOLATION) if db.constraint() == Some("reviews_one_per_author") => {
                metrics::counter!("spacebook_postgres_constraint_violations_total", "constraint" => "unique")
                    .increment(1);
                tracing::debug!(operation, "Unique violation");
                return StoreError::Duplicate(detail);
            }
            _ => {}
        }
    }
    StoreError::Database(format!("{operation} failed: {error}"))
}
