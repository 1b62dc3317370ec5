//! `PostgreSQL` booking store for Spacebook.
//!
//! This crate provides [`PostgresBookingStore`], a sqlx-backed implementation
//! of the `BookingStore` trait from `spacebook-core`. It supports:
//!
//! - Connection pooling
//! - Bundled migrations (`migrations/`)
//! - Storage-level enforcement of both booking invariants, so concurrent
//!   writers in different processes cannot double-book a space or review it
//!   twice
//!
//! # Example
//!
//! ```no_run
//! use spacebook_postgres::{PoolSettings, PostgresBookingStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = PostgresBookingStore::connect(
//!     "postgres://localhost/spacebook",
//!     &PoolSettings::default(),
//! )
//! .await?;
//! store.migrate().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod rows;
mod store;

pub use store::{PoolSettings, PostgresBookingStore};
