//! # Spacebook Runtime
//!
//! The imperative shell around `spacebook-core`: the [`BookingService`] that
//! orchestrates store reads, rule checks and writes, plus the process-level
//! pieces a deployment needs.
//!
//! - [`service`]: booking and review operations
//! - [`locks`]: per-space mutual exclusion for check-then-insert
//! - [`config`]: environment-driven configuration
//! - [`metrics`]: Prometheus counters and histograms
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use spacebook_runtime::{BookingEnvironment, BookingService};
//! use spacebook_testing::fixtures::{space_owned_by, user};
//! use spacebook_testing::{InMemoryBookingStore, test_clock};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryBookingStore::new();
//! let owner = user("Demo", "Owner");
//! let space = space_owned_by(owner.id);
//! store.insert_space(space.clone());
//!
//! let service = BookingService::new(BookingEnvironment::new(
//!     Arc::new(test_clock()),
//!     Arc::new(store),
//! ));
//!
//! let guest = user("Demo", "Guest");
//! let booking = service
//!     .create_booking(space.id, guest.id, "2025-12-10", "2025-12-15")
//!     .await?;
//! assert_eq!(booking.dates.nights(), 5);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod locks;
pub mod metrics;
pub mod service;

pub use config::{Config, StoreBackend};
pub use locks::SpaceLocks;
pub use service::{BookingEnvironment, BookingService, SpaceDetails};
