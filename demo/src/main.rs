//! Spacebook demo.
//!
//! Seeds one space with an owner and two guests, then walks through the
//! booking and review rules against the configured store:
//!
//! ```text
//! SPACEBOOK_STORE=memory   cargo run -p spacebook-demo
//! SPACEBOOK_STORE=postgres DATABASE_URL=postgres://... cargo run -p spacebook-demo
//! ```

use spacebook_core::environment::SystemClock;
use spacebook_core::error::BookingError;
use spacebook_core::store::BookingStore;
use spacebook_core::types::SpaceId;
use spacebook_postgres::{PoolSettings, PostgresBookingStore};
use spacebook_runtime::config::{Config, StoreBackend};
use spacebook_runtime::metrics::MetricsServer;
use spacebook_runtime::{BookingEnvironment, BookingService};
use spacebook_testing::InMemoryBookingStore;
use spacebook_testing::fixtures::{space_owned_by, user};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("spacebook_demo=info,{}", config.log_filter).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(store = %config.store, "Starting Spacebook demo");

    let mut metrics = MetricsServer::new(config.metrics.addr());
    if config.metrics.enabled {
        metrics.start()?;
    }

    let owner = user("Demo", "Owner");
    let guest_g = user("Gail", "Guest");
    let guest_h = user("Hal", "Guest");
    let space = space_owned_by(owner.id);

    let store: Arc<dyn BookingStore> = match config.store {
        StoreBackend::Memory => {
            let store = InMemoryBookingStore::new();
            for person in [&owner, &guest_g, &guest_h] {
                store.insert_user(person.clone());
            }
            store.insert_space(space.clone());
            Arc::new(store)
        }
        StoreBackend::Postgres => {
            info!("Connecting to PostgreSQL...");
            let settings = PoolSettings {
                max_connections: config.postgres.max_connections,
                min_connections: config.postgres.min_connections,
                acquire_timeout: config.postgres.connect_timeout(),
                idle_timeout: config.postgres.idle_timeout(),
            };
            let store = PostgresBookingStore::connect(&config.postgres.url, &settings).await?;
            if config.postgres.run_migrations {
                store.migrate().await?;
            }
            for person in [&owner, &guest_g, &guest_h] {
                store.insert_user(person).await?;
            }
            store.insert_space(&space).await?;
            info!("PostgreSQL store ready");
            Arc::new(store)
        }
    };

    let service = BookingService::new(BookingEnvironment::new(Arc::new(SystemClock), store));

    // Bookings
    report(
        "G books Dec 10-15",
        service.create_booking(space.id, guest_g.id, "2025-12-10", "2025-12-15").await,
    );
    report(
        "H books Dec 12-20 (overlaps G)",
        service.create_booking(space.id, guest_h.id, "2025-12-12", "2025-12-20").await,
    );
    report(
        "H books Dec 15-18 (checks in as G checks out)",
        service.create_booking(space.id, guest_h.id, "2025-12-15", "2025-12-18").await,
    );
    report(
        "Owner books own space",
        service.create_booking(space.id, owner.id, "2026-01-01", "2026-01-03").await,
    );
    report(
        "G books with end before start",
        service.create_booking(space.id, guest_g.id, "2026-02-10", "2026-02-01").await,
    );
    report(
        "G books an unknown space",
        service.create_booking(SpaceId::new(), guest_g.id, "2026-02-01", "2026-02-03").await,
    );

    for (label, caller) in [("owner", owner.id), ("guest", guest_h.id)] {
        let views = service.list_bookings_for_space(space.id, caller).await?;
        info!(caller = label, views = %serde_json::to_string(&views)?, "Bookings as seen by {label}");
    }

    // Reviews
    report(
        "G reviews 5 stars",
        service.create_review(space.id, guest_g.id, 5, "Great location").await,
    );
    report(
        "H reviews 3 stars",
        service.create_review(space.id, guest_h.id, 3, "Noisy street").await,
    );
    report(
        "G reviews again",
        service.create_review(space.id, guest_g.id, 4, "Second thoughts").await,
    );
    report(
        "H reviews with 6 stars and no text",
        service.create_review(space.id, guest_h.id, 6, "").await,
    );

    let details = service.space_details(space.id).await?;
    info!(details = %serde_json::to_string(&details)?, "Space details");

    if let Some(rendered) = metrics.render() {
        info!("Metrics:\n{rendered}");
    }

    info!("Demo finished");
    Ok(())
}

fn report<T: std::fmt::Debug>(step: &str, result: Result<T, BookingError>) {
    match result {
        Ok(value) => info!(step, "OK: {value:?}"),
        Err(err) => warn!(
            step,
            status = err.status_code(),
            fields = ?err.field_errors(),
            "Rejected: {err}"
        ),
    }
}
