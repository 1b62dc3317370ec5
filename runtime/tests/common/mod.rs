//! Shared setup for service tests.

#![allow(dead_code)]

use spacebook_core::types::{Space, User};
use spacebook_runtime::{BookingEnvironment, BookingService};
use spacebook_testing::fixtures::{space_owned_by, user};
use spacebook_testing::{InMemoryBookingStore, test_clock};
use std::sync::Arc;

/// A space owned by O, with guests G and H, over an in-memory store.
pub struct Harness {
    pub store: InMemoryBookingStore,
    pub service: Arc<BookingService>,
    pub owner: User,
    pub guest_g: User,
    pub guest_h: User,
    pub space: Space,
}

pub fn harness() -> Harness {
    spacebook_testing::helpers::init_test_tracing();

    let store = InMemoryBookingStore::new();
    let owner = user("Olive", "Owner");
    let guest_g = user("Gail", "Guest");
    let guest_h = user("Hal", "Guest");
    let space = space_owned_by(owner.id);

    for person in [&owner, &guest_g, &guest_h] {
        store.insert_user(person.clone());
    }
    store.insert_space(space.clone());

    let service = Arc::new(BookingService::new(BookingEnvironment::new(
        Arc::new(test_clock()),
        Arc::new(store.clone()),
    )));

    Harness {
        store,
        service,
        owner,
        guest_g,
        guest_h,
        space,
    }
}
