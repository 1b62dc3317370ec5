//! Per-space mutual exclusion.
//!
//! Creating a booking is "read every booking of the space, check, insert". Two
//! of those running interleaved for the same space could both pass the check.
//! [`SpaceLocks`] hands out one async mutex per space so that sequence runs
//! alone for any given space, while different spaces proceed in parallel.
//!
//! The registry holds a slot only while someone holds or waits for it; idle
//! slots are dropped on the next acquisition.

use spacebook_core::types::SpaceId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of per-space async locks.
#[derive(Debug, Default)]
pub struct SpaceLocks {
    slots: Mutex<HashMap<SpaceId, Arc<AsyncMutex<()>>>>,
}

/// Exclusive access to one space, released on drop.
#[derive(Debug)]
pub struct SpaceGuard {
    space_id: SpaceId,
    _guard: OwnedMutexGuard<()>,
}

impl SpaceGuard {
    /// The locked space.
    #[must_use]
    pub const fn space_id(&self) -> SpaceId {
        self.space_id
    }
}

impl SpaceLocks {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `space_id`.
    pub async fn lock(&self, space_id: SpaceId) -> SpaceGuard {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            // A slot referenced only by the map has no holder and no waiter.
            slots.retain(|id, slot| *id == space_id || Arc::strong_count(slot) > 1);
            Arc::clone(slots.entry(space_id).or_default())
        };

        SpaceGuard {
            space_id,
            _guard: slot.lock_owned().await,
        }
    }

    /// Number of slots currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no slots are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
