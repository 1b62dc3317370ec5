//! Concurrent requests against one space.
//!
//! These run on the multi-threaded runtime so requests genuinely interleave.

#![allow(clippy::unwrap_used)]

mod common;

use common::harness;
use futures::future::join_all;
use proptest::prelude::*;
use spacebook_core::error::{BookingError, ConflictKind};
use spacebook_core::types::UserId;
use spacebook_testing::properties::date_range;
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_concurrent_bookings_admit_exactly_one() {
    let h = harness();

    let attempts = (0..16).map(|i| {
        let service = Arc::clone(&h.service);
        let space_id = h.space.id;
        // Every range contains the night of Dec 12.
        let start = format!("2025-12-{:02}", 1 + i % 12);
        tokio::spawn(async move {
            service
                .create_booking(space_id, UserId::new(), &start, "2025-12-13")
                .await
        })
    });
    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.iter().filter_map(|r| r.as_ref().err()).all(|e| matches!(
        e,
        BookingError::Conflict(ConflictKind::Booking(_))
    )));
    assert_eq!(h.store.booking_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn disjoint_concurrent_bookings_all_succeed() {
    let h = harness();

    let attempts = (0..10u32).map(|i| {
        let service = Arc::clone(&h.service);
        let space_id = h.space.id;
        let start = format!("2026-01-{:02}", 1 + 2 * i);
        let end = format!("2026-01-{:02}", 3 + 2 * i);
        tokio::spawn(async move {
            service
                .create_booking(space_id, UserId::new(), &start, &end)
                .await
        })
    });
    let results = join_all(attempts).await;

    assert!(results.into_iter().all(|r| r.unwrap().is_ok()));
    assert_eq!(h.store.booking_count(), 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reviews_by_one_author_admit_exactly_one() {
    let h = harness();
    let author = h.guest_g.id;

    let attempts = (1..=5i64).map(|stars| {
        let service = Arc::clone(&h.service);
        let space_id = h.space.id;
        tokio::spawn(async move { service.create_review(space_id, author, stars, "Racing").await })
    });
    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(h.store.review_count(), 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Whatever sequence of requests arrives, the stored bookings of a space
    /// never overlap pairwise, and every rejection was a real overlap.
    #[test]
    fn stored_bookings_never_overlap(ranges in prop::collection::vec(clustered_date_range(), 1..24)) {
        tokio_test::block_on(async {
            let h = harness();
            let mut accepted = Vec::new();

            for range in &ranges {
                let start = range.start().to_string();
                let end = range.end().to_string();
                match h.service.create_booking(h.space.id, UserId::new(), &start, &end).await {
                    Ok(booking) => accepted.push(booking.dates),
                    Err(BookingError::Conflict(_)) => {
                        prop_assert!(accepted.iter().any(|a| a.overlaps(range)));
                    }
                    Err(other) => prop_assert!(false, "unexpected error {other:?}"),
                }
            }

            for (i, a) in accepted.iter().enumerate() {
                for b in &accepted[i + 1..] {
                    prop_assert!(!a.overlaps(b), "{a} overlaps {b}");
                }
            }
            prop_assert_eq!(h.store.booking_count(), accepted.len());
            Ok(())
        })?;
    }
}

fn clustered_date_range() -> impl Strategy<Value = spacebook_core::date_range::DateRange> {
    // Dense enough that collisions are common.
    prop_oneof![date_range(), spacebook_testing::properties::date_range_within(90)]
}
