//! Concurrency tests: racing admissions must never over-admit.
//!
//! Two admission checks that race on the same session must resolve to at most
//! one winner once the remaining capacity only fits one of them; the capacity
//! invariant holds after every committed operation.
//!
//! Run with: `cargo test --test concurrency_test`

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use chrono::{Duration as ChronoDuration, Utc};
use cinema_booking::services::sessions::SessionDraft;
use cinema_booking::{BookingService, Error, Hall, HallId, SessionId, SessionService, Store};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;

fn services() -> (Arc<Store>, SessionService, BookingService) {
    let store = Arc::new(Store::new(Duration::from_secs(5)));
    let sessions = SessionService::new(Arc::clone(&store));
    let bookings = BookingService::new(Arc::clone(&store));
    (store, sessions, bookings)
}

async fn seed_hall(store: &Store, capacity: u32) -> HallId {
    let hall = Hall::new("Test Hall", capacity);
    let id = hall.id;
    store.insert_hall(hall).await;
    id
}

async fn seed_session(sessions: &SessionService, hall_id: HallId, movie: &str) -> SessionId {
    sessions
        .create_session(SessionDraft {
            movie_title: movie.to_string(),
            hall_id,
            starts_at: Utc::now() + ChronoDuration::hours(2),
            duration_minutes: 120,
        })
        .await
        .expect("session should be created")
        .id
}

#[tokio::test]
async fn last_seats_admit_exactly_one_of_two_racers() {
    // Repeat the race a few times; a single lucky interleaving proves nothing.
    for _ in 0..10 {
        let (store, sessions, bookings) = services();
        let hall = seed_hall(&store, 50).await;
        let session = seed_session(&sessions, hall, "Solaris").await;

        bookings
            .create_booking(session, "Sidorov Semen Semenovich", 45)
            .await
            .unwrap();

        // 5 seats left; both racers want 5, so together they would overflow.
        let barrier = Arc::new(Barrier::new(2));
        let mut handles = Vec::new();
        for name in ["Ivanov Ivan Ivanovich", "Petrov Petr Petrovich"] {
            let svc = bookings.clone();
            let gate = Arc::clone(&barrier);
            handles.push(tokio::spawn(async move {
                gate.wait().await;
                svc.create_booking(session, name, 5).await
            }));
        }

        let mut admitted = 0;
        let mut rejected = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => admitted += 1,
                Err(Error::CapacityExceeded { remaining, .. }) => {
                    assert_eq!(remaining, 0);
                    rejected += 1;
                }
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(admitted, 1, "exactly one racer wins the last seats");
        assert_eq!(rejected, 1);

        let (_, tickets) = store.session_totals(session).await;
        assert_eq!(tickets, 50, "capacity invariant must hold");
    }
}

#[tokio::test]
async fn admission_swarm_never_overflows_capacity() {
    let (store, sessions, bookings) = services();
    let hall = seed_hall(&store, 50).await;
    let session = seed_session(&sessions, hall, "Solaris").await;

    // 20 cashiers race for 5 tickets each; only 10 can fit.
    let barrier = Arc::new(Barrier::new(20));
    let mut handles = Vec::new();
    for _ in 0..20 {
        let svc = bookings.clone();
        let gate = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            gate.wait().await;
            svc.create_booking(session, "Ivanov Ivan Ivanovich", 5).await
        }));
    }

    let mut admitted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => admitted += 1,
            Err(Error::CapacityExceeded { .. }) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!(admitted, 10);

    let (count, tickets) = store.session_totals(session).await;
    assert_eq!(count, 10);
    assert_eq!(tickets, 50);
}

#[tokio::test]
async fn racing_move_in_and_create_admit_exactly_one() {
    for _ in 0..10 {
        let (store, sessions, bookings) = services();
        let big = seed_hall(&store, 50).await;
        let small = {
            let hall = Hall::new("Small Hall", 10);
            let id = hall.id;
            store.insert_hall(hall).await;
            id
        };

        let source = seed_session(&sessions, big, "Solaris").await;
        let target = seed_session(&sessions, small, "Solaris").await;

        bookings
            .create_booking(target, "Sidorov Semen Semenovich", 5)
            .await
            .unwrap();
        let movable = bookings
            .create_booking(source, "Ivanov Ivan Ivanovich", 5)
            .await
            .unwrap();

        // 5 seats left on the target; a move-in of 5 races a create of 5.
        let barrier = Arc::new(Barrier::new(2));
        let mover = bookings.clone();
        let creator = bookings.clone();
        let gate_a = Arc::clone(&barrier);
        let gate_b = Arc::clone(&barrier);
        let (moved, created) = tokio::join!(
            tokio::spawn(async move {
                gate_a.wait().await;
                mover.move_booking(movable.id, target).await
            }),
            tokio::spawn(async move {
                gate_b.wait().await;
                creator
                    .create_booking(target, "Petrov Petr Petrovich", 5)
                    .await
            }),
        );
        let moved = moved.unwrap();
        let created = created.unwrap();

        assert_ne!(
            moved.is_ok(),
            created.is_ok(),
            "exactly one of the racers may claim the last seats"
        );

        let (_, tickets) = store.session_totals(target).await;
        assert_eq!(tickets, 10, "capacity invariant must hold");
        // The losing move left its booking fully attached to the source.
        if moved.is_err() {
            assert_eq!(
                store.booking(movable.id).await.unwrap().session_id,
                source
            );
        }
    }
}

#[tokio::test]
async fn concurrent_reads_see_committed_snapshots_only() {
    let (store, sessions, bookings) = services();
    let hall_a = seed_hall(&store, 50).await;
    let hall_b = seed_hall(&store, 50).await;
    let session_a = seed_session(&sessions, hall_a, "Solaris").await;
    let session_b = seed_session(&sessions, hall_b, "Solaris").await;

    let booking = bookings
        .create_booking(session_a, "Ivanov Ivan Ivanovich", 5)
        .await
        .unwrap();

    // Bounce the booking back and forth while readers recount aggregates.
    let mover = bookings.clone();
    let writer = tokio::spawn(async move {
        for _ in 0..50 {
            mover.move_booking(booking.id, session_b).await.unwrap();
            mover.move_booking(booking.id, session_a).await.unwrap();
        }
    });

    let reader_store = Arc::clone(&store);
    let reader = tokio::spawn(async move {
        for _ in 0..200 {
            let (_, on_a) = reader_store.session_totals(session_a).await;
            let (_, on_b) = reader_store.session_totals(session_b).await;
            // Separate reads may straddle a move, but each snapshot is
            // committed state: the booking counts once per snapshot.
            assert!(on_a == 0 || on_a == 5);
            assert!(on_b == 0 || on_b == 5);
            tokio::task::yield_now().await;
        }
    });

    writer.await.unwrap();
    reader.await.unwrap();

    let views = sessions.list_sessions().await;
    let total: u32 = views.iter().map(|v| v.booked_tickets).sum();
    assert_eq!(total, 5, "the booking is counted exactly once at rest");
}
