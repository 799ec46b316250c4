//! HTTP API integration tests.
//!
//! Spins the real router up on an ephemeral port and exercises the wire
//! contract the cashier frontend relies on: wrapped JSON objects, camelCase
//! fields, `{"error":{"code","message"}}` bodies, and 204 deletes.
//!
//! Run with: `cargo test --test http_api_test`

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use cinema_booking::{build_router, AppState, Hall, Store};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

async fn spawn_app() -> (String, Arc<Store>) {
    let store = Arc::new(Store::new(Duration::from_secs(5)));
    let router = build_router(AppState::new(Arc::clone(&store)));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{addr}"), store)
}

async fn seed_hall(store: &Store, name: &str, capacity: u32) -> String {
    let hall = Hall::new(name, capacity);
    let id = hall.id.to_string();
    store.insert_hall(hall).await;
    id
}

#[tokio::test]
async fn health_endpoints_respond() {
    let (base, _store) = spawn_app().await;
    let client = reqwest::Client::new();

    let res = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    let res = client.get(format!("{base}/ready")).send().await.unwrap();
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn full_booking_flow_over_the_wire() {
    let (base, store) = spawn_app().await;
    let client = reqwest::Client::new();
    let hall_id = seed_hall(&store, "Hall 1", 50).await;

    // Hall listing.
    let res = client.get(format!("{base}/api/halls")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["halls"][0]["name"], "Hall 1");
    assert_eq!(body["halls"][0]["capacity"], 50);

    // Create a session; duration arrives split into hours and minutes.
    let res = client
        .post(format!("{base}/api/sessions"))
        .json(&json!({
            "movieTitle": "Solaris",
            "hallId": hall_id,
            "startsAt": "2026-09-01T18:00:00Z",
            "duration": { "hours": 2, "minutes": 45 }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);
    let body: Value = res.json().await.unwrap();
    let session = &body["session"];
    assert_eq!(session["movieTitle"], "Solaris");
    assert_eq!(session["durationMinutes"], 165);
    assert_eq!(session["hall"]["id"], Value::String(hall_id.clone()));
    assert_eq!(session["bookedTickets"], 0);
    let session_id = session["id"].as_str().unwrap().to_string();

    // Create a booking.
    let res = client
        .post(format!("{base}/api/bookings"))
        .json(&json!({
            "sessionId": session_id,
            "fullName": "Ivanov Ivan Ivanovich",
            "tickets": 48
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);
    let body: Value = res.json().await.unwrap();
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["booking"]["sessionId"], Value::String(session_id.clone()));

    // Aggregates are visible on the session listing.
    let res = client.get(format!("{base}/api/sessions")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["sessions"][0]["bookingsCount"], 1);
    assert_eq!(body["sessions"][0]["bookedTickets"], 48);

    // Overbooking is a 409 with the wire error shape.
    let res = client
        .post(format!("{base}/api/bookings"))
        .json(&json!({
            "sessionId": session_id,
            "fullName": "Petrov Petr Petrovich",
            "tickets": 3
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 409);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], "CAPACITY_EXCEEDED");
    assert!(body["error"]["message"].as_str().unwrap().contains("2 remaining"));

    // A malformed holder name is a 422.
    let res = client
        .post(format!("{base}/api/bookings"))
        .json(&json!({
            "sessionId": session_id,
            "fullName": "Ivanov Ivan",
            "tickets": 1
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 422);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], "INVALID_INPUT");

    // Edit the booking down, freeing seats.
    let res = client
        .put(format!("{base}/api/bookings/{booking_id}"))
        .json(&json!({ "fullName": "Ivanov Ivan Ivanovich", "tickets": 10 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["booking"]["tickets"], 10);

    // Delete the booking.
    let res = client
        .delete(format!("{base}/api/bookings/{booking_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 204);

    // Deleting it again is a 404.
    let res = client
        .delete(format!("{base}/api/bookings/{booking_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn move_endpoint_and_session_cascade() {
    let (base, store) = spawn_app().await;
    let client = reqwest::Client::new();
    let hall_a = seed_hall(&store, "Hall A", 50).await;
    let hall_b = seed_hall(&store, "Hall B", 50).await;

    let create_session = |hall_id: String, movie: &str| {
        let client = client.clone();
        let base = base.clone();
        let movie = movie.to_string();
        async move {
            let res = client
                .post(format!("{base}/api/sessions"))
                .json(&json!({
                    "movieTitle": movie,
                    "hallId": hall_id,
                    "startsAt": "2026-09-01T18:00:00Z",
                    "duration": { "hours": 2, "minutes": 0 }
                }))
                .send()
                .await
                .unwrap();
            assert_eq!(res.status(), 201);
            let body: Value = res.json().await.unwrap();
            body["session"]["id"].as_str().unwrap().to_string()
        }
    };
    let source = create_session(hall_a.clone(), "Solaris").await;
    let target = create_session(hall_b.clone(), "Solaris").await;

    let res = client
        .post(format!("{base}/api/bookings"))
        .json(&json!({
            "sessionId": source,
            "fullName": "Ivanov Ivan Ivanovich",
            "tickets": 5
        }))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    // Moving onto the current session is rejected.
    let res = client
        .post(format!("{base}/api/bookings/{booking_id}/move"))
        .json(&json!({ "targetSessionId": source }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 409);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], "INVALID_TARGET");

    // A proper move reattaches the booking.
    let res = client
        .post(format!("{base}/api/bookings/{booking_id}/move"))
        .json(&json!({ "targetSessionId": target }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["booking"]["sessionId"], Value::String(target.clone()));

    // Bookings listing follows the move.
    let res = client
        .get(format!("{base}/api/sessions/{target}/bookings"))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["bookings"].as_array().unwrap().len(), 1);

    // Session delete cascades and the bookings listing 404s afterwards.
    let res = client
        .delete(format!("{base}/api/sessions/{target}"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 204);
    let res = client
        .get(format!("{base}/api/sessions/{target}/bookings"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    let booking_uuid: uuid::Uuid = booking_id.parse().unwrap();
    assert!(store
        .booking(cinema_booking::BookingId::from_uuid(booking_uuid))
        .await
        .is_none());
}
