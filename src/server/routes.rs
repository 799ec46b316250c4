//! Router configuration for the booking service.

use super::health::{health_check, readiness_check};
use super::state::AppState;
use crate::api::{bookings, halls, sessions};
use axum::routing::{get, post, put};
use axum::Router;

/// Build the complete Axum router.
///
/// Configures health checks plus the `/api` surface the cashier frontend
/// consumes: hall listing, session CRUD, and booking CRUD with move.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Halls (read-only)
        .route("/halls", get(halls::list_halls))
        // Session management
        .route(
            "/sessions",
            get(sessions::list_sessions).post(sessions::create_session),
        )
        .route(
            "/sessions/:id",
            put(sessions::update_session).delete(sessions::delete_session),
        )
        .route("/sessions/:id/bookings", get(sessions::list_session_bookings))
        // Booking management
        .route("/bookings", post(bookings::create_booking))
        .route(
            "/bookings/:id",
            put(bookings::update_booking).delete(bookings::delete_booking),
        )
        .route("/bookings/:id/move", post(bookings::move_booking));

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .nest("/api", api_routes)
        .with_state(state)
}
