//! Booking endpoints: create, edit, delete, and move.

use super::ApiError;
use crate::server::state::AppState;
use crate::types::{Booking, BookingId, SessionId};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body for `POST /api/bookings`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    /// Session to book against
    pub session_id: Uuid,
    /// Holder full name (three words)
    pub full_name: String,
    /// Requested ticket count
    pub tickets: i64,
}

/// Body for `PUT /api/bookings/:id`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    /// New holder full name (three words)
    pub full_name: String,
    /// New ticket count
    pub tickets: i64,
}

/// Body for `POST /api/bookings/:id/move`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveBookingRequest {
    /// Session to move the booking to
    pub target_session_id: Uuid,
}

/// Response wrapping a single booking.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    /// The affected booking
    pub booking: Booking,
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a booking.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:4000/api/bookings \
///   -H "Content-Type: application/json" \
///   -d '{"sessionId":"...","fullName":"Ivanov Ivan Ivanovich","tickets":2}'
/// ```
pub async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let booking = state
        .bookings
        .create_booking(
            SessionId::from_uuid(request.session_id),
            &request.full_name,
            request.tickets,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(BookingResponse { booking })))
}

/// Update a booking's holder name and ticket count.
pub async fn update_booking(
    Path(booking_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<UpdateBookingRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking = state
        .bookings
        .update_booking(
            BookingId::from_uuid(booking_id),
            &request.full_name,
            request.tickets,
        )
        .await?;
    Ok(Json(BookingResponse { booking }))
}

/// Delete a booking.
pub async fn delete_booking(
    Path(booking_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state
        .bookings
        .delete_booking(BookingId::from_uuid(booking_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Move a booking to another session of the same movie.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:4000/api/bookings/<id>/move \
///   -H "Content-Type: application/json" \
///   -d '{"targetSessionId":"..."}'
/// ```
pub async fn move_booking(
    Path(booking_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<MoveBookingRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking = state
        .bookings
        .move_booking(
            BookingId::from_uuid(booking_id),
            SessionId::from_uuid(request.target_session_id),
        )
        .await?;
    Ok(Json(BookingResponse { booking }))
}
