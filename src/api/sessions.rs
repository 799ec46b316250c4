//! Session endpoints: CRUD plus the per-session booking listing.

use super::ApiError;
use crate::server::state::AppState;
use crate::services::sessions::SessionDraft;
use crate::types::{Booking, HallId, SessionId, SessionView};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Session duration as the frontend submits it.
#[derive(Debug, Deserialize)]
pub struct DurationInput {
    /// Whole hours
    pub hours: i64,
    /// Additional minutes
    pub minutes: i64,
}

impl DurationInput {
    const fn total_minutes(&self) -> i64 {
        self.hours * 60 + self.minutes
    }
}

/// Body for `POST /api/sessions` and `PUT /api/sessions/:id`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    /// Movie title
    pub movie_title: String,
    /// Hall to screen in
    pub hall_id: Uuid,
    /// Start instant (ISO 8601, normalized to UTC)
    pub starts_at: DateTime<Utc>,
    /// Duration split into hours and minutes
    pub duration: DurationInput,
}

impl SessionRequest {
    fn into_draft(self) -> SessionDraft {
        SessionDraft {
            movie_title: self.movie_title,
            hall_id: HallId::from_uuid(self.hall_id),
            starts_at: self.starts_at,
            duration_minutes: self.duration.total_minutes(),
        }
    }
}

/// Response wrapping a list of sessions.
#[derive(Debug, Serialize)]
pub struct SessionsResponse {
    /// Sessions with read-time aggregates
    pub sessions: Vec<SessionView>,
}

/// Response wrapping a single session.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// The affected session
    pub session: SessionView,
}

/// Response wrapping one session's bookings.
#[derive(Debug, Serialize)]
pub struct BookingsResponse {
    /// Bookings of the requested session
    pub bookings: Vec<Booking>,
}

// ============================================================================
// Handlers
// ============================================================================

/// List all sessions with aggregates.
///
/// # Example
///
/// ```bash
/// curl http://localhost:4000/api/sessions
/// ```
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<SessionsResponse>, ApiError> {
    let sessions = state.sessions.list_sessions().await;
    Ok(Json(SessionsResponse { sessions }))
}

/// Create a session.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:4000/api/sessions \
///   -H "Content-Type: application/json" \
///   -d '{"movieTitle":"Solaris","hallId":"...","startsAt":"2026-09-01T18:00:00Z","duration":{"hours":2,"minutes":45}}'
/// ```
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<SessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let session = state.sessions.create_session(request.into_draft()).await?;
    Ok((StatusCode::CREATED, Json(SessionResponse { session })))
}

/// Update a session.
pub async fn update_session(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<SessionRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state
        .sessions
        .update_session(SessionId::from_uuid(session_id), request.into_draft())
        .await?;
    Ok(Json(SessionResponse { session }))
}

/// Delete a session, cascading to its bookings.
pub async fn delete_session(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state
        .sessions
        .delete_session(SessionId::from_uuid(session_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the bookings of one session.
///
/// # Example
///
/// ```bash
/// curl http://localhost:4000/api/sessions/<id>/bookings
/// ```
pub async fn list_session_bookings(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<BookingsResponse>, ApiError> {
    let bookings = state
        .sessions
        .list_bookings(SessionId::from_uuid(session_id))
        .await?;
    Ok(Json(BookingsResponse { bookings }))
}
