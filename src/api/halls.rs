//! Hall endpoints.
//!
//! Halls are provisioned outside the booking core, so the only operation is
//! the ordered listing the cashier frontend uses to populate its pickers.

use super::ApiError;
use crate::server::state::AppState;
use crate::types::Hall;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

/// Response for `GET /api/halls`.
#[derive(Debug, Serialize)]
pub struct HallsResponse {
    /// All halls, ordered by name
    pub halls: Vec<Hall>,
}

/// List all halls.
///
/// # Example
///
/// ```bash
/// curl http://localhost:4000/api/halls
/// # {"halls":[{"id":"...","name":"Hall 1","capacity":50}]}
/// ```
pub async fn list_halls(State(state): State<AppState>) -> Result<Json<HallsResponse>, ApiError> {
    let halls = state.sessions.list_halls().await;
    Ok(Json(HallsResponse { halls }))
}
