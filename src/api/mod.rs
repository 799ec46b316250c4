//! HTTP request boundary: thin adapters translating external calls into
//! service invocations and mapping domain errors to responses.
//!
//! The wire format matches the cashier frontend's client: wrapped JSON
//! objects with camelCase fields, `{"error":{"code","message"}}` error
//! bodies, and 204 for deletes.

pub mod bookings;
pub mod halls;
pub mod sessions;

use crate::error::Error;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// HTTP-facing error wrapper for domain errors.
///
/// Implements Axum's `IntoResponse` so handlers can bubble domain errors up
/// with `?` and still produce the wire error shape.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match err {
            Error::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::CapacityExceeded { .. } | Error::InvalidTarget(_) | Error::Conflict(_) => {
                StatusCode::CONFLICT
            }
        };
        Self {
            status,
            code: err.code(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}
