//! Error taxonomy for the booking core.
//!
//! Validation errors and not-found are terminal and surfaced immediately.
//! Capacity rejections are terminal and leave no partial state behind.
//! `Conflict` is the retryable class: lock waits that exceeded their bound or
//! retry loops that exhausted their budget.

use crate::types::SessionId;
use std::fmt;
use thiserror::Error;

/// Domain error for booking and session operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input: bad holder name shape, non-positive ticket or
    /// duration counts. Rejected before any storage or ledger access.
    #[error("{0}")]
    InvalidInput(String),

    /// A referenced hall, session, or booking does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Kind of the missing entity
        entity: &'static str,
        /// Identifier that failed to resolve
        id: String,
    },

    /// The capacity ledger rejected the requested ticket delta.
    #[error("session {session_id} cannot admit {requested} ticket(s), {remaining} remaining")]
    CapacityExceeded {
        /// Session whose hall capacity would be exceeded
        session_id: SessionId,
        /// Ticket count the caller asked for
        requested: u32,
        /// Seats still available in the session's hall
        remaining: u32,
    },

    /// The move target is not admissible regardless of capacity:
    /// same session as the current one, or a different movie.
    #[error("{0}")]
    InvalidTarget(String),

    /// Transient contention: bounded lock wait or retry budget exhausted.
    /// Safe to retry from the caller's side.
    #[error("{0}")]
    Conflict(String),
}

impl Error {
    /// Convenience constructor for [`Error::NotFound`]
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Stable machine-readable code for the external interface
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            Self::InvalidTarget(_) => "INVALID_TARGET",
            Self::Conflict(_) => "CONFLICT",
        }
    }
}
