//! Domain types for the cinema booking service.
//!
//! This module contains the identifiers, entities, and validated value objects
//! shared by the capacity ledger, the entity store, and the services:
//! halls, screening sessions, and ticket bookings.

use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a hall
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HallId(Uuid);

impl HallId {
    /// Creates a new random `HallId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `HallId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for HallId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a screening session
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new random `SessionId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `SessionId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a booking
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BookingId(Uuid);

impl BookingId {
    /// Creates a new random `BookingId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `BookingId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Holder Name Value Object
// ============================================================================

/// Validated full name of a booking holder.
///
/// A holder name must decompose into exactly three non-empty
/// whitespace-separated tokens (surname, given name, patronymic).
/// The stored form is normalized: leading/trailing whitespace trimmed and
/// internal runs of whitespace collapsed to single spaces.
///
/// This is a business rule over token count, not a linguistic rule; it makes
/// no assumptions about locale-specific name conventions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HolderName(String);

impl HolderName {
    /// Number of tokens a holder name must decompose into.
    pub const REQUIRED_TOKENS: usize = 3;

    /// Parse and normalize a raw full name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when the name does not consist of
    /// exactly three non-empty words after whitespace normalization.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        if tokens.len() == Self::REQUIRED_TOKENS {
            Ok(Self(tokens.join(" ")))
        } else {
            Err(Error::InvalidInput(format!(
                "full name must consist of exactly {} words, got {}",
                Self::REQUIRED_TOKENS,
                tokens.len()
            )))
        }
    }

    /// The normalized name as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HolderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A physical screening room with a fixed seating capacity.
///
/// Halls are provisioned outside the booking core and are read-only to it:
/// the capacity set at creation is the bound the ledger enforces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hall {
    /// Hall identifier
    pub id: HallId,
    /// Human-readable hall name (non-empty)
    pub name: String,
    /// Total seating capacity (positive, fixed at creation)
    pub capacity: u32,
}

impl Hall {
    /// Creates a new hall with a fresh identifier
    #[must_use]
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: HallId::new(),
            name: name.into(),
            capacity,
        }
    }
}

/// A scheduled screening of a movie in a hall.
///
/// The booking aggregates (`bookings_count`, `booked_tickets`) are not stored
/// here; they are derived at read time, see [`SessionView`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    /// Session identifier
    pub id: SessionId,
    /// Movie title (non-empty)
    pub movie_title: String,
    /// Hall the session is screened in
    pub hall_id: HallId,
    /// Start instant, normalized to UTC
    pub starts_at: DateTime<Utc>,
    /// Duration in minutes (positive)
    pub duration_minutes: u32,
}

/// A reservation of a ticket count against a session.
///
/// `session_id` is the one mutable reference in the model: a move operation
/// reassigns it atomically. There is no pending state; a booking is either
/// fully attached to a session or it does not exist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Booking identifier
    pub id: BookingId,
    /// Session this booking is attached to
    pub session_id: SessionId,
    /// Normalized three-part holder name
    pub full_name: HolderName,
    /// Number of tickets held (at least 1)
    pub tickets: u32,
}

// ============================================================================
// Read-side View
// ============================================================================

/// A session together with its hall and read-time booking aggregates.
///
/// This is the shape the external interface serves. The aggregates are always
/// recomputed from the live booking set in a single consistent snapshot, so
/// they can never drift from the source of truth.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// Session identifier
    pub id: SessionId,
    /// Movie title
    pub movie_title: String,
    /// Start instant in UTC
    pub starts_at: DateTime<Utc>,
    /// Duration in minutes
    pub duration_minutes: u32,
    /// The hall the session is screened in
    pub hall: Hall,
    /// Number of bookings attached to the session
    pub bookings_count: u32,
    /// Sum of ticket counts across the session's bookings
    pub booked_tickets: u32,
}

impl SessionView {
    /// Assemble a view from a session, its hall, and precomputed aggregates
    #[must_use]
    pub fn assemble(session: Session, hall: Hall, bookings_count: u32, booked_tickets: u32) -> Self {
        Self {
            id: session.id,
            movie_title: session.movie_title,
            starts_at: session.starts_at,
            duration_minutes: session.duration_minutes,
            hall,
            bookings_count,
            booked_tickets,
        }
    }
}
