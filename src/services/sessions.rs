//! Session and hall service: hall listing and session CRUD.
//!
//! Session deletion cascades to the session's bookings inside one store
//! critical section, so no booking ever references a missing session. A hall
//! change on update is re-validated through the capacity ledger against the
//! session's already-booked tickets: shrinking below the booked sum is
//! rejected rather than silently breaking the invariant.

use crate::error::Error;
use crate::ledger::{self, Admission};
use crate::store::Store;
use crate::types::{Booking, Hall, HallId, Session, SessionId, SessionView};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// Fields accepted when creating or updating a session.
#[derive(Debug, Clone)]
pub struct SessionDraft {
    /// Movie title (non-empty after trimming)
    pub movie_title: String,
    /// Hall to screen in
    pub hall_id: HallId,
    /// Start instant in UTC
    pub starts_at: DateTime<Utc>,
    /// Duration in minutes (positive)
    pub duration_minutes: i64,
}

impl SessionDraft {
    fn validate(&self) -> Result<(String, u32), Error> {
        let title = self.movie_title.trim();
        if title.is_empty() {
            return Err(Error::InvalidInput(
                "movie title must not be empty".to_string(),
            ));
        }
        if self.duration_minutes < 1 {
            return Err(Error::InvalidInput(format!(
                "duration must be a positive number of minutes, got {}",
                self.duration_minutes
            )));
        }
        let minutes = u32::try_from(self.duration_minutes).map_err(|_| {
            Error::InvalidInput(format!(
                "duration {} minutes is out of range",
                self.duration_minutes
            ))
        })?;
        Ok((title.to_string(), minutes))
    }
}

/// CRUD for sessions and the read-only hall list.
#[derive(Debug, Clone)]
pub struct SessionService {
    store: Arc<Store>,
}

impl SessionService {
    /// Creates a session service over a shared store
    #[must_use]
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// All halls, ordered by name
    pub async fn list_halls(&self) -> Vec<Hall> {
        self.store.halls().await
    }

    /// All sessions with read-time aggregates, ordered by start time
    pub async fn list_sessions(&self) -> Vec<SessionView> {
        self.store.session_views().await
    }

    /// Create a session.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] for an empty title or non-positive duration
    /// - [`Error::NotFound`] when the hall does not exist
    pub async fn create_session(&self, draft: SessionDraft) -> Result<SessionView, Error> {
        let (movie_title, duration_minutes) = draft.validate()?;
        let hall = self
            .store
            .hall(draft.hall_id)
            .await
            .ok_or_else(|| Error::not_found("hall", draft.hall_id))?;

        let session = Session {
            id: SessionId::new(),
            movie_title,
            hall_id: hall.id,
            starts_at: draft.starts_at,
            duration_minutes,
        };
        let id = session.id;
        self.store.insert_session(session.clone()).await;
        info!(session_id = %id, hall_id = %hall.id, movie = %session.movie_title, "session created");
        Ok(SessionView::assemble(session, hall, 0, 0))
    }

    /// Update a session's fields.
    ///
    /// A hall change is re-validated against the session's booked tickets;
    /// moving to a hall smaller than what is already booked is rejected.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] for an empty title or non-positive duration
    /// - [`Error::NotFound`] when the session or hall does not exist
    /// - [`Error::CapacityExceeded`] when the new hall cannot hold the
    ///   already-booked tickets
    /// - [`Error::Conflict`] when the session lock wait exceeds its bound
    pub async fn update_session(
        &self,
        session_id: SessionId,
        draft: SessionDraft,
    ) -> Result<SessionView, Error> {
        let (movie_title, duration_minutes) = draft.validate()?;

        let _guard = self.store.lock_session(session_id).await?;
        let current = self
            .store
            .session(session_id)
            .await
            .ok_or_else(|| Error::not_found("session", session_id))?;
        let hall = self
            .store
            .hall(draft.hall_id)
            .await
            .ok_or_else(|| Error::not_found("hall", draft.hall_id))?;

        let (_, booked) = self.store.session_totals(session_id).await;
        if hall.id != current.hall_id {
            // Delta of zero: the question is whether the existing bookings
            // still fit the new hall at all.
            if let Admission::Rejected { remaining } = ledger::admit_delta(hall.capacity, booked, 0)
            {
                warn!(
                    session_id = %session_id,
                    hall_id = %hall.id,
                    booked,
                    capacity = hall.capacity,
                    "hall change rejected, booked tickets exceed new capacity"
                );
                return Err(Error::CapacityExceeded {
                    session_id,
                    requested: booked,
                    remaining,
                });
            }
        }

        let updated = Session {
            id: session_id,
            movie_title,
            hall_id: hall.id,
            starts_at: draft.starts_at,
            duration_minutes,
        };
        if !self.store.replace_session(updated.clone()).await {
            return Err(Error::not_found("session", session_id));
        }
        let (count, tickets) = self.store.session_totals(session_id).await;
        info!(session_id = %session_id, hall_id = %hall.id, "session updated");
        Ok(SessionView::assemble(updated, hall, count, tickets))
    }

    /// Delete a session, cascading to its bookings.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] when the session does not exist
    /// - [`Error::Conflict`] when the session lock wait exceeds its bound
    pub async fn delete_session(&self, session_id: SessionId) -> Result<(), Error> {
        let guard = self.store.lock_session(session_id).await?;
        let (_, bookings) = self
            .store
            .remove_session(session_id)
            .await
            .ok_or_else(|| Error::not_found("session", session_id))?;
        drop(guard);
        info!(
            session_id = %session_id,
            cascaded_bookings = bookings.len(),
            "session deleted"
        );
        Ok(())
    }

    /// All bookings of one session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the session does not exist.
    pub async fn list_bookings(&self, session_id: SessionId) -> Result<Vec<Booking>, Error> {
        self.store
            .session(session_id)
            .await
            .ok_or_else(|| Error::not_found("session", session_id))?;
        Ok(self.store.bookings_for(session_id).await)
    }
}
