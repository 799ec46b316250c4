//! Booking service: create, update, delete, and move bookings.
//!
//! Every ticket-count-increasing path holds the affected session's lock
//! across its admission check and commit, so two racing admissions can never
//! both observe the same free capacity. Deletion only frees capacity and
//! needs no session lock; the removal itself is a single atomic write.
//!
//! `move_booking` is the one cross-session operation: it holds both session
//! locks (ascending id order), checks admission on the destination side
//! against its current sum, and reassigns the booking's session reference in
//! one critical section. Either the booking ends up fully attached to the
//! target or it stays fully attached to its source.

use super::{validate_tickets, MAX_LOCK_RETRIES};
use crate::error::Error;
use crate::ledger::{self, Admission};
use crate::store::Store;
use crate::types::{Booking, BookingId, Hall, HolderName, Session, SessionId};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Orchestrates booking mutations against the entity store through the
/// capacity ledger.
#[derive(Debug, Clone)]
pub struct BookingService {
    store: Arc<Store>,
}

impl BookingService {
    /// Creates a booking service over a shared store
    #[must_use]
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Create a booking against a session.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] for a malformed name or non-positive tickets
    /// - [`Error::NotFound`] when the session does not exist
    /// - [`Error::CapacityExceeded`] when the tickets do not fit the hall
    /// - [`Error::Conflict`] when the session lock wait exceeds its bound
    pub async fn create_booking(
        &self,
        session_id: SessionId,
        full_name: &str,
        tickets: i64,
    ) -> Result<Booking, Error> {
        let full_name = HolderName::parse(full_name)?;
        let tickets = validate_tickets(tickets)?;

        let _guard = self.store.lock_session(session_id).await?;
        let (session, hall) = self.session_with_hall(session_id).await?;
        let (_, booked) = self.store.session_totals(session_id).await;

        admit(&session, &hall, booked, i64::from(tickets), tickets)?;

        let booking = Booking {
            id: BookingId::new(),
            session_id,
            full_name,
            tickets,
        };
        self.store.insert_booking(booking.clone()).await;
        info!(
            booking_id = %booking.id,
            session_id = %session_id,
            tickets = booking.tickets,
            "booking created"
        );
        Ok(booking)
    }

    /// Update a booking's holder name and ticket count in place.
    ///
    /// The capacity check subtracts the booking's own prior contribution:
    /// it admits iff `sum - old + new <= capacity`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] for a malformed name or non-positive tickets
    /// - [`Error::NotFound`] when the booking no longer exists
    /// - [`Error::CapacityExceeded`] when the increase does not fit
    /// - [`Error::Conflict`] on lock timeout or retry exhaustion
    pub async fn update_booking(
        &self,
        booking_id: BookingId,
        full_name: &str,
        tickets: i64,
    ) -> Result<Booking, Error> {
        let full_name = HolderName::parse(full_name)?;
        let tickets = validate_tickets(tickets)?;

        for _ in 0..MAX_LOCK_RETRIES {
            let peeked = self
                .store
                .booking(booking_id)
                .await
                .ok_or_else(|| Error::not_found("booking", booking_id))?;
            let _guard = self.store.lock_session(peeked.session_id).await?;

            // A concurrent move may have reattached the booking between the
            // peek and the lock; retry against the new session in that case.
            let current = self
                .store
                .booking(booking_id)
                .await
                .ok_or_else(|| Error::not_found("booking", booking_id))?;
            if current.session_id != peeked.session_id {
                continue;
            }

            let (session, hall) = self.session_with_hall(current.session_id).await?;
            let (_, booked) = self.store.session_totals(current.session_id).await;
            let delta = i64::from(tickets) - i64::from(current.tickets);
            admit(&session, &hall, booked, delta, tickets)?;

            let updated = Booking {
                id: current.id,
                session_id: current.session_id,
                full_name,
                tickets,
            };
            if !self.store.replace_booking(updated.clone()).await {
                return Err(Error::not_found("booking", booking_id));
            }
            info!(
                booking_id = %booking_id,
                session_id = %updated.session_id,
                tickets = updated.tickets,
                "booking updated"
            );
            return Ok(updated);
        }

        Err(Error::Conflict(format!(
            "booking {booking_id} kept moving between sessions, retries exhausted"
        )))
    }

    /// Delete a booking. Removing a booking only frees capacity, so it is
    /// always admissible.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the booking does not exist.
    pub async fn delete_booking(&self, booking_id: BookingId) -> Result<(), Error> {
        let removed = self
            .store
            .remove_booking(booking_id)
            .await
            .ok_or_else(|| Error::not_found("booking", booking_id))?;
        info!(
            booking_id = %booking_id,
            session_id = %removed.session_id,
            tickets = removed.tickets,
            "booking deleted"
        );
        Ok(())
    }

    /// Move a booking to another session of the same movie, all-or-nothing.
    ///
    /// The destination-side admission check runs against the target's current
    /// ticket sum (the moving booking is not yet counted there). On rejection
    /// the booking remains fully attached to its source session.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] when the booking or target session is missing
    /// - [`Error::InvalidTarget`] when the target equals the current session
    ///   or shows a different movie
    /// - [`Error::CapacityExceeded`] when the target hall cannot take the
    ///   booking's tickets
    /// - [`Error::Conflict`] on lock timeout or retry exhaustion
    pub async fn move_booking(
        &self,
        booking_id: BookingId,
        target_session_id: SessionId,
    ) -> Result<Booking, Error> {
        for _ in 0..MAX_LOCK_RETRIES {
            let peeked = self
                .store
                .booking(booking_id)
                .await
                .ok_or_else(|| Error::not_found("booking", booking_id))?;
            let source_id = peeked.session_id;
            if source_id == target_session_id {
                return Err(Error::InvalidTarget(format!(
                    "booking {booking_id} already belongs to session {target_session_id}"
                )));
            }

            let _guards = self
                .store
                .lock_session_pair(source_id, target_session_id)
                .await?;

            let current = self
                .store
                .booking(booking_id)
                .await
                .ok_or_else(|| Error::not_found("booking", booking_id))?;
            if current.session_id != source_id {
                continue;
            }

            let source = self
                .store
                .session(source_id)
                .await
                .ok_or_else(|| Error::not_found("session", source_id))?;
            let (target, target_hall) = self.session_with_hall(target_session_id).await?;
            if source.movie_title != target.movie_title {
                return Err(Error::InvalidTarget(format!(
                    "cannot move booking {booking_id} to session {target_session_id}: \
                     target shows a different movie"
                )));
            }

            let (_, booked) = self.store.session_totals(target_session_id).await;
            admit(
                &target,
                &target_hall,
                booked,
                i64::from(current.tickets),
                current.tickets,
            )?;

            let moved = self
                .store
                .reassign_booking(booking_id, target_session_id)
                .await
                .ok_or_else(|| Error::not_found("booking", booking_id))?;
            info!(
                booking_id = %booking_id,
                from = %source_id,
                to = %target_session_id,
                tickets = moved.tickets,
                "booking moved"
            );
            return Ok(moved);
        }

        Err(Error::Conflict(format!(
            "booking {booking_id} kept moving between sessions, retries exhausted"
        )))
    }

    async fn session_with_hall(&self, session_id: SessionId) -> Result<(Session, Hall), Error> {
        let session = self
            .store
            .session(session_id)
            .await
            .ok_or_else(|| Error::not_found("session", session_id))?;
        let hall = self
            .store
            .hall(session.hall_id)
            .await
            .ok_or_else(|| Error::not_found("hall", session.hall_id))?;
        Ok((session, hall))
    }
}

/// Consult the ledger for a delta against one session and translate a
/// rejection into the domain error, with the session id attached.
fn admit(
    session: &Session,
    hall: &Hall,
    booked: u32,
    delta: i64,
    requested: u32,
) -> Result<(), Error> {
    debug!(
        session_id = %session.id,
        capacity = hall.capacity,
        booked,
        delta,
        "admission check"
    );
    match ledger::admit_delta(hall.capacity, booked, delta) {
        Admission::Admitted => Ok(()),
        Admission::Rejected { remaining } => {
            warn!(
                session_id = %session.id,
                requested,
                remaining,
                "capacity exceeded"
            );
            Err(Error::CapacityExceeded {
                session_id: session.id,
                requested,
                remaining,
            })
        }
    }
}
