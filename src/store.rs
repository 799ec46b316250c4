//! Entity store: authoritative in-process records for halls, sessions, and
//! bookings, plus the per-session lock table that serializes
//! capacity-affecting writers.
//!
//! # Consistency model
//!
//! All records live behind one `RwLock`. Every mutation is a single write-lock
//! critical section, so concurrent readers always observe a committed
//! snapshot: a booking is never visible mid-move with a dangling or duplicated
//! session reference, and a cascade delete removes the session and its
//! bookings in the same section.
//!
//! The data lock alone does not serialize check-then-commit sequences, so the
//! store also hands out one async mutex per session. Ticket-count-increasing
//! operations hold the session's mutex across their admission check and
//! commit; a move holds both session mutexes, always acquired in ascending id
//! order so two opposite moves cannot deadlock. Lock waits are bounded; a
//! timeout surfaces as [`Error::Conflict`].

use crate::error::Error;
use crate::types::{Booking, BookingId, Hall, HallId, Session, SessionId, SessionView};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// Default bound on a session lock wait.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Exclusive hold on one session's capacity-affecting operations.
///
/// Dropping the guard releases the session for the next writer.
#[derive(Debug)]
pub struct SessionGuard {
    _permit: OwnedMutexGuard<()>,
}

#[derive(Debug, Default)]
struct Records {
    halls: HashMap<HallId, Hall>,
    sessions: HashMap<SessionId, Session>,
    bookings: HashMap<BookingId, Booking>,
}

impl Records {
    /// `(bookings_count, booked_tickets)` for one session.
    fn totals(&self, session_id: SessionId) -> (u32, u32) {
        let mut count = 0u32;
        let mut tickets = 0u32;
        for booking in self.bookings.values() {
            if booking.session_id == session_id {
                count += 1;
                tickets = tickets.saturating_add(booking.tickets);
            }
        }
        (count, tickets)
    }

    fn view(&self, session: &Session) -> Option<SessionView> {
        let hall = self.halls.get(&session.hall_id)?.clone();
        let (count, tickets) = self.totals(session.id);
        Some(SessionView::assemble(session.clone(), hall, count, tickets))
    }
}

/// In-process entity store for the booking core.
#[derive(Debug)]
pub struct Store {
    records: RwLock<Records>,
    session_locks: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
    lock_timeout: Duration,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(DEFAULT_LOCK_TIMEOUT)
    }
}

impl Store {
    /// Creates an empty store with the given lock-wait bound
    #[must_use]
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            records: RwLock::new(Records::default()),
            session_locks: Mutex::new(HashMap::new()),
            lock_timeout,
        }
    }

    // ------------------------------------------------------------------
    // Session locks
    // ------------------------------------------------------------------

    async fn lease(&self, id: SessionId) -> Arc<Mutex<()>> {
        let mut table = self.session_locks.lock().await;
        Arc::clone(table.entry(id).or_default())
    }

    async fn acquire(&self, id: SessionId) -> Result<SessionGuard, Error> {
        let lease = self.lease(id).await;
        let permit = tokio::time::timeout(self.lock_timeout, lease.lock_owned())
            .await
            .map_err(|_| Error::Conflict(format!("timed out waiting for session {id} lock")))?;
        Ok(SessionGuard { _permit: permit })
    }

    /// Acquire the writer lock for one session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] when the wait exceeds the configured bound.
    pub async fn lock_session(&self, id: SessionId) -> Result<SessionGuard, Error> {
        self.acquire(id).await
    }

    /// Acquire the writer locks for two distinct sessions.
    ///
    /// Locks are always taken in ascending id order, regardless of argument
    /// order, so concurrent moves in opposite directions cannot deadlock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTarget`] when both ids are the same and
    /// [`Error::Conflict`] when a wait exceeds the configured bound.
    pub async fn lock_session_pair(
        &self,
        a: SessionId,
        b: SessionId,
    ) -> Result<(SessionGuard, SessionGuard), Error> {
        if a == b {
            return Err(Error::InvalidTarget(format!(
                "cannot lock session {a} against itself"
            )));
        }
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        let first = self.acquire(low).await?;
        let second = self.acquire(high).await?;
        Ok((first, second))
    }

    // ------------------------------------------------------------------
    // Halls
    // ------------------------------------------------------------------

    /// Insert a hall. Halls are provisioned outside the booking core and are
    /// read-only afterwards.
    pub async fn insert_hall(&self, hall: Hall) {
        self.records.write().await.halls.insert(hall.id, hall);
    }

    /// Look up a hall by id
    pub async fn hall(&self, id: HallId) -> Option<Hall> {
        self.records.read().await.halls.get(&id).cloned()
    }

    /// All halls, ordered by name
    pub async fn halls(&self) -> Vec<Hall> {
        let records = self.records.read().await;
        let mut halls: Vec<Hall> = records.halls.values().cloned().collect();
        halls.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        halls
    }

    // ------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------

    /// Insert a new session
    pub async fn insert_session(&self, session: Session) {
        self.records
            .write()
            .await
            .sessions
            .insert(session.id, session);
    }

    /// Look up a session by id
    pub async fn session(&self, id: SessionId) -> Option<Session> {
        self.records.read().await.sessions.get(&id).cloned()
    }

    /// Replace an existing session record. Returns `false` when the session
    /// does not exist (nothing is inserted in that case).
    pub async fn replace_session(&self, session: Session) -> bool {
        let mut records = self.records.write().await;
        match records.sessions.get_mut(&session.id) {
            Some(slot) => {
                *slot = session;
                true
            }
            None => false,
        }
    }

    /// Remove a session and cascade-delete its bookings in the same critical
    /// section. Returns the removed session and bookings, or `None` when the
    /// session does not exist.
    pub async fn remove_session(&self, id: SessionId) -> Option<(Session, Vec<Booking>)> {
        let removed = {
            let mut records = self.records.write().await;
            let session = records.sessions.remove(&id)?;
            let orphaned: Vec<BookingId> = records
                .bookings
                .values()
                .filter(|b| b.session_id == id)
                .map(|b| b.id)
                .collect();
            let mut bookings = Vec::with_capacity(orphaned.len());
            for booking_id in orphaned {
                if let Some(booking) = records.bookings.remove(&booking_id) {
                    bookings.push(booking);
                }
            }
            Some((session, bookings))
        };
        if removed.is_some() {
            // The lease table entry is no longer needed; late waiters on the
            // old lease fail their existence re-check.
            self.session_locks.lock().await.remove(&id);
        }
        removed
    }

    /// One session with its hall and read-time aggregates
    pub async fn session_view(&self, id: SessionId) -> Option<SessionView> {
        let records = self.records.read().await;
        let session = records.sessions.get(&id)?;
        records.view(session)
    }

    /// All sessions with their halls and aggregates, computed in a single
    /// consistent snapshot, ordered by start time
    pub async fn session_views(&self) -> Vec<SessionView> {
        let records = self.records.read().await;
        let mut views: Vec<SessionView> = records
            .sessions
            .values()
            .filter_map(|session| records.view(session))
            .collect();
        views.sort_by(|a, b| a.starts_at.cmp(&b.starts_at).then(a.id.cmp(&b.id)));
        views
    }

    /// `(bookings_count, booked_tickets)` for one session
    pub async fn session_totals(&self, id: SessionId) -> (u32, u32) {
        self.records.read().await.totals(id)
    }

    // ------------------------------------------------------------------
    // Bookings
    // ------------------------------------------------------------------

    /// Insert a new booking
    pub async fn insert_booking(&self, booking: Booking) {
        self.records
            .write()
            .await
            .bookings
            .insert(booking.id, booking);
    }

    /// Look up a booking by id
    pub async fn booking(&self, id: BookingId) -> Option<Booking> {
        self.records.read().await.bookings.get(&id).cloned()
    }

    /// All bookings of one session, ordered by holder name
    pub async fn bookings_for(&self, session_id: SessionId) -> Vec<Booking> {
        let records = self.records.read().await;
        let mut bookings: Vec<Booking> = records
            .bookings
            .values()
            .filter(|b| b.session_id == session_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| {
            a.full_name
                .as_str()
                .cmp(b.full_name.as_str())
                .then(a.id.cmp(&b.id))
        });
        bookings
    }

    /// Replace an existing booking record. Returns `false` when the booking
    /// does not exist (nothing is inserted in that case).
    pub async fn replace_booking(&self, booking: Booking) -> bool {
        let mut records = self.records.write().await;
        match records.bookings.get_mut(&booking.id) {
            Some(slot) => {
                *slot = booking;
                true
            }
            None => false,
        }
    }

    /// Remove a booking. Returns the removed record, or `None` when missing.
    pub async fn remove_booking(&self, id: BookingId) -> Option<Booking> {
        self.records.write().await.bookings.remove(&id)
    }

    /// Reassign a booking to another session in one critical section.
    ///
    /// Readers either see the booking fully attached to its old session or
    /// fully attached to the new one. Returns the updated booking, or `None`
    /// when it does not exist.
    pub async fn reassign_booking(
        &self,
        id: BookingId,
        target: SessionId,
    ) -> Option<Booking> {
        let mut records = self.records.write().await;
        let booking = records.bookings.get_mut(&id)?;
        booking.session_id = target;
        Some(booking.clone())
    }
}
