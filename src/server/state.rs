//! Application state for the booking HTTP server.

use crate::services::{BookingService, SessionService};
use crate::store::Store;
use std::sync::Arc;

/// Shared state cloned (cheaply, via `Arc`) into every handler.
///
/// Both services operate on the same entity store, so every handler sees one
/// consistent record set and one per-session lock table.
#[derive(Clone)]
pub struct AppState {
    /// Session and hall operations
    pub sessions: Arc<SessionService>,
    /// Booking operations
    pub bookings: Arc<BookingService>,
}

impl AppState {
    /// Build the state over one shared store
    #[must_use]
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            sessions: Arc::new(SessionService::new(Arc::clone(&store))),
            bookings: Arc::new(BookingService::new(store)),
        }
    }
}
