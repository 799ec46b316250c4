//! Service layer: orchestrates entity-store access through the capacity
//! ledger, owning transaction boundaries for every mutation.

pub mod bookings;
pub mod sessions;

pub use bookings::BookingService;
pub use sessions::SessionService;

use crate::error::Error;

/// Attempts a retried operation makes before surfacing [`Error::Conflict`].
///
/// Applies to operations that have to peek a booking's current session before
/// taking its lock: a concurrent move can invalidate the peek, in which case
/// the operation re-reads and retries.
pub(crate) const MAX_LOCK_RETRIES: usize = 3;

/// Validate and narrow a requested ticket count.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for counts below 1 or beyond `u32::MAX`.
pub(crate) fn validate_tickets(tickets: i64) -> Result<u32, Error> {
    if tickets < 1 {
        return Err(Error::InvalidInput(format!(
            "tickets must be a positive integer, got {tickets}"
        )));
    }
    u32::try_from(tickets)
        .map_err(|_| Error::InvalidInput(format!("tickets count {tickets} is out of range")))
}
