//! Capacity ledger: the pure admission decision for ticket-count changes.
//!
//! The ledger is the single place that decides whether a proposed delta of
//! booked tickets fits a hall's capacity. It performs no I/O and mutates
//! nothing; the services consult it under the session's lock and only then
//! commit to the entity store.
//!
//! The same check covers every capacity-affecting operation:
//! - creating a booking (`delta = +tickets`)
//! - changing a booking's ticket count (`delta = new - old`)
//! - the destination side of a move (`delta = +tickets` against the target's
//!   current sum, which does not yet include the moving booking)
//! - re-validating a session's hall change (`delta = 0` against the new
//!   hall's capacity)

/// Outcome of an admission check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    /// The delta fits; the caller may commit.
    Admitted,
    /// The delta does not fit.
    Rejected {
        /// Seats still free before the rejected delta (`capacity - existing`).
        remaining: u32,
    },
}

impl Admission {
    /// Whether the decision admits the delta
    #[must_use]
    pub const fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted)
    }
}

/// Decide whether a ticket delta fits a hall's capacity.
///
/// Admits iff `0 <= existing + delta <= capacity`. A delta that exactly fills
/// the remaining capacity is admitted. Negative deltas (freeing seats) are
/// always admitted as long as the projected sum stays non-negative.
///
/// Zero and negative ticket counts never reach the ledger; they are rejected
/// by input validation in the services.
#[must_use]
pub fn admit_delta(capacity: u32, existing: u32, delta: i64) -> Admission {
    let projected = i64::from(existing) + delta;
    if (0..=i64::from(capacity)).contains(&projected) {
        Admission::Admitted
    } else {
        Admission::Rejected {
            remaining: capacity.saturating_sub(existing),
        }
    }
}
