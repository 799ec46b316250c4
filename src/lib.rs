//! Cinema session scheduling and seat-booking bookkeeping.
//!
//! This crate is the booking/session capacity ledger behind a cashier-facing
//! cinema frontend: CRUD for screening sessions in halls and for ticket
//! bookings against those sessions, with two hard guarantees:
//!
//! - **Capacity invariant**: the booked tickets of a session never exceed its
//!   hall's capacity after any committed mutation, even when admissions race.
//! - **Atomic move**: transferring a booking between sessions succeeds or
//!   fails as a unit; no reader ever observes it counted in neither or both.
//!
//! # Architecture
//!
//! ```text
//!  external caller
//!        │
//!        ▼
//!  ┌───────────────┐   HTTP boundary (axum): request/response mapping only
//!  │     api       │
//!  └───────────────┘
//!        │
//!        ▼
//!  ┌───────────────┐   transaction boundaries, validation, retry policy
//!  │   services    │
//!  └───────────────┘
//!     │         │
//!     ▼         ▼
//!  ┌────────┐ ┌────────┐
//!  │ ledger │ │ store  │   pure admission decision / records + session locks
//!  └────────┘ └────────┘
//! ```
//!
//! Capacity-affecting writers are serialized per session; a move takes both
//! session locks in ascending id order. Aggregates (`bookingsCount`,
//! `bookedTickets`) are read-time projections over the live booking set, so
//! they cannot drift from the source of truth.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod ledger;
pub mod server;
pub mod services;
pub mod store;
pub mod types;

pub use config::Config;
pub use error::Error;
pub use server::{build_router, AppState};
pub use services::{BookingService, SessionService};
pub use store::Store;
pub use types::{Booking, BookingId, Hall, HallId, HolderName, Session, SessionId, SessionView};
