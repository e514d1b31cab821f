//! Reconciliation session
//!
//! Drives one chat turn at a time against the generation service:
//! `Idle -> AwaitingResponse -> Idle`. A turn appends the user's message,
//! sends the active day plus the request, extracts an intent-scoped patch
//! from the reply and appends it as an assistant message. Patches are applied
//! later, by message id, at most once each.

mod core;
mod error;

pub use core::{APOLOGY, ApplyOutcome, ReconciliationSession, SessionState, TurnTicket};
pub use error::SessionError;
