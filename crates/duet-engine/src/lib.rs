//! Session-facing services for the Duet matchmaking demo.
//!
//! Everything here operates through an explicit [`Session`] context over a
//! [`duet_core::store::DocumentStore`] backend — there is no process-wide
//! "current user". The engine owns the persisted rating ledger, the
//! conversation store (with per-thread write serialization) and the
//! responder simulator that produces delayed counterparty replies.

pub mod conversations;
pub mod keys;
pub mod responder;
pub mod session;

pub use conversations::Conversations;
pub use responder::{Responder, ResponderConfig};
pub use session::Session;
