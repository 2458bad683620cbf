//! # Wallet Router - Background Request Routing
//!
//! The privileged background context's half of the protocol. Every capability
//! invocation a page makes arrives here as a [`RequestEnvelope`]; the router
//! correlates it to a consent decision, dispatches it to the right
//! collaborator, and produces exactly one [`ReplyEnvelope`].
//!
//! ## Guarantees
//!
//! - **At-most-once per request id**: duplicate envelopes with an id already
//!   seen are dropped, never reprocessed.
//! - **Origin isolation**: one origin's connection state and accounts are
//!   never visible to another origin's requests.
//! - **Connect-before-sign**: sign/execute requests from an origin with no
//!   prior approved connect resolve to `NotConnected`.
//! - **Typed failures**: a surface that cannot open is a transport-class
//!   error, distinct from the user declining.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod correlation;
pub mod envelope;
pub mod ports;
pub mod requests;
pub mod router;

// Re-export main types
pub use correlation::CorrelationId;
pub use envelope::{ReplyData, ReplyEnvelope, RequestEnvelope, RequestPayload, MESSAGE_TARGET};
pub use ports::{ExecutionReceipt, ExecutorError, LedgerExecutor};
pub use requests::{RequestState, RequestTracker};
pub use router::RequestRouter;
