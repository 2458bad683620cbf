//! # Wallet Consent - User Approval Coordination
//!
//! The consent coordinator is the single-flight state machine between the
//! request router and the user-facing approval surface.
//!
//! ## Guarantees
//!
//! - **At most one pending session per origin.** Concurrent requests for the
//!   same origin attach to the one pending decision; a single prompt serves
//!   them all.
//! - **Resolve-once.** The decision enters the session exactly once; later
//!   resolve calls are ignored (a double-submitting approval UI cannot
//!   double-resolve).
//! - **Bounded wait.** A surface dismissed without a decision becomes a
//!   rejection after the configured timeout; sessions never hang forever.
//! - **Isolation.** Resolving or expiring one origin's session never touches
//!   another origin's.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod coordinator;
pub mod session;
pub mod surface;

// Re-export main types
pub use coordinator::{ConsentCoordinator, ConsentError};
pub use session::{ConsentDecisionMessage, Decision, SessionState};
pub use surface::{ApprovalSurface, ConsentRequest, SurfaceError};

use std::time::Duration;

/// Default bound on how long a pending session may wait for a decision.
pub const DEFAULT_DECISION_TIMEOUT: Duration = Duration::from_secs(120);
