//! Consent session state machine.
//!
//! A session is the lifecycle of one user approval decision for one origin.
//! The resolve-once transition is guarded explicitly rather than trusting a
//! bare promise resolver.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;
use wallet_types::Origin;

/// Resolution state of a consent session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Awaiting the user's decision.
    Pending,
    /// User approved the connection.
    Approved,
    /// User declined, or the surface was dismissed.
    Rejected,
    /// The bounded wait elapsed without a decision.
    Expired,
}

/// The user's decision for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub approved: bool,
}

/// Wire form of the decision sent from the approval surface back to the
/// router: `{"type": "connect_response", "approved": true}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "type", rename = "connect_response")]
pub struct ConsentDecisionMessage {
    pub approved: bool,
}

/// What session waiters observe.
#[derive(Debug, Clone)]
pub(crate) enum Outcome {
    Pending,
    Decided(Decision),
    /// The surface could not be presented; message carries the cause.
    Failed(String),
}

pub(crate) struct Session {
    origin: Origin,
    state: Mutex<SessionState>,
    outcome_tx: watch::Sender<Outcome>,
}

impl Session {
    pub(crate) fn new(origin: Origin) -> Self {
        let (outcome_tx, _) = watch::channel(Outcome::Pending);
        Self {
            origin,
            state: Mutex::new(SessionState::Pending),
            outcome_tx,
        }
    }

    pub(crate) fn state(&self) -> SessionState {
        *self.state.lock()
    }

    pub(crate) fn watch(&self) -> watch::Receiver<Outcome> {
        self.outcome_tx.subscribe()
    }

    /// Resolve with the user's decision. Only the first call on a pending
    /// session wins; every later call is ignored.
    pub(crate) fn resolve(&self, decision: Decision) -> bool {
        let next = if decision.approved {
            SessionState::Approved
        } else {
            SessionState::Rejected
        };
        self.finish(next, Outcome::Decided(decision))
    }

    /// Expire a session whose bounded wait elapsed.
    pub(crate) fn expire(&self) -> bool {
        self.finish(
            SessionState::Expired,
            Outcome::Decided(Decision { approved: false }),
        )
    }

    /// Mark the session failed because the surface could not be presented.
    pub(crate) fn fail(&self, message: String) -> bool {
        self.finish(SessionState::Rejected, Outcome::Failed(message))
    }

    fn finish(&self, next: SessionState, outcome: Outcome) -> bool {
        let mut state = self.state.lock();
        if *state != SessionState::Pending {
            debug!(origin = %self.origin, current = ?*state, "Ignoring resolve on settled session");
            return false;
        }
        *state = next;
        drop(state);

        // Waiters may already be gone; that is not an error.
        let _ = self.outcome_tx.send(outcome);
        debug!(origin = %self.origin, state = ?next, "Consent session settled");
        true
    }
}
