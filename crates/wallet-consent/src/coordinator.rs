//! Single-flight consent coordination.

use crate::session::{Decision, Outcome, Session};
use crate::surface::{ApprovalSurface, ConsentRequest, SurfaceError};
use crate::ConsentDecisionMessage;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use wallet_types::Origin;

/// Errors a consent round can end with.
///
/// A user declining is NOT an error; it is a [`Decision`] with
/// `approved: false`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConsentError {
    /// The approval surface could not be presented.
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Per-origin single-flight consent gate.
///
/// For a given origin only one session is live at a time: the first request
/// creates it and presents the approval surface, concurrent requests attach
/// to the same pending decision, and resolution removes the session so the
/// next request starts fresh.
pub struct ConsentCoordinator {
    sessions: DashMap<Origin, Arc<Session>>,
    surface: Arc<dyn ApprovalSurface>,
    decision_timeout: Duration,
}

impl ConsentCoordinator {
    pub fn new(surface: Arc<dyn ApprovalSurface>, decision_timeout: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            surface,
            decision_timeout,
        }
    }

    /// Obtain the user's decision for `origin`, creating a session or
    /// attaching to the pending one.
    ///
    /// Resolves to `Decision { approved: false }` if the surface is dismissed
    /// or the bounded wait elapses; resolves to `Err` only for system
    /// failures (surface unavailable).
    pub async fn request_decision(&self, origin: &Origin) -> Result<Decision, ConsentError> {
        let (session, is_creator) = match self.sessions.entry(origin.clone()) {
            Entry::Occupied(entry) => (Arc::clone(entry.get()), false),
            Entry::Vacant(entry) => {
                let session = Arc::new(Session::new(origin.clone()));
                entry.insert(Arc::clone(&session));
                (session, true)
            }
        };

        let mut outcome_rx = session.watch();

        if is_creator {
            debug!(origin = %origin, "Consent session created, presenting approval surface");
            let request = ConsentRequest {
                origin: origin.clone(),
            };
            if let Err(e) = self.surface.present(request).await {
                warn!(origin = %origin, error = %e, "Approval surface unavailable");
                if session.fail(e.to_string()) {
                    self.remove(origin, &session);
                }
            }
        } else {
            debug!(origin = %origin, "Attached to pending consent session");
        }

        let outcome = loop {
            let current = outcome_rx.borrow().clone();
            match current {
                Outcome::Pending => {
                    match tokio::time::timeout(self.decision_timeout, outcome_rx.changed()).await {
                        Ok(Ok(())) => continue,
                        Ok(Err(_)) => {
                            // Session dropped without settling; treat as a
                            // torn-down surface.
                            break Outcome::Failed("consent session dropped".into());
                        }
                        Err(_) => {
                            warn!(origin = %origin, "Consent decision timed out, treating as rejection");
                            if session.expire() {
                                self.remove(origin, &session);
                            }
                            continue;
                        }
                    }
                }
                settled => break settled,
            }
        };

        match outcome {
            Outcome::Decided(decision) => Ok(decision),
            Outcome::Failed(message) => Err(SurfaceError::Unavailable(message).into()),
            Outcome::Pending => unreachable!("loop exits only on settled outcome"),
        }
    }

    /// Deliver the user's decision from the approval surface.
    ///
    /// Returns whether a pending session was settled by this call; duplicate
    /// deliveries and decisions for unknown origins are ignored.
    pub fn resolve(&self, origin: &Origin, decision: Decision) -> bool {
        let Some(session) = self.sessions.get(origin).map(|e| Arc::clone(e.value())) else {
            warn!(origin = %origin, "Decision for origin with no pending session");
            return false;
        };
        let settled = session.resolve(decision);
        if settled {
            self.remove(origin, &session);
        }
        settled
    }

    /// Deliver a wire-form decision message.
    pub fn handle_decision_message(&self, origin: &Origin, message: ConsentDecisionMessage) -> bool {
        self.resolve(
            origin,
            Decision {
                approved: message.approved,
            },
        )
    }

    /// The approval surface closed without an explicit choice; implicit
    /// rejection for exactly this origin's session.
    pub fn dismiss(&self, origin: &Origin) -> bool {
        debug!(origin = %origin, "Approval surface dismissed without decision");
        self.resolve(origin, Decision { approved: false })
    }

    /// Number of origins with a pending session.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.sessions.len()
    }

    /// Whether `origin` has a pending session.
    #[must_use]
    pub fn is_pending(&self, origin: &Origin) -> bool {
        self.sessions.contains_key(origin)
    }

    fn remove(&self, origin: &Origin, session: &Arc<Session>) {
        self.sessions
            .remove_if(origin, |_, current| Arc::ptr_eq(current, session));
    }
}
