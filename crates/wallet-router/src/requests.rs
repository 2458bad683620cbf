//! In-flight request tracking.
//!
//! The message channel offers no delivery guarantees; a page or relay retry
//! can deliver the same envelope twice. The tracker records every correlation
//! id the router has accepted so each id is processed at most once, and keeps
//! resolved entries long enough to absorb late duplicates.

use crate::correlation::CorrelationId;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Lifecycle of one accepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState {
    /// Accepted, dispatch in progress.
    Received,
    /// Parked on a pending consent decision.
    AwaitingConsent,
    /// Finished with a reply sent.
    Resolved { success: bool, at: Instant },
}

/// At-most-once admission gate keyed by correlation id.
#[derive(Debug, Default)]
pub struct RequestTracker {
    entries: DashMap<CorrelationId, RequestState>,
}

impl RequestTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a request id. Returns `false` when the id was already seen, in
    /// which case the envelope must be dropped without a reply.
    pub fn begin(&self, id: CorrelationId) -> bool {
        let mut duplicate = false;
        self.entries
            .entry(id)
            .and_modify(|_| duplicate = true)
            .or_insert(RequestState::Received);
        if duplicate {
            debug!(request_id = %id, "Duplicate request id, dropping");
        }
        !duplicate
    }

    /// Mark the request as blocked on a consent decision.
    pub fn awaiting_consent(&self, id: CorrelationId) {
        if let Some(mut entry) = self.entries.get_mut(&id) {
            *entry = RequestState::AwaitingConsent;
        }
    }

    /// Mark the request finished.
    pub fn resolve(&self, id: CorrelationId, success: bool) {
        if let Some(mut entry) = self.entries.get_mut(&id) {
            *entry = RequestState::Resolved {
                success,
                at: Instant::now(),
            };
        }
    }

    /// Whether the id has finished processing.
    #[must_use]
    pub fn is_resolved(&self, id: &CorrelationId) -> bool {
        matches!(
            self.entries.get(id).map(|e| e.value().clone()),
            Some(RequestState::Resolved { .. })
        )
    }

    /// Current state of an id, if tracked.
    #[must_use]
    pub fn state(&self, id: &CorrelationId) -> Option<RequestState> {
        self.entries.get(id).map(|e| e.value().clone())
    }

    /// Number of tracked ids, resolved included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop resolved entries older than `max_age`. In-flight entries are
    /// never pruned. Returns how many were removed.
    pub fn prune_resolved(&self, max_age: Duration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, state| match state {
            RequestState::Resolved { at, .. } => at.elapsed() < max_age,
            _ => true,
        });
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(removed, "Pruned resolved request entries");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_id_refused() {
        let tracker = RequestTracker::new();
        let id = CorrelationId::new();
        assert!(tracker.begin(id));
        assert!(!tracker.begin(id));
        assert!(!tracker.begin(id));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_duplicate_refused_after_resolution() {
        let tracker = RequestTracker::new();
        let id = CorrelationId::new();
        assert!(tracker.begin(id));
        tracker.resolve(id, true);
        assert!(tracker.is_resolved(&id));
        assert!(!tracker.begin(id));
    }

    #[test]
    fn test_state_transitions() {
        let tracker = RequestTracker::new();
        let id = CorrelationId::new();
        tracker.begin(id);
        assert_eq!(tracker.state(&id), Some(RequestState::Received));
        tracker.awaiting_consent(id);
        assert_eq!(tracker.state(&id), Some(RequestState::AwaitingConsent));
        tracker.resolve(id, false);
        assert!(matches!(
            tracker.state(&id),
            Some(RequestState::Resolved { success: false, .. })
        ));
    }

    #[test]
    fn test_prune_keeps_inflight() {
        let tracker = RequestTracker::new();
        let inflight = CorrelationId::new();
        let finished = CorrelationId::new();
        tracker.begin(inflight);
        tracker.begin(finished);
        tracker.resolve(finished, true);

        assert_eq!(tracker.prune_resolved(Duration::ZERO), 1);
        assert_eq!(tracker.state(&inflight), Some(RequestState::Received));
        assert!(tracker.state(&finished).is_none());
    }

    #[test]
    fn test_prune_respects_age() {
        let tracker = RequestTracker::new();
        let id = CorrelationId::new();
        tracker.begin(id);
        tracker.resolve(id, true);
        assert_eq!(tracker.prune_resolved(Duration::from_secs(3600)), 0);
        assert!(tracker.is_resolved(&id));
    }
}
