//! Subscription registry and delivery.

use crate::events::{EventName, WalletEvent};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;

/// A registered event listener.
pub type Listener = Arc<dyn Fn(&WalletEvent) + Send + Sync>;

struct BusInner {
    /// Listener tables keyed by event name; inner table keyed by handle id.
    /// Ids are monotonic, so iteration follows registration order.
    listeners: RwLock<HashMap<EventName, BTreeMap<u64, Listener>>>,
    /// Next handle id.
    next_id: AtomicU64,
    /// Total events emitted.
    events_emitted: AtomicU64,
}

/// Per-wallet-instance event bus.
///
/// Cheap to clone; clones share the same subscription registry.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BusInner {
                listeners: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                events_emitted: AtomicU64::new(0),
            }),
        }
    }

    /// Register a listener; the returned handle unsubscribes it.
    #[must_use]
    pub fn on(&self, event: EventName, listener: impl Fn(&WalletEvent) + Send + Sync + 'static) -> ListenerHandle {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .write()
            .entry(event)
            .or_default()
            .insert(id, Arc::new(listener));

        debug!(event = %event, id, "Listener registered");

        ListenerHandle {
            bus: Arc::downgrade(&self.inner),
            event,
            id,
            active: AtomicBool::new(true),
        }
    }

    /// Deliver an event to a frozen snapshot of the current listeners.
    ///
    /// Returns the number of listeners that received the event. Listeners
    /// registered mid-delivery are excluded by the snapshot; listeners
    /// unsubscribed mid-delivery are skipped by a membership re-check.
    pub fn emit(&self, event: &WalletEvent) -> usize {
        let name = event.name();
        let snapshot: Vec<(u64, Listener)> = {
            let listeners = self.inner.listeners.read();
            listeners
                .get(&name)
                .map(|table| table.iter().map(|(id, l)| (*id, Arc::clone(l))).collect())
                .unwrap_or_default()
        };

        self.inner.events_emitted.fetch_add(1, Ordering::Relaxed);

        let mut delivered = 0;
        for (id, listener) in snapshot {
            let still_registered = self
                .inner
                .listeners
                .read()
                .get(&name)
                .is_some_and(|table| table.contains_key(&id));
            if !still_registered {
                continue;
            }
            listener(event);
            delivered += 1;
        }

        debug!(event = %name, delivered, "Event emitted");
        delivered
    }

    /// Number of listeners currently registered for an event.
    #[must_use]
    pub fn listener_count(&self, event: EventName) -> usize {
        self.inner
            .listeners
            .read()
            .get(&event)
            .map_or(0, BTreeMap::len)
    }

    /// Total events emitted on this bus.
    #[must_use]
    pub fn events_emitted(&self) -> u64 {
        self.inner.events_emitted.load(Ordering::Relaxed)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle returned from [`EventBus::on`].
///
/// `unsubscribe` is idempotent: the second and later calls are no-ops. The
/// handle holds only a weak reference, so it never keeps a dropped bus alive.
pub struct ListenerHandle {
    bus: Weak<BusInner>,
    event: EventName,
    id: u64,
    active: AtomicBool,
}

impl ListenerHandle {
    /// Remove the listener from the bus. Calling twice is a no-op.
    pub fn unsubscribe(&self) {
        if !self.active.swap(false, Ordering::AcqRel) {
            return;
        }
        let Some(bus) = self.bus.upgrade() else {
            return;
        };
        let mut listeners = bus.listeners.write();
        if let Some(table) = listeners.get_mut(&self.event) {
            table.remove(&self.id);
            if table.is_empty() {
                listeners.remove(&self.event);
            }
        }
        debug!(event = %self.event, id = self.id, "Listener unsubscribed");
    }
}
