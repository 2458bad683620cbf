//! Shared fixtures for the integration suites.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use wallet_consent::{ApprovalSurface, ConsentCoordinator, ConsentRequest, Decision, SurfaceError};
use wallet_runtime::{BackgroundContext, StaticLedgerExecutor, WalletConfig};
use wallet_types::Origin;

/// A started background context wired to the given surface.
#[must_use]
pub fn background(surface: &Arc<ScriptedSurface>) -> BackgroundContext {
    let context = BackgroundContext::new(
        WalletConfig::default(),
        Arc::clone(surface) as Arc<dyn ApprovalSurface>,
        Arc::new(StaticLedgerExecutor),
    );
    surface.attach(&context.consent());
    context.start();
    context
}

/// Approval surface with per-origin scripted decisions and prompt counting.
///
/// Every presented prompt is recorded, then resolved through the attached
/// coordinator after a short delay, mimicking a user clicking through the
/// real surface.
pub struct ScriptedSurface {
    default_approve: bool,
    decisions: Mutex<HashMap<Origin, bool>>,
    prompts: Mutex<HashMap<Origin, usize>>,
    coordinator: Mutex<Weak<ConsentCoordinator>>,
}

impl ScriptedSurface {
    #[must_use]
    pub fn approving() -> Arc<Self> {
        Self::new(true)
    }

    #[must_use]
    pub fn denying() -> Arc<Self> {
        Self::new(false)
    }

    fn new(default_approve: bool) -> Arc<Self> {
        Arc::new(Self {
            default_approve,
            decisions: Mutex::new(HashMap::new()),
            prompts: Mutex::new(HashMap::new()),
            coordinator: Mutex::new(Weak::new()),
        })
    }

    /// Override the decision for one origin.
    pub fn script(&self, origin: &Origin, approve: bool) {
        self.decisions.lock().insert(origin.clone(), approve);
    }

    /// Wire the coordinator decisions are delivered to.
    pub fn attach(&self, coordinator: &Arc<ConsentCoordinator>) {
        *self.coordinator.lock() = Arc::downgrade(coordinator);
    }

    /// Number of prompts presented for `origin`.
    #[must_use]
    pub fn prompt_count(&self, origin: &Origin) -> usize {
        self.prompts.lock().get(origin).copied().unwrap_or(0)
    }

    /// Prompts presented across all origins.
    #[must_use]
    pub fn total_prompts(&self) -> usize {
        self.prompts.lock().values().sum()
    }
}

#[async_trait]
impl ApprovalSurface for ScriptedSurface {
    async fn present(&self, request: ConsentRequest) -> Result<(), SurfaceError> {
        *self
            .prompts
            .lock()
            .entry(request.origin.clone())
            .or_insert(0) += 1;

        let Some(coordinator) = self.coordinator.lock().upgrade() else {
            return Err(SurfaceError::Unavailable("no coordinator attached".into()));
        };
        let approved = self
            .decisions
            .lock()
            .get(&request.origin)
            .copied()
            .unwrap_or(self.default_approve);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            coordinator.resolve(&request.origin, Decision { approved });
        });
        Ok(())
    }
}
