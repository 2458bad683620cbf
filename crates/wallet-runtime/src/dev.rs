//! Development implementations of the outbound ports.
//!
//! These stand in for the real approval UI and ledger RPC while wiring and
//! testing the protocol.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::info;
use wallet_consent::{ApprovalSurface, ConsentCoordinator, ConsentRequest, Decision, SurfaceError};
use wallet_router::{ExecutionReceipt, ExecutorError, LedgerExecutor};
use wallet_types::encoding;

/// Approval surface that logs the prompt and resolves with a fixed decision
/// after a short delay.
pub struct AutoApprovalSurface {
    approve: bool,
    delay: Duration,
    coordinator: Mutex<Weak<ConsentCoordinator>>,
}

impl AutoApprovalSurface {
    #[must_use]
    pub fn new(approve: bool) -> Arc<Self> {
        Arc::new(Self {
            approve,
            delay: Duration::from_millis(10),
            coordinator: Mutex::new(Weak::new()),
        })
    }

    /// Wire the coordinator the decisions are delivered to.
    pub fn attach(&self, coordinator: &Arc<ConsentCoordinator>) {
        *self.coordinator.lock() = Arc::downgrade(coordinator);
    }
}

#[async_trait]
impl ApprovalSurface for AutoApprovalSurface {
    async fn present(&self, request: ConsentRequest) -> Result<(), SurfaceError> {
        info!(origin = %request.origin, approve = self.approve, "Consent prompt (auto surface)");
        let Some(coordinator) = self.coordinator.lock().upgrade() else {
            return Err(SurfaceError::Unavailable("no coordinator attached".into()));
        };
        let approved = self.approve;
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            coordinator.resolve(&request.origin, Decision { approved });
        });
        Ok(())
    }
}

/// Executor that acknowledges every submission with a deterministic receipt.
pub struct StaticLedgerExecutor;

#[async_trait]
impl LedgerExecutor for StaticLedgerExecutor {
    async fn execute(
        &self,
        transaction: &[u8],
        signature: &[u8],
    ) -> Result<ExecutionReceipt, ExecutorError> {
        let tag = signature.iter().take(8).copied().collect::<Vec<u8>>();
        info!(
            transaction_bytes = transaction.len(),
            "Transaction accepted (static executor)"
        );
        Ok(ExecutionReceipt {
            digest: format!("0x{}", hex::encode(tag)),
            effects: encoding::encode(b"executed"),
        })
    }
}
