//! Outbound port for transaction execution.
//!
//! The router signs transactions itself but delegates submission to the
//! ledger behind this trait, so routing logic stays independent of any RPC
//! client.

use async_trait::async_trait;
use thiserror::Error;

/// What the ledger reports back for an executed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReceipt {
    /// Transaction digest assigned by the ledger.
    pub digest: String,
    /// Serialized transaction effects, base64.
    pub effects: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutorError {
    /// The ledger endpoint could not be reached.
    #[error("ledger unreachable: {0}")]
    Unreachable(String),

    /// The ledger accepted the submission but reported failure.
    #[error("execution failed: {0}")]
    Rejected(String),
}

/// Submits signed transactions for execution.
#[async_trait]
pub trait LedgerExecutor: Send + Sync {
    /// Submit `transaction` with `signature` (both raw bytes) and wait for
    /// the execution receipt.
    async fn execute(
        &self,
        transaction: &[u8],
        signature: &[u8],
    ) -> Result<ExecutionReceipt, ExecutorError>;
}
