//! # Error Taxonomy
//!
//! Every rejected operation in the wallet core carries a distinguishable
//! reason. The taxonomy separates:
//!
//! - **User decisions** (`UserRejected`) - not exceptional; the provider
//!   surface recovers these into typed empty/declined results.
//! - **Protocol preconditions** (`NotConnected`, `UnknownAccount`,
//!   `UnsupportedFeature`) - the caller skipped a required step.
//! - **Contract gaps** (`NotImplemented`) - the capability is advertised but
//!   deliberately unimplemented; distinct from anything breaking.
//! - **System failures** (`Transport`, `Registry`, `Keystore`) - propagated
//!   with their original cause preserved, never reinterpreted.

use crate::feature::FeatureName;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the durable account store collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryError {
    /// No account with the given id exists.
    #[error("account not found: {0}")]
    AccountNotFound(String),

    /// The underlying storage operation failed.
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Errors from the private-key-holding collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeystoreError {
    /// No key material for the given account id.
    #[error("no key for account: {0}")]
    UnknownKey(String),

    /// The signing operation itself failed.
    #[error("signing failure: {0}")]
    Signing(String),
}

/// The wallet core error taxonomy.
///
/// Serializable so a failure reason crosses the transport bridge without
/// losing its category.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail")]
pub enum WalletError {
    /// The user explicitly declined the request.
    #[error("request rejected by user")]
    UserRejected,

    /// The capability is advertised but has no implementation.
    #[error("feature not implemented: {0}")]
    NotImplemented(FeatureName),

    /// A sign/execute request arrived with no prior successful connect.
    #[error("origin not connected: {0}")]
    NotConnected(String),

    /// The requested account is not in the wallet.
    #[error("unknown account: {0}")]
    UnknownAccount(String),

    /// The account exists but does not support the requested capability.
    #[error("account {account} does not support {feature}")]
    UnsupportedFeature {
        account: String,
        feature: FeatureName,
    },

    /// A cross-context message round trip could not complete.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The account registry collaborator failed; cause preserved.
    #[error("account registry failure")]
    Registry(#[from] RegistryError),

    /// The keystore collaborator failed; cause preserved.
    #[error("keystore failure")]
    Keystore(#[from] KeystoreError),
}

/// Result type for wallet core operations.
pub type WalletResult<T> = Result<T, WalletError>;
