//! Account entities.
//!
//! An [`Account`] is the wallet's view of one user-controlled key. The durable
//! copy lives in the account registry collaborator; everything here is the
//! value type both sides exchange.

use crate::encoding;
use crate::feature::FeatureName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Opaque stable identifier for an account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Generate a fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One user-controlled key as seen by the wallet and by pages.
///
/// At most one account in a registry is `active` at any time; the registry
/// enforces that invariant on every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Opaque stable id.
    pub id: AccountId,
    /// Display label chosen by the user.
    pub label: String,
    /// Chain-specific public address string.
    pub address: String,
    /// Raw public key bytes, base64 on the wire.
    #[serde(with = "encoding::base64_bytes")]
    pub public_key: Vec<u8>,
    /// Capabilities this account supports; always a subset of the wallet's.
    pub features: BTreeSet<FeatureName>,
    /// Whether this is the currently active account.
    pub active: bool,
    /// Creation timestamp, milliseconds since the Unix epoch.
    pub created_at: u64,
}

impl Account {
    /// Whether this account can service the given capability.
    #[must_use]
    pub fn supports(&self, feature: FeatureName) -> bool {
        self.features.contains(&feature)
    }
}

/// Input for creating a new account in the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSpec {
    pub label: String,
    pub address: String,
    #[serde(with = "encoding::base64_bytes")]
    pub public_key: Vec<u8>,
    pub features: BTreeSet<FeatureName>,
}

impl AccountSpec {
    /// A spec with the default signing feature set for a Sui account.
    pub fn signer(label: impl Into<String>, address: impl Into<String>, public_key: Vec<u8>) -> Self {
        Self {
            label: label.into(),
            address: address.into(),
            public_key,
            features: [
                FeatureName::SignPersonalMessage,
                FeatureName::SignTransaction,
                FeatureName::SignAndExecuteTransaction,
            ]
            .into_iter()
            .collect(),
        }
    }
}
