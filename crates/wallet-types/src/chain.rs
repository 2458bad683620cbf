//! Chain identifiers.
//!
//! A chain identifier is a namespaced string such as `"sui:mainnet"`. The
//! wallet advertises an ordered set of these at construction; they are never
//! mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a ledger network the wallet supports.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(String);

impl ChainId {
    /// Sui mainnet.
    pub const SUI_MAINNET: &'static str = "sui:mainnet";
    /// Sui testnet.
    pub const SUI_TESTNET: &'static str = "sui:testnet";
    /// Sui devnet.
    pub const SUI_DEVNET: &'static str = "sui:devnet";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The default chain set for a Sui wallet, in advertisement order.
    #[must_use]
    pub fn sui_chains() -> Vec<Self> {
        vec![
            Self::new(Self::SUI_DEVNET),
            Self::new(Self::SUI_TESTNET),
            Self::new(Self::SUI_MAINNET),
        ]
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChainId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
