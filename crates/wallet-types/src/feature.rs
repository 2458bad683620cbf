//! Capability feature names.
//!
//! The supported-capability set is a closed enumeration rather than an ad hoc
//! string map, so a feature a page can name is always a feature the compiler
//! knows about. The string forms are the namespaced identifiers pages see in
//! the discovery object (`"standard:connect"`, `"sui:signTransaction"`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named capability the wallet can advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeatureName {
    /// `standard:connect` - establish a connection and expose accounts.
    #[serde(rename = "standard:connect")]
    StandardConnect,
    /// `standard:events` - subscribe to wallet lifecycle events.
    #[serde(rename = "standard:events")]
    StandardEvents,
    /// `sui:signPersonalMessage`
    #[serde(rename = "sui:signPersonalMessage")]
    SignPersonalMessage,
    /// `sui:signTransaction`
    #[serde(rename = "sui:signTransaction")]
    SignTransaction,
    /// `sui:signAndExecuteTransaction`
    #[serde(rename = "sui:signAndExecuteTransaction")]
    SignAndExecuteTransaction,
    /// `sui:reportTransactionEffects`
    #[serde(rename = "sui:reportTransactionEffects")]
    ReportTransactionEffects,
}

impl FeatureName {
    /// Every feature the wallet knows about, in advertisement order.
    pub const ALL: [FeatureName; 6] = [
        FeatureName::StandardConnect,
        FeatureName::StandardEvents,
        FeatureName::SignPersonalMessage,
        FeatureName::SignTransaction,
        FeatureName::SignAndExecuteTransaction,
        FeatureName::ReportTransactionEffects,
    ];

    /// The namespaced string form pages use to look the feature up.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureName::StandardConnect => "standard:connect",
            FeatureName::StandardEvents => "standard:events",
            FeatureName::SignPersonalMessage => "sui:signPersonalMessage",
            FeatureName::SignTransaction => "sui:signTransaction",
            FeatureName::SignAndExecuteTransaction => "sui:signAndExecuteTransaction",
            FeatureName::ReportTransactionEffects => "sui:reportTransactionEffects",
        }
    }

    /// Parse a namespaced feature string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.as_str() == s)
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
