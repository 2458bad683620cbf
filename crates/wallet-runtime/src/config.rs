//! Runtime configuration.
//!
//! Typed defaults with `WALLET_*` environment overrides, validated once at
//! startup.

use thiserror::Error;
use tracing::warn;
use wallet_provider::{IconUri, IdentityError};

/// Complete runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct WalletConfig {
    pub identity: IdentityConfig,
    pub consent: ConsentConfig,
    pub transport: TransportConfig,
    pub requests: RequestConfig,
}

#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("wallet name must not be empty")]
    EmptyName,

    #[error(transparent)]
    InvalidIcon(#[from] IdentityError),

    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),
}

impl WalletConfig {
    /// Defaults overridden from `WALLET_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(name) = std::env::var("WALLET_NAME") {
            config.identity.name = name;
        }
        if let Ok(icon) = std::env::var("WALLET_ICON") {
            config.identity.icon = icon;
        }
        if let Ok(value) = std::env::var("WALLET_DECISION_TIMEOUT_SECS") {
            match value.parse() {
                Ok(secs) => config.consent.decision_timeout_secs = secs,
                Err(_) => warn!("WALLET_DECISION_TIMEOUT_SECS must be an integer, keeping default"),
            }
        }
        if let Ok(value) = std::env::var("WALLET_CHANNEL_CAPACITY") {
            match value.parse() {
                Ok(capacity) => config.transport.channel_capacity = capacity,
                Err(_) => warn!("WALLET_CHANNEL_CAPACITY must be an integer, keeping default"),
            }
        }
        if let Ok(value) = std::env::var("WALLET_REQUEST_RETENTION_SECS") {
            match value.parse() {
                Ok(secs) => config.requests.retention_secs = secs,
                Err(_) => warn!("WALLET_REQUEST_RETENTION_SECS must be an integer, keeping default"),
            }
        }

        config
    }

    /// Validate before any context is constructed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.identity.name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        IconUri::new(&self.identity.icon)?;
        if self.consent.decision_timeout_secs == 0 {
            return Err(ConfigError::ZeroValue("consent.decision_timeout_secs"));
        }
        if self.transport.channel_capacity == 0 {
            return Err(ConfigError::ZeroValue("transport.channel_capacity"));
        }
        if self.requests.retention_secs == 0 {
            return Err(ConfigError::ZeroValue("requests.retention_secs"));
        }
        Ok(())
    }
}

/// Identity fields advertised to pages.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub name: String,
    pub icon: String,
    pub version: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            name: "Reef Wallet".into(),
            // 1x1 transparent png.
            icon: "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==".into(),
            version: "1.0.0".into(),
        }
    }
}

/// Consent coordination parameters.
#[derive(Debug, Clone)]
pub struct ConsentConfig {
    /// Bounded wait for a user decision before implicit rejection.
    pub decision_timeout_secs: u64,
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            decision_timeout_secs: 120,
        }
    }
}

/// Relay→background channel parameters.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub channel_capacity: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            channel_capacity: wallet_transport::DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Request tracker retention.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// How long resolved request ids are kept to absorb late duplicates.
    pub retention_secs: u64,
    /// Prune cadence.
    pub prune_interval_secs: u64,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            retention_secs: 300,
            prune_interval_secs: 60,
        }
    }
}
