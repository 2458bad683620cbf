//! Immutable wallet identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use wallet_types::ChainId;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// The icon is not a `data:image/...;base64,` URI.
    #[error("invalid icon uri: {0}")]
    InvalidIcon(String),

    /// An identity field that must not be empty was empty.
    #[error("empty identity field: {0}")]
    EmptyField(&'static str),
}

/// A wallet icon as an inline data URI.
///
/// Only `data:image/<format>;base64,<payload>` is accepted; remote URLs would
/// let a page fingerprint the wallet by observing the fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconUri(String);

impl IconUri {
    pub fn new(uri: impl Into<String>) -> Result<Self, IdentityError> {
        let uri = uri.into();
        let Some(rest) = uri.strip_prefix("data:image/") else {
            return Err(IdentityError::InvalidIcon(uri));
        };
        let Some((format, payload)) = rest.split_once(";base64,") else {
            return Err(IdentityError::InvalidIcon(uri));
        };
        if format.is_empty() || payload.is_empty() {
            return Err(IdentityError::InvalidIcon(uri));
        }
        Ok(Self(uri))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IconUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity fields a page sees when it discovers the wallet.
///
/// Built once at provider construction, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletIdentity {
    pub name: String,
    pub icon: IconUri,
    pub version: String,
    pub chains: Vec<ChainId>,
}

impl WalletIdentity {
    pub fn new(
        name: impl Into<String>,
        icon: IconUri,
        version: impl Into<String>,
        chains: Vec<ChainId>,
    ) -> Result<Self, IdentityError> {
        let name = name.into();
        let version = version.into();
        if name.is_empty() {
            return Err(IdentityError::EmptyField("name"));
        }
        if version.is_empty() {
            return Err(IdentityError::EmptyField("version"));
        }
        if chains.is_empty() {
            return Err(IdentityError::EmptyField("chains"));
        }
        Ok(Self {
            name,
            icon,
            version,
            chains,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent png, tiny enough to inline.
    const ICON: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn test_icon_accepts_data_uri() {
        assert!(IconUri::new(ICON).is_ok());
    }

    #[test]
    fn test_icon_rejects_remote_url() {
        assert!(IconUri::new("https://evil.example/icon.png").is_err());
        assert!(IconUri::new("data:text/html;base64,PGI+").is_err());
        assert!(IconUri::new("data:image/png;base64,").is_err());
    }

    #[test]
    fn test_identity_requires_chains() {
        let icon = IconUri::new(ICON).unwrap();
        let err = WalletIdentity::new("Reef", icon, "1.0.0", vec![]).unwrap_err();
        assert_eq!(err, IdentityError::EmptyField("chains"));
    }

    #[test]
    fn test_identity_chain_order_preserved() {
        let icon = IconUri::new(ICON).unwrap();
        let identity =
            WalletIdentity::new("Reef", icon, "1.0.0", ChainId::sui_chains()).unwrap();
        assert_eq!(identity.chains, ChainId::sui_chains());
    }
}
