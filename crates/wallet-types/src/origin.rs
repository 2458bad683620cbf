//! Page origins.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The security origin of a requesting page, e.g. `https://dapp.example`.
///
/// Origins key consent sessions and connection state; two pages with the same
/// origin share a consent decision, two pages with different origins never do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Origin(String);

impl Origin {
    pub fn new(origin: impl Into<String>) -> Self {
        Self(origin.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Origin {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
