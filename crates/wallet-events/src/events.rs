//! Event names and payloads.

use serde::{Deserialize, Serialize};
use std::fmt;
use wallet_types::Account;

/// Names of the standardized wallet events pages can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventName {
    /// The account set visible to the page changed.
    #[serde(rename = "change")]
    Change,
}

impl EventName {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::Change => "change",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "change" => Some(EventName::Change),
            _ => None,
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A wallet lifecycle event with its payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum WalletEvent {
    /// Fired once per account-set change, carrying the new snapshot.
    #[serde(rename = "change")]
    Change { accounts: Vec<Account> },
}

impl WalletEvent {
    /// The name this event is delivered under.
    #[must_use]
    pub fn name(&self) -> EventName {
        match self {
            WalletEvent::Change { .. } => EventName::Change,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_name_roundtrip() {
        assert_eq!(EventName::parse("change"), Some(EventName::Change));
        assert_eq!(EventName::parse("disconnect"), None);
    }

    #[test]
    fn test_change_event_name() {
        let event = WalletEvent::Change { accounts: vec![] };
        assert_eq!(event.name(), EventName::Change);
    }
}
