//! Wire envelopes for cross-context request/reply messaging.
//!
//! Messages share the window's messaging channel with unrelated traffic, so
//! every wallet message carries a target marker. Anything without the marker
//! is silently ignored on both sides.

use crate::correlation::CorrelationId;
use serde::{Deserialize, Serialize};
use wallet_types::encoding::base64_bytes;
use wallet_types::{Account, AccountId, Origin, WalletError};

/// Target marker distinguishing wallet messages from other channel traffic.
pub const MESSAGE_TARGET: &str = "reef-wallet";

/// A capability invocation travelling from a page toward the background
/// context.
///
/// The origin field is stamped by the relay from the sender's verified
/// origin, never taken from page-supplied content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub target: String,
    pub id: CorrelationId,
    pub origin: Origin,
    pub payload: RequestPayload,
}

impl RequestEnvelope {
    /// Build an envelope with a fresh correlation id and the wallet target
    /// marker stamped on.
    #[must_use]
    pub fn new(origin: Origin, payload: RequestPayload) -> Self {
        Self {
            target: MESSAGE_TARGET.to_string(),
            id: CorrelationId::new(),
            origin,
            payload,
        }
    }

    /// Whether this message is addressed to the wallet at all.
    #[must_use]
    pub fn is_for_wallet(&self) -> bool {
        self.target == MESSAGE_TARGET
    }
}

/// The operation being requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum RequestPayload {
    /// Establish (or silently probe) a connection for the sending origin.
    Connect {
        #[serde(default)]
        silent: bool,
    },

    /// Sign an arbitrary message with an account's key.
    SignPersonalMessage {
        account: AccountId,
        #[serde(with = "base64_bytes")]
        message: Vec<u8>,
    },

    /// Sign serialized transaction bytes without executing them.
    SignTransaction {
        account: AccountId,
        #[serde(with = "base64_bytes")]
        transaction: Vec<u8>,
    },

    /// Sign transaction bytes and submit them for execution.
    SignAndExecuteTransaction {
        account: AccountId,
        #[serde(with = "base64_bytes")]
        transaction: Vec<u8>,
    },

    /// Page-reported effects of an externally executed transaction.
    ReportTransactionEffects { effects: serde_json::Value },
}

impl RequestPayload {
    /// Short operation name for log fields.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connect { .. } => "connect",
            Self::SignPersonalMessage { .. } => "sign_personal_message",
            Self::SignTransaction { .. } => "sign_transaction",
            Self::SignAndExecuteTransaction { .. } => "sign_and_execute_transaction",
            Self::ReportTransactionEffects { .. } => "report_transaction_effects",
        }
    }
}

/// Successful reply content, one shape per operation family.
///
/// All binary material is base64 text on the wire; signatures and transaction
/// bytes are encoded before they leave the background context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ReplyData {
    /// Accounts exposed to the requesting origin.
    Accounts(Vec<Account>),

    /// Signed payload: the bytes that were signed and the signature over
    /// them, both base64.
    Signed { bytes: String, signature: String },

    /// Executed transaction: ledger digest and effects alongside the signed
    /// material.
    Executed {
        digest: String,
        effects: String,
        bytes: String,
        signature: String,
    },

    /// Acknowledgement with no content.
    Ack,
}

/// The reply travelling back toward the page for one request id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyEnvelope {
    pub target: String,
    pub id: CorrelationId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ReplyData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<WalletError>,
}

impl ReplyEnvelope {
    /// Successful reply carrying `data`.
    #[must_use]
    pub fn ok(id: CorrelationId, data: ReplyData) -> Self {
        Self {
            target: MESSAGE_TARGET.to_string(),
            id,
            data: Some(data),
            error: None,
        }
    }

    /// Failed reply carrying the typed error.
    #[must_use]
    pub fn err(id: CorrelationId, error: WalletError) -> Self {
        Self {
            target: MESSAGE_TARGET.to_string(),
            id,
            data: None,
            error: Some(error),
        }
    }

    /// Whether this message is addressed to the wallet at all.
    #[must_use]
    pub fn is_for_wallet(&self) -> bool {
        self.target == MESSAGE_TARGET
    }

    /// Collapse into the operation's result, surfacing a malformed reply as a
    /// transport failure.
    pub fn into_result(self) -> Result<ReplyData, WalletError> {
        match (self.data, self.error) {
            (Some(data), None) => Ok(data),
            (_, Some(error)) => Err(error),
            (None, None) => Err(WalletError::Transport("reply carried no content".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_types::FeatureName;

    fn origin() -> Origin {
        Origin::new("https://dapp.example")
    }

    #[test]
    fn test_envelope_stamps_target_and_id() {
        let a = RequestEnvelope::new(origin(), RequestPayload::Connect { silent: false });
        let b = RequestEnvelope::new(origin(), RequestPayload::Connect { silent: false });
        assert!(a.is_for_wallet());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_foreign_target_not_for_wallet() {
        let mut envelope =
            RequestEnvelope::new(origin(), RequestPayload::Connect { silent: true });
        envelope.target = "analytics-beacon".into();
        assert!(!envelope.is_for_wallet());
    }

    #[test]
    fn test_payload_wire_form() {
        let envelope = RequestEnvelope::new(
            origin(),
            RequestPayload::SignPersonalMessage {
                account: AccountId::generate(),
                message: b"hello wallet".to_vec(),
            },
        );
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["target"], "reef-wallet");
        assert_eq!(json["payload"]["kind"], "sign_personal_message");
        // Binary fields travel as base64 text.
        assert_eq!(json["payload"]["data"]["message"], "aGVsbG8gd2FsbGV0");

        let back: RequestEnvelope = serde_json::from_value(json).unwrap();
        match back.payload {
            RequestPayload::SignPersonalMessage { message, .. } => {
                assert_eq!(message, b"hello wallet");
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn test_connect_silent_defaults_false() {
        let json = serde_json::json!({
            "target": "reef-wallet",
            "id": CorrelationId::new(),
            "origin": "https://dapp.example",
            "payload": { "kind": "connect", "data": {} },
        });
        let envelope: RequestEnvelope = serde_json::from_value(json).unwrap();
        assert!(matches!(
            envelope.payload,
            RequestPayload::Connect { silent: false }
        ));
    }

    #[test]
    fn test_error_reply_survives_roundtrip_typed() {
        let reply = ReplyEnvelope::err(
            CorrelationId::new(),
            WalletError::NotImplemented(FeatureName::ReportTransactionEffects),
        );
        let json = serde_json::to_string(&reply).unwrap();
        let back: ReplyEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(
            back.into_result().unwrap_err(),
            WalletError::NotImplemented(FeatureName::ReportTransactionEffects)
        );
    }

    #[test]
    fn test_empty_reply_is_transport_error() {
        let reply = ReplyEnvelope {
            target: MESSAGE_TARGET.to_string(),
            id: CorrelationId::new(),
            data: None,
            error: None,
        };
        assert!(matches!(
            reply.into_result(),
            Err(WalletError::Transport(_))
        ));
    }
}
