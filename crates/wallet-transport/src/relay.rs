//! Page-side relay.

use crate::bridge::Transfer;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use wallet_router::{ReplyEnvelope, RequestEnvelope, MESSAGE_TARGET};
use wallet_types::Origin;

#[derive(Debug, Error)]
pub enum TransportError {
    /// The background channel is gone; the round trip cannot complete.
    #[error("background channel closed")]
    ChannelClosed,

    /// A message carried the wallet target marker but was not a valid
    /// envelope.
    #[error("malformed wallet message: {0}")]
    Malformed(String),
}

/// Relay for one page, bound to that page's verified security origin.
///
/// Raw messages from the page's global channel go through [`forward_raw`]:
/// anything without the wallet target marker is ignored, everything else is
/// parsed, origin-stamped, and forwarded with a private reply path.
///
/// [`forward_raw`]: PageRelay::forward_raw
pub struct PageRelay {
    origin: Origin,
    background: mpsc::Sender<Transfer>,
}

impl PageRelay {
    #[must_use]
    pub fn new(origin: Origin, background: mpsc::Sender<Transfer>) -> Self {
        Self { origin, background }
    }

    /// The verified origin this relay speaks for.
    #[must_use]
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Handle one raw message observed on the page's global channel.
    ///
    /// Returns `Ok(None)` for traffic not addressed to the wallet and for
    /// requests the background dropped without a reply (duplicate ids).
    /// `Err` is reserved for transport faults: a malformed wallet-targeted
    /// message or a torn-down background channel.
    pub async fn forward_raw(
        &self,
        raw: serde_json::Value,
    ) -> Result<Option<ReplyEnvelope>, TransportError> {
        if raw.get("target").and_then(|t| t.as_str()) != Some(MESSAGE_TARGET) {
            // Arbitrary page traffic shares this channel; not ours.
            return Ok(None);
        }

        let envelope: RequestEnvelope = serde_json::from_value(raw).map_err(|e| {
            warn!(origin = %self.origin, error = %e, "Malformed wallet message from page");
            TransportError::Malformed(e.to_string())
        })?;

        self.forward(envelope).await
    }

    /// Forward an already-parsed envelope.
    ///
    /// The origin field is overwritten with this relay's verified origin
    /// before the envelope leaves the page context.
    pub async fn forward(
        &self,
        mut envelope: RequestEnvelope,
    ) -> Result<Option<ReplyEnvelope>, TransportError> {
        if envelope.origin != self.origin {
            debug!(
                claimed = %envelope.origin,
                verified = %self.origin,
                "Overwriting page-claimed origin"
            );
        }
        envelope.origin = self.origin.clone();

        let id = envelope.id;
        let (reply_tx, reply_rx) = oneshot::channel();
        self.background
            .send(Transfer {
                envelope,
                reply: reply_tx,
            })
            .await
            .map_err(|_| TransportError::ChannelClosed)?;

        match reply_rx.await {
            Ok(reply) => {
                debug!(request_id = %id, origin = %self.origin, "Reply routed back to page");
                Ok(Some(reply))
            }
            // The background accepted the transfer but produced no reply;
            // dropped duplicates land here.
            Err(_) => Ok(None),
        }
    }
}
