//! Background half of the bridge.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};
use wallet_router::{ReplyEnvelope, RequestEnvelope};

/// Default bound on requests queued toward the background context.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// One request crossing from a relay to the background context.
///
/// The reply sender is created at receipt and travels with the request, so
/// the reply path is bound to exactly the page that sent it.
pub struct Transfer {
    pub envelope: RequestEnvelope,
    pub reply: oneshot::Sender<ReplyEnvelope>,
}

/// Processes forwarded envelopes in the background context.
///
/// Returning `None` means the request produces no reply (foreign target or
/// duplicate id); the relay observes the dropped reply path.
#[async_trait]
pub trait EnvelopeHandler: Send + Sync + 'static {
    async fn handle(&self, envelope: RequestEnvelope) -> Option<ReplyEnvelope>;
}

/// Build the relay→background channel pair.
#[must_use]
pub fn channel(capacity: usize) -> (mpsc::Sender<Transfer>, BackgroundEndpoint) {
    let (tx, rx) = mpsc::channel(capacity);
    (tx, BackgroundEndpoint { rx })
}

/// Receiving end living in the privileged background context.
pub struct BackgroundEndpoint {
    rx: mpsc::Receiver<Transfer>,
}

impl BackgroundEndpoint {
    /// Serve forwarded requests until every relay sender is dropped.
    ///
    /// Each request runs in its own task: one origin parked on a consent
    /// decision never blocks another origin's traffic.
    pub async fn serve(mut self, handler: Arc<dyn EnvelopeHandler>) {
        info!("Background endpoint serving");
        while let Some(transfer) = self.rx.recv().await {
            let handler = Arc::clone(&handler);
            tokio::spawn(async move {
                let id = transfer.envelope.id;
                match handler.handle(transfer.envelope).await {
                    Some(reply) => {
                        // Send fails only if the page went away mid-flight.
                        if transfer.reply.send(reply).is_err() {
                            debug!(request_id = %id, "Reply dropped, relay gone");
                        }
                    }
                    None => debug!(request_id = %id, "Request produced no reply"),
                }
            });
        }
        info!("Background endpoint stopped, all relays closed");
    }
}
