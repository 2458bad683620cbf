//! The capability provider pages call into.

use crate::features::FeatureSet;
use crate::identity::WalletIdentity;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};
use wallet_events::{EventBus, EventName, ListenerHandle, WalletEvent};
use wallet_router::{ReplyData, RequestEnvelope, RequestPayload};
use wallet_transport::PageRelay;
use wallet_types::{Account, AccountId, AccountRegistry, FeatureName, WalletError, WalletResult};

/// Options for [`WalletProvider::connect`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectOptions {
    /// Probe for an existing approval without prompting; with no prior
    /// approval the result is an empty account set.
    pub silent: bool,
}

/// A signed payload: the bytes that were signed and the signature over them,
/// both base64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPayload {
    pub bytes: String,
    pub signature: String,
}

/// Result of sign-and-execute: the ledger receipt plus the signed material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutedTransaction {
    pub digest: String,
    pub effects: String,
    pub bytes: String,
    pub signature: String,
}

/// The discoverable wallet object living in a page context.
///
/// Owns the identity and the live account snapshot; the snapshot is a
/// read-through view of the account registry, swapped atomically on refresh
/// and never mutated in place. Until the first refresh completes,
/// [`accounts`] is empty.
///
/// [`accounts`]: WalletProvider::accounts
pub struct WalletProvider {
    identity: WalletIdentity,
    features: FeatureSet,
    registry: Arc<dyn AccountRegistry>,
    relay: Arc<PageRelay>,
    bus: EventBus,
    snapshot: RwLock<Arc<Vec<Account>>>,
}

impl WalletProvider {
    /// Construct the provider and kick off the initial snapshot refresh.
    #[must_use]
    pub fn new(
        identity: WalletIdentity,
        features: FeatureSet,
        registry: Arc<dyn AccountRegistry>,
        relay: Arc<PageRelay>,
        bus: EventBus,
    ) -> Arc<Self> {
        let provider = Arc::new(Self {
            identity,
            features,
            registry,
            relay,
            bus,
            snapshot: RwLock::new(Arc::new(Vec::new())),
        });

        // Callers must not assume accounts are available synchronously
        // post-construction.
        let weak = Arc::downgrade(&provider);
        tokio::spawn(async move {
            if let Some(provider) = weak.upgrade() {
                provider.initial_probe().await;
            }
        });

        provider
    }

    /// Construction-time snapshot fill: a silent connect probe.
    ///
    /// Goes through the consent-gated path rather than reading the registry
    /// directly, so an origin with no prior approval sees nothing. A page
    /// reopened by an already-connected origin gets its accounts restored.
    async fn initial_probe(&self) {
        match self.round_trip(RequestPayload::Connect { silent: true }).await {
            Ok(ReplyData::Accounts(accounts)) => {
                if !accounts.is_empty() {
                    debug!(accounts = accounts.len(), "Restored accounts for connected origin");
                    self.install_snapshot(accounts);
                }
            }
            Ok(_) => {}
            Err(e) => debug!(error = %e, "Initial account probe yielded nothing"),
        }
    }

    #[must_use]
    pub fn identity(&self) -> &WalletIdentity {
        &self.identity
    }

    #[must_use]
    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// Current account snapshot.
    #[must_use]
    pub fn accounts(&self) -> Arc<Vec<Account>> {
        Arc::clone(&self.snapshot.read())
    }

    /// Subscribe to account-set changes.
    #[must_use]
    pub fn on_change(
        &self,
        listener: impl Fn(&WalletEvent) + Send + Sync + 'static,
    ) -> ListenerHandle {
        self.bus.on(EventName::Change, listener)
    }

    /// Re-read the registry and swap the snapshot.
    ///
    /// Emits exactly one `change` event when the account set actually
    /// changed, none otherwise.
    pub async fn refresh_accounts(&self) -> WalletResult<bool> {
        let accounts = self.registry.get_all_accounts().await?;
        Ok(self.install_snapshot(accounts))
    }

    /// Establish a connection for this page's origin.
    ///
    /// With accounts already in the snapshot this is an idempotent
    /// short-circuit: same set, no prompt. A user declining resolves to an
    /// empty account list, never an error; errors are reserved for transport
    /// and system failures.
    pub async fn connect(&self, options: ConnectOptions) -> WalletResult<Vec<Account>> {
        self.features
            .ensure_implemented(FeatureName::StandardConnect)?;

        {
            let snapshot = self.snapshot.read();
            if !snapshot.is_empty() {
                debug!(accounts = snapshot.len(), "Connect satisfied from snapshot");
                return Ok(snapshot.as_ref().clone());
            }
        }

        let result = self
            .round_trip(RequestPayload::Connect {
                silent: options.silent,
            })
            .await;

        match result {
            Ok(ReplyData::Accounts(accounts)) => {
                info!(accounts = accounts.len(), "Connection established");
                self.install_snapshot(accounts.clone());
                Ok(accounts)
            }
            Ok(other) => Err(unexpected_reply(&other)),
            Err(WalletError::UserRejected) => {
                info!("Connection declined; resolving with empty account set");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Sign an arbitrary message with `account`'s key.
    pub async fn sign_personal_message(
        &self,
        account: &AccountId,
        message: &[u8],
    ) -> WalletResult<SignedPayload> {
        self.features
            .ensure_implemented(FeatureName::SignPersonalMessage)?;
        self.validate_account(account, FeatureName::SignPersonalMessage)?;

        match self
            .round_trip(RequestPayload::SignPersonalMessage {
                account: account.clone(),
                message: message.to_vec(),
            })
            .await?
        {
            ReplyData::Signed { bytes, signature } => Ok(SignedPayload { bytes, signature }),
            other => Err(unexpected_reply(&other)),
        }
    }

    /// Sign serialized transaction bytes without executing them.
    pub async fn sign_transaction(
        &self,
        account: &AccountId,
        transaction: &[u8],
    ) -> WalletResult<SignedPayload> {
        self.features
            .ensure_implemented(FeatureName::SignTransaction)?;
        self.validate_account(account, FeatureName::SignTransaction)?;

        match self
            .round_trip(RequestPayload::SignTransaction {
                account: account.clone(),
                transaction: transaction.to_vec(),
            })
            .await?
        {
            ReplyData::Signed { bytes, signature } => Ok(SignedPayload { bytes, signature }),
            other => Err(unexpected_reply(&other)),
        }
    }

    /// Sign transaction bytes and submit them for execution.
    pub async fn sign_and_execute_transaction(
        &self,
        account: &AccountId,
        transaction: &[u8],
    ) -> WalletResult<ExecutedTransaction> {
        self.features
            .ensure_implemented(FeatureName::SignAndExecuteTransaction)?;
        self.validate_account(account, FeatureName::SignAndExecuteTransaction)?;

        match self
            .round_trip(RequestPayload::SignAndExecuteTransaction {
                account: account.clone(),
                transaction: transaction.to_vec(),
            })
            .await?
        {
            ReplyData::Executed {
                digest,
                effects,
                bytes,
                signature,
            } => Ok(ExecutedTransaction {
                digest,
                effects,
                bytes,
                signature,
            }),
            other => Err(unexpected_reply(&other)),
        }
    }

    /// Report externally observed transaction effects for bookkeeping.
    ///
    /// Best-effort by contract: input the wallet cannot act on is logged,
    /// never surfaced to the page as a failure.
    pub async fn report_transaction_effects(&self, effects: serde_json::Value) {
        if self
            .features
            .ensure_implemented(FeatureName::ReportTransactionEffects)
            .is_err()
        {
            debug!("Effects reporting not implemented, dropping report");
            return;
        }

        match self
            .round_trip(RequestPayload::ReportTransactionEffects { effects })
            .await
        {
            Ok(_) => debug!("Transaction effects reported"),
            Err(e) => warn!(error = %e, "Effects report not delivered"),
        }
    }

    async fn round_trip(&self, payload: RequestPayload) -> WalletResult<ReplyData> {
        let envelope = RequestEnvelope::new(self.relay.origin().clone(), payload);
        match self.relay.forward(envelope).await {
            Ok(Some(reply)) => reply.into_result(),
            Ok(None) => Err(WalletError::Transport("request produced no reply".into())),
            Err(e) => Err(WalletError::Transport(e.to_string())),
        }
    }

    fn validate_account(&self, id: &AccountId, feature: FeatureName) -> WalletResult<()> {
        let snapshot = self.snapshot.read();
        let account = snapshot
            .iter()
            .find(|a| &a.id == id)
            .ok_or_else(|| WalletError::UnknownAccount(id.to_string()))?;
        if !account.supports(feature) {
            return Err(WalletError::UnsupportedFeature {
                account: account.id.to_string(),
                feature,
            });
        }
        Ok(())
    }

    /// Swap in a new snapshot; returns whether the set changed. The change
    /// event fires once per actual change, after the swap.
    fn install_snapshot(&self, accounts: Vec<Account>) -> bool {
        {
            let mut slot = self.snapshot.write();
            if slot.as_ref() == &accounts {
                return false;
            }
            *slot = Arc::new(accounts.clone());
        }
        self.bus.emit(&WalletEvent::Change { accounts });
        true
    }
}

fn unexpected_reply(data: &ReplyData) -> WalletError {
    WalletError::Transport(format!("unexpected reply shape: {data:?}"))
}
