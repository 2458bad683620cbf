//! The background-context request router.

use crate::envelope::{ReplyData, ReplyEnvelope, RequestEnvelope, RequestPayload};
use crate::ports::LedgerExecutor;
use crate::requests::RequestTracker;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use wallet_consent::ConsentCoordinator;
use wallet_types::{
    encoding, Account, AccountId, AccountRegistry, FeatureName, Keystore, Origin, WalletError,
    WalletResult,
};

/// Routes page requests to the registry, keystore, consent coordinator, and
/// ledger executor, producing exactly one reply per accepted request id.
///
/// Connection state is per origin and lives only here: an origin is connected
/// after one approved connect, and every sign/execute request is gated on
/// that state.
pub struct RequestRouter {
    registry: Arc<dyn AccountRegistry>,
    keystore: Arc<dyn Keystore>,
    executor: Arc<dyn LedgerExecutor>,
    consent: Arc<ConsentCoordinator>,
    connected: DashMap<Origin, ()>,
    tracker: RequestTracker,
}

impl RequestRouter {
    #[must_use]
    pub fn new(
        registry: Arc<dyn AccountRegistry>,
        keystore: Arc<dyn Keystore>,
        executor: Arc<dyn LedgerExecutor>,
        consent: Arc<ConsentCoordinator>,
    ) -> Self {
        Self {
            registry,
            keystore,
            executor,
            consent,
            connected: DashMap::new(),
            tracker: RequestTracker::new(),
        }
    }

    /// Process one inbound envelope.
    ///
    /// Returns `None` for messages not addressed to the wallet and for
    /// duplicate request ids; both are dropped without a reply. Everything
    /// else produces exactly one reply, success or typed failure.
    pub async fn handle(&self, envelope: RequestEnvelope) -> Option<ReplyEnvelope> {
        if !envelope.is_for_wallet() {
            return None;
        }
        if !self.tracker.begin(envelope.id) {
            return None;
        }

        debug!(
            request_id = %envelope.id,
            origin = %envelope.origin,
            operation = envelope.payload.name(),
            "Routing request"
        );

        let result = self.dispatch(&envelope).await;
        self.tracker.resolve(envelope.id, result.is_ok());

        Some(match result {
            Ok(data) => ReplyEnvelope::ok(envelope.id, data),
            Err(error) => {
                debug!(request_id = %envelope.id, error = %error, "Request failed");
                ReplyEnvelope::err(envelope.id, error)
            }
        })
    }

    async fn dispatch(&self, envelope: &RequestEnvelope) -> WalletResult<ReplyData> {
        let origin = &envelope.origin;
        match &envelope.payload {
            RequestPayload::Connect { silent } => self.connect(envelope.id, origin, *silent).await,
            RequestPayload::SignPersonalMessage { account, message } => {
                self.ensure_connected(origin)?;
                let account = self
                    .require_account(account, FeatureName::SignPersonalMessage)
                    .await?;
                let signature = self.keystore.sign(&account.id, message).await?;
                Ok(ReplyData::Signed {
                    bytes: encoding::encode(message),
                    signature: encoding::encode(&signature),
                })
            }
            RequestPayload::SignTransaction {
                account,
                transaction,
            } => {
                self.ensure_connected(origin)?;
                let account = self
                    .require_account(account, FeatureName::SignTransaction)
                    .await?;
                let signature = self.keystore.sign(&account.id, transaction).await?;
                Ok(ReplyData::Signed {
                    bytes: encoding::encode(transaction),
                    signature: encoding::encode(&signature),
                })
            }
            RequestPayload::SignAndExecuteTransaction {
                account,
                transaction,
            } => {
                self.ensure_connected(origin)?;
                let account = self
                    .require_account(account, FeatureName::SignAndExecuteTransaction)
                    .await?;
                let signature = self.keystore.sign(&account.id, transaction).await?;
                let receipt = self
                    .executor
                    .execute(transaction, &signature)
                    .await
                    .map_err(|e| WalletError::Transport(e.to_string()))?;
                info!(
                    origin = %origin,
                    digest = %receipt.digest,
                    "Transaction executed"
                );
                Ok(ReplyData::Executed {
                    digest: receipt.digest,
                    effects: receipt.effects,
                    bytes: encoding::encode(transaction),
                    signature: encoding::encode(&signature),
                })
            }
            RequestPayload::ReportTransactionEffects { effects } => {
                // Informational only. Malformed or unexpected effects are
                // logged, never turned into a page-visible failure.
                info!(
                    origin = %origin,
                    effects_bytes = effects.to_string().len(),
                    "Transaction effects reported by page"
                );
                Ok(ReplyData::Ack)
            }
        }
    }

    async fn connect(
        &self,
        id: crate::CorrelationId,
        origin: &Origin,
        silent: bool,
    ) -> WalletResult<ReplyData> {
        if self.connected.contains_key(origin) {
            // Idempotent: an already-connected origin gets a refreshed
            // account list without a new prompt.
            let accounts = self.registry.get_all_accounts().await?;
            return Ok(ReplyData::Accounts(accounts));
        }

        if silent {
            debug!(origin = %origin, "Silent connect with no prior approval");
            return Ok(ReplyData::Accounts(Vec::new()));
        }

        self.tracker.awaiting_consent(id);
        let decision = self
            .consent
            .request_decision(origin)
            .await
            .map_err(|e| WalletError::Transport(e.to_string()))?;

        if !decision.approved {
            // Not remembered: the next connect from this origin prompts
            // again.
            info!(origin = %origin, "Connection declined by user");
            return Err(WalletError::UserRejected);
        }

        self.connected.insert(origin.clone(), ());
        let accounts = self.registry.get_all_accounts().await?;
        info!(
            origin = %origin,
            account_count = accounts.len(),
            "Origin connected"
        );
        Ok(ReplyData::Accounts(accounts))
    }

    /// Forget an origin's connection, e.g. when its relay tears down.
    pub fn disconnect(&self, origin: &Origin) -> bool {
        let removed = self.connected.remove(origin).is_some();
        if removed {
            debug!(origin = %origin, "Origin disconnected");
        }
        removed
    }

    /// Whether `origin` has an approved connection.
    #[must_use]
    pub fn is_connected(&self, origin: &Origin) -> bool {
        self.connected.contains_key(origin)
    }

    /// Origins with an approved connection, for event fan-out.
    #[must_use]
    pub fn connected_origins(&self) -> Vec<Origin> {
        self.connected.iter().map(|e| e.key().clone()).collect()
    }

    /// Access to the request tracker, for periodic pruning.
    #[must_use]
    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    fn ensure_connected(&self, origin: &Origin) -> WalletResult<()> {
        if self.connected.contains_key(origin) {
            Ok(())
        } else {
            warn!(origin = %origin, "Sign request from unconnected origin");
            Err(WalletError::NotConnected(origin.to_string()))
        }
    }

    async fn require_account(
        &self,
        id: &AccountId,
        feature: FeatureName,
    ) -> WalletResult<Account> {
        let accounts = self.registry.get_all_accounts().await?;
        let account = accounts
            .into_iter()
            .find(|a| &a.id == id)
            .ok_or_else(|| WalletError::UnknownAccount(id.to_string()))?;
        if !account.supports(feature) {
            return Err(WalletError::UnsupportedFeature {
                account: account.id.to_string(),
                feature,
            });
        }
        Ok(account)
    }
}
