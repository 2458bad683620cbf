//! Per-execution-context wiring.
//!
//! Each execution context gets one explicit context object built at startup:
//! [`BackgroundContext`] for the privileged side, one [`PageContext`] per
//! page. Nothing is reached through ambient globals; components receive
//! their collaborators by reference at construction.

use crate::config::WalletConfig;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info};
use wallet_consent::{ApprovalSurface, ConsentCoordinator};
use wallet_events::EventBus;
use wallet_provider::{
    FeatureConflict, FeatureSet, IconUri, IdentityError, WalletIdentity, WalletProvider,
};
use wallet_router::{LedgerExecutor, ReplyEnvelope, RequestEnvelope, RequestRouter};
use wallet_transport::{channel, BackgroundEndpoint, EnvelopeHandler, PageRelay, Transfer};
use wallet_types::{
    Account, AccountId, AccountRegistry, AccountSpec, ChainId, Keystore, MemoryKeystore,
    MemoryRegistry, Origin, WalletResult,
};

#[derive(Debug, Error)]
pub enum ContextError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Features(#[from] FeatureConflict),
}

/// Adapts the router to the transport's handler port.
struct RouterHandler(Arc<RequestRouter>);

#[async_trait]
impl EnvelopeHandler for RouterHandler {
    async fn handle(&self, envelope: RequestEnvelope) -> Option<ReplyEnvelope> {
        self.0.handle(envelope).await
    }
}

/// The privileged background context, constructed once per process.
///
/// Owns the router, consent coordinator, and the collaborator instances, and
/// hands out [`PageContext`]s wired to the shared background channel.
pub struct BackgroundContext {
    config: WalletConfig,
    registry: Arc<MemoryRegistry>,
    keystore: Arc<MemoryKeystore>,
    consent: Arc<ConsentCoordinator>,
    router: Arc<RequestRouter>,
    relay_tx: mpsc::Sender<Transfer>,
    endpoint: Mutex<Option<BackgroundEndpoint>>,
}

impl BackgroundContext {
    #[must_use]
    pub fn new(
        config: WalletConfig,
        surface: Arc<dyn ApprovalSurface>,
        executor: Arc<dyn LedgerExecutor>,
    ) -> Self {
        let (relay_tx, endpoint) = channel(config.transport.channel_capacity);
        let consent = Arc::new(ConsentCoordinator::new(
            surface,
            Duration::from_secs(config.consent.decision_timeout_secs),
        ));
        let registry = Arc::new(MemoryRegistry::new());
        let keystore = Arc::new(MemoryKeystore::new());
        let router = Arc::new(RequestRouter::new(
            Arc::clone(&registry) as Arc<dyn AccountRegistry>,
            Arc::clone(&keystore) as Arc<dyn Keystore>,
            executor,
            Arc::clone(&consent),
        ));

        Self {
            config,
            registry,
            keystore,
            consent,
            router,
            relay_tx,
            endpoint: Mutex::new(Some(endpoint)),
        }
    }

    /// Start serving relayed requests and the request-id retention sweep.
    pub fn start(&self) {
        let Some(endpoint) = self.endpoint.lock().take() else {
            return;
        };
        tokio::spawn(endpoint.serve(Arc::new(RouterHandler(Arc::clone(&self.router)))));

        let router = Arc::clone(&self.router);
        let retention = Duration::from_secs(self.config.requests.retention_secs);
        let interval = Duration::from_secs(self.config.requests.prune_interval_secs);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                router.tracker().prune_resolved(retention);
            }
        });

        info!("Background context started");
    }

    /// Build a page context for one page at `origin`.
    pub fn open_page(&self, origin: Origin) -> Result<PageContext, ContextError> {
        let identity = WalletIdentity::new(
            self.config.identity.name.clone(),
            IconUri::new(self.config.identity.icon.clone())?,
            self.config.identity.version.clone(),
            ChainId::sui_chains(),
        )?;
        let features = FeatureSet::standard().merge(FeatureSet::sui())?;

        let relay = Arc::new(PageRelay::new(origin, self.relay_tx.clone()));
        let events = EventBus::new();
        let provider = WalletProvider::new(
            identity,
            features,
            Arc::clone(&self.registry) as Arc<dyn AccountRegistry>,
            Arc::clone(&relay),
            events.clone(),
        );

        debug!(origin = %relay.origin(), "Page context opened");
        Ok(PageContext {
            provider,
            events,
            relay,
        })
    }

    /// Tear down a page: its origin's connection state is forgotten.
    pub fn close_page(&self, page: &PageContext) {
        self.router.disconnect(page.origin());
    }

    /// Generate a keypair and store the account; the first account created
    /// becomes active.
    pub async fn create_account(&self, label: &str) -> WalletResult<Account> {
        let provisional = AccountId::generate();
        let public_key = self.keystore.generate(&provisional);
        let address = format!("0x{}", hex::encode(&public_key));

        let account = self
            .registry
            .add_account(AccountSpec::signer(label, address, public_key))
            .await?;
        self.keystore.rekey(&provisional, &account.id);

        info!(account = %account.id, label, "Account created");
        Ok(account)
    }

    /// Make `id` the only active account.
    pub async fn set_active_account(&self, id: &AccountId) -> WalletResult<()> {
        self.registry.set_active_account(id).await?;
        Ok(())
    }

    /// Delete an account and its key material.
    pub async fn delete_account(&self, id: &AccountId) -> WalletResult<()> {
        self.registry.delete_account(id).await?;
        self.keystore.remove(id);
        info!(account = %id, "Account deleted");
        Ok(())
    }

    #[must_use]
    pub fn consent(&self) -> Arc<ConsentCoordinator> {
        Arc::clone(&self.consent)
    }

    #[must_use]
    pub fn router(&self) -> Arc<RequestRouter> {
        Arc::clone(&self.router)
    }

    #[must_use]
    pub fn registry(&self) -> Arc<MemoryRegistry> {
        Arc::clone(&self.registry)
    }
}

/// One page's view of the wallet: the discoverable provider and its event
/// bus.
pub struct PageContext {
    pub provider: Arc<WalletProvider>,
    pub events: EventBus,
    relay: Arc<PageRelay>,
}

impl PageContext {
    #[must_use]
    pub fn origin(&self) -> &Origin {
        self.relay.origin()
    }
}
