//! End-to-end protocol scenarios and reply routing.

#[cfg(test)]
mod tests {
    use crate::support::{background, ScriptedSurface};
    use async_trait::async_trait;
    use ed25519_dalek::{Signature, Verifier as _, VerifyingKey};
    use std::sync::Arc;
    use std::time::Duration;
    use wallet_consent::ConsentCoordinator;
    use wallet_provider::ConnectOptions;
    use wallet_router::{
        ReplyData, ReplyEnvelope, RequestEnvelope, RequestPayload, RequestRouter,
    };
    use wallet_runtime::StaticLedgerExecutor;
    use wallet_transport::{channel, EnvelopeHandler, PageRelay};
    use wallet_types::{
        encoding, AccountRegistry, Keystore, MemoryKeystore, MemoryRegistry, Origin, WalletError,
    };

    fn dapp() -> Origin {
        Origin::new("https://dapp.example")
    }

    fn other() -> Origin {
        Origin::new("https://other.example")
    }

    /// The spec scenario: dapp.example connects, gets one account, signs a
    /// personal message; the signature verifies against the account's own
    /// public key; a second origin runs its own independent flow.
    #[tokio::test]
    async fn test_page_scenario_connect_then_sign() {
        let surface = ScriptedSurface::approving();
        let context = background(&surface);
        let account = context.create_account("main").await.unwrap();
        assert!(account.address.starts_with("0x"));

        let page = context.open_page(dapp()).unwrap();
        let accounts = page
            .provider
            .connect(ConnectOptions::default())
            .await
            .unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].address, account.address);

        let signed = page
            .provider
            .sign_personal_message(&account.id, b"hello reef")
            .await
            .unwrap();

        let message = encoding::decode(&signed.bytes).unwrap();
        let signature = encoding::decode(&signed.signature).unwrap();
        assert_eq!(message, b"hello reef");

        let verifying =
            VerifyingKey::from_bytes(account.public_key.as_slice().try_into().unwrap()).unwrap();
        let signature = Signature::from_slice(&signature).unwrap();
        verifying.verify(&message, &signature).unwrap();

        // A second origin runs its own prompt and flow concurrently.
        let page_b = context.open_page(other()).unwrap();
        let accounts_b = page_b
            .provider
            .connect(ConnectOptions::default())
            .await
            .unwrap();
        assert_eq!(accounts_b.len(), 1);
        assert_eq!(surface.prompt_count(&dapp()), 1);
        assert_eq!(surface.prompt_count(&other()), 1);
    }

    #[tokio::test]
    async fn test_sign_before_connect_is_gated() {
        let surface = ScriptedSurface::approving();
        let context = background(&surface);
        let account = context.create_account("main").await.unwrap();

        let page = context.open_page(dapp()).unwrap();
        page.provider.refresh_accounts().await.unwrap();

        let err = page
            .provider
            .sign_personal_message(&account.id, b"early")
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::NotConnected(_)));
    }

    #[tokio::test]
    async fn test_sign_and_execute_full_path() {
        let surface = ScriptedSurface::approving();
        let context = background(&surface);
        let account = context.create_account("main").await.unwrap();

        let page = context.open_page(dapp()).unwrap();
        page.provider
            .connect(ConnectOptions::default())
            .await
            .unwrap();

        let executed = page
            .provider
            .sign_and_execute_transaction(&account.id, b"transaction bytes")
            .await
            .unwrap();
        assert!(executed.digest.starts_with("0x"));
        assert_eq!(
            encoding::decode(&executed.bytes).unwrap(),
            b"transaction bytes"
        );
        assert_eq!(encoding::decode(&executed.effects).unwrap(), b"executed");
    }

    struct RouterHandler(Arc<RequestRouter>);

    #[async_trait]
    impl EnvelopeHandler for RouterHandler {
        async fn handle(&self, envelope: RequestEnvelope) -> Option<ReplyEnvelope> {
            self.0.handle(envelope).await
        }
    }

    fn raw_stack(surface: &Arc<ScriptedSurface>) -> (Arc<RequestRouter>, PageRelay, PageRelay) {
        let coordinator = Arc::new(ConsentCoordinator::new(
            Arc::clone(surface) as _,
            Duration::from_secs(5),
        ));
        surface.attach(&coordinator);
        let router = Arc::new(RequestRouter::new(
            Arc::new(MemoryRegistry::new()) as Arc<dyn AccountRegistry>,
            Arc::new(MemoryKeystore::new()) as Arc<dyn Keystore>,
            Arc::new(StaticLedgerExecutor),
            coordinator,
        ));
        let (tx, endpoint) = channel(16);
        tokio::spawn(endpoint.serve(Arc::new(RouterHandler(Arc::clone(&router)))));
        (
            router,
            PageRelay::new(dapp(), tx.clone()),
            PageRelay::new(other(), tx),
        )
    }

    #[tokio::test]
    async fn test_correlation_id_survives_round_trip() {
        let surface = ScriptedSurface::approving();
        let (_router, relay, _relay_b) = raw_stack(&surface);

        let envelope = RequestEnvelope::new(dapp(), RequestPayload::Connect { silent: false });
        let id = envelope.id;
        let reply = relay.forward(envelope).await.unwrap().unwrap();
        assert_eq!(reply.id, id);
    }

    #[tokio::test]
    async fn test_replies_match_their_origin() {
        let surface = ScriptedSurface::approving();
        surface.script(&other(), false);
        let (_router, relay_a, relay_b) = raw_stack(&surface);
        let relay_a = Arc::new(relay_a);
        let relay_b = Arc::new(relay_b);

        // Interleave: A is scripted to approve, B to deny. A crossed reply
        // would surface as the wrong variant on the wrong side.
        let mut tasks = Vec::new();
        for _ in 0..8 {
            let a = Arc::clone(&relay_a);
            tasks.push(tokio::spawn(async move {
                let envelope =
                    RequestEnvelope::new(a.origin().clone(), RequestPayload::Connect {
                        silent: false,
                    });
                let reply = a.forward(envelope).await.unwrap().unwrap();
                assert!(matches!(
                    reply.into_result(),
                    Ok(ReplyData::Accounts(_))
                ));
            }));
            let b = Arc::clone(&relay_b);
            tasks.push(tokio::spawn(async move {
                let envelope =
                    RequestEnvelope::new(b.origin().clone(), RequestPayload::Connect {
                        silent: false,
                    });
                let reply = b.forward(envelope).await.unwrap().unwrap();
                assert!(matches!(
                    reply.into_result(),
                    Err(WalletError::UserRejected)
                ));
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_duplicate_request_id_dropped_after_resolution() {
        let surface = ScriptedSurface::approving();
        let (_router, relay, _relay_b) = raw_stack(&surface);

        let envelope = RequestEnvelope::new(dapp(), RequestPayload::Connect { silent: false });
        let first = relay.forward(envelope.clone()).await.unwrap();
        assert!(first.is_some());

        let replay = relay.forward(envelope).await.unwrap();
        assert!(replay.is_none(), "replayed id must not be reprocessed");
    }
}
