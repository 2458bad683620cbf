//! Single-flight consent under concurrency.
//!
//! These suites drive the full stack (provider → relay → router → consent
//! coordinator) and count prompts at the approval surface, verifying that
//! one origin's burst of requests costs exactly one user decision.

#[cfg(test)]
mod tests {
    use crate::support::{background, ScriptedSurface};
    use std::sync::Arc;
    use wallet_provider::ConnectOptions;
    use wallet_types::Origin;

    fn dapp() -> Origin {
        Origin::new("https://dapp.example")
    }

    #[tokio::test]
    async fn test_concurrent_connects_one_prompt_same_decision() {
        let surface = ScriptedSurface::approving();
        let context = Arc::new(background(&surface));
        context.create_account("main").await.unwrap();

        let mut tasks = Vec::new();
        for _ in 0..6 {
            let page = context.open_page(dapp()).unwrap();
            tasks.push(tokio::spawn(async move {
                page.provider.connect(ConnectOptions::default()).await
            }));
        }

        for result in futures::future::join_all(tasks).await {
            let accounts = result.unwrap().unwrap();
            assert_eq!(accounts.len(), 1, "every caller sees the same decision");
        }
        assert_eq!(surface.prompt_count(&dapp()), 1);
    }

    #[tokio::test]
    async fn test_origins_prompt_independently() {
        let surface = ScriptedSurface::approving();
        let other = Origin::new("https://other.example");
        surface.script(&other, false);

        let context = Arc::new(background(&surface));
        context.create_account("main").await.unwrap();

        let page_a = context.open_page(dapp()).unwrap();
        let page_b = context.open_page(other.clone()).unwrap();

        let (a, b) = tokio::join!(
            page_a.provider.connect(ConnectOptions::default()),
            page_b.provider.connect(ConnectOptions::default()),
        );

        assert_eq!(a.unwrap().len(), 1);
        assert!(b.unwrap().is_empty(), "denied origin sees no accounts");
        assert_eq!(surface.prompt_count(&dapp()), 1);
        assert_eq!(surface.prompt_count(&other), 1);
    }

    #[tokio::test]
    async fn test_rejection_not_remembered() {
        let surface = ScriptedSurface::denying();
        let context = background(&surface);
        context.create_account("main").await.unwrap();
        let page = context.open_page(dapp()).unwrap();

        assert!(page
            .provider
            .connect(ConnectOptions::default())
            .await
            .unwrap()
            .is_empty());
        assert!(page
            .provider
            .connect(ConnectOptions::default())
            .await
            .unwrap()
            .is_empty());

        // Each attempt prompts afresh; the rejection is not sticky.
        assert_eq!(surface.prompt_count(&dapp()), 2);
    }

    #[tokio::test]
    async fn test_approved_connect_is_idempotent_without_reprompt() {
        let surface = ScriptedSurface::approving();
        let context = background(&surface);
        context.create_account("main").await.unwrap();
        let page = context.open_page(dapp()).unwrap();

        let first = page
            .provider
            .connect(ConnectOptions::default())
            .await
            .unwrap();
        let second = page
            .provider
            .connect(ConnectOptions::default())
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(surface.prompt_count(&dapp()), 1);
    }

    #[tokio::test]
    async fn test_silent_connect_never_prompts() {
        let surface = ScriptedSurface::approving();
        let context = background(&surface);
        context.create_account("main").await.unwrap();
        let page = context.open_page(dapp()).unwrap();

        let accounts = page
            .provider
            .connect(ConnectOptions { silent: true })
            .await
            .unwrap();

        assert!(accounts.is_empty());
        assert_eq!(surface.total_prompts(), 0);
    }
}
