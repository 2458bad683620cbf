//! Account lifecycle across the context boundary.

#[cfg(test)]
mod tests {
    use crate::support::{background, ScriptedSurface};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use wallet_provider::ConnectOptions;
    use wallet_types::{AccountRegistry, Origin};

    fn dapp() -> Origin {
        Origin::new("https://dapp.example")
    }

    #[tokio::test]
    async fn test_first_account_active_in_page_view() {
        let surface = ScriptedSurface::approving();
        let context = background(&surface);
        let first = context.create_account("first").await.unwrap();
        context.create_account("second").await.unwrap();

        let page = context.open_page(dapp()).unwrap();
        let accounts = page
            .provider
            .connect(ConnectOptions::default())
            .await
            .unwrap();

        assert_eq!(accounts.len(), 2);
        let active: Vec<_> = accounts.iter().filter(|a| a.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, first.id);
    }

    #[tokio::test]
    async fn test_deleting_active_promotes_exactly_one() {
        let surface = ScriptedSurface::approving();
        let context = background(&surface);
        let first = context.create_account("first").await.unwrap();
        let second = context.create_account("second").await.unwrap();
        context.create_account("third").await.unwrap();

        context.delete_account(&first.id).await.unwrap();

        let accounts = context.registry().get_all_accounts().await.unwrap();
        let active: Vec<_> = accounts.iter().filter(|a| a.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second.id);
    }

    #[tokio::test]
    async fn test_deleting_last_account_leaves_none_active() {
        let surface = ScriptedSurface::approving();
        let context = background(&surface);
        let only = context.create_account("only").await.unwrap();

        context.delete_account(&only.id).await.unwrap();

        assert!(context
            .registry()
            .get_active_account()
            .await
            .unwrap()
            .is_none());
        assert!(context.registry().get_all_accounts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_change_event_once_per_refresh_change() {
        let surface = ScriptedSurface::approving();
        let context = background(&surface);
        let page = context.open_page(dapp()).unwrap();

        let changes = Arc::new(AtomicUsize::new(0));
        let changes_clone = Arc::clone(&changes);
        let _handle = page.provider.on_change(move |_| {
            changes_clone.fetch_add(1, Ordering::SeqCst);
        });

        context.create_account("main").await.unwrap();
        assert!(page.provider.refresh_accounts().await.unwrap());
        assert!(!page.provider.refresh_accounts().await.unwrap());

        // One account-set change, one event; the no-op refresh adds none.
        assert_eq!(changes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_set_active_is_exclusive_across_pages() {
        let surface = ScriptedSurface::approving();
        let context = background(&surface);
        context.create_account("first").await.unwrap();
        let second = context.create_account("second").await.unwrap();

        context.set_active_account(&second.id).await.unwrap();

        let page = context.open_page(dapp()).unwrap();
        let accounts = page
            .provider
            .connect(ConnectOptions::default())
            .await
            .unwrap();
        let active: Vec<_> = accounts.iter().filter(|a| a.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second.id);
    }
}
