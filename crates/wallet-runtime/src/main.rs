//! Wallet runtime binary.
//!
//! Wires a background context with the development ports, opens a page
//! context, and runs a connect/sign round trip so the whole protocol path is
//! exercised end to end.

use anyhow::{Context as _, Result};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use wallet_consent::ApprovalSurface;
use wallet_provider::ConnectOptions;
use wallet_runtime::{AutoApprovalSurface, BackgroundContext, StaticLedgerExecutor, WalletConfig};
use wallet_types::Origin;

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = WalletConfig::from_env();
    config.validate().context("Invalid configuration")?;

    let surface = AutoApprovalSurface::new(true);
    let background = BackgroundContext::new(
        config,
        Arc::clone(&surface) as Arc<dyn ApprovalSurface>,
        Arc::new(StaticLedgerExecutor),
    );
    surface.attach(&background.consent());
    background.start();

    let account = background
        .create_account("main")
        .await
        .context("Failed to create account")?;
    info!(address = %account.address, "Demo account ready");

    let page = background.open_page(Origin::new("https://dapp.example"))?;
    let accounts = page.provider.connect(ConnectOptions::default()).await?;
    info!(accounts = accounts.len(), "Page connected");

    let signed = page
        .provider
        .sign_personal_message(&account.id, b"hello from reef")
        .await?;
    info!(signature = %signed.signature, "Message signed");

    let executed = page
        .provider
        .sign_and_execute_transaction(&account.id, b"demo transaction bytes")
        .await?;
    info!(digest = %executed.digest, "Transaction executed");

    page.provider
        .report_transaction_effects(serde_json::json!({ "digest": executed.digest }))
        .await;

    info!("Wallet runtime is up. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    background.close_page(&page);
    info!("Shutdown complete");
    Ok(())
}
