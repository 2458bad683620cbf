//! # Wallet Runtime - Context Wiring and Entry Point
//!
//! Constructs the wallet's execution contexts and ties the crates together:
//!
//! - [`BackgroundContext`] - the privileged side: router, consent
//!   coordinator, registry, keystore, and the background end of the
//!   transport.
//! - [`PageContext`] - one per page: the discoverable provider and its event
//!   bus, speaking to the background through an origin-bound relay.
//!
//! Configuration is typed with `WALLET_*` environment overrides; the binary
//! initializes logging, validates config, and runs a demonstration flow.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod config;
pub mod context;
pub mod dev;

// Re-export main types
pub use config::{ConfigError, WalletConfig};
pub use context::{BackgroundContext, ContextError, PageContext};
pub use dev::{AutoApprovalSurface, StaticLedgerExecutor};
