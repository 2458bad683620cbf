//! # Wallet Events - Lifecycle Event Bus
//!
//! Per-wallet-instance subscription registry for the standardized wallet
//! events pages subscribe to through the `standard:events` feature.
//!
//! ## Delivery semantics
//!
//! - `on` registers a listener and returns an idempotent unsubscribe handle.
//! - `emit` delivers to a frozen snapshot of the current listeners: listeners
//!   added during delivery do not receive the in-flight event, and listeners
//!   removed during delivery do not receive it either.
//! - The bus itself never deduplicates or replays; firing exactly once per
//!   logical state change is the emitting component's responsibility.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod bus;
pub mod events;

// Re-export main types
pub use bus::{EventBus, ListenerHandle};
pub use events::{EventName, WalletEvent};
