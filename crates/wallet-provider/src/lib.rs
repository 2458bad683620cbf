//! # Wallet Provider - The Page-Discoverable Capability Surface
//!
//! The object a page discovers and calls into to use wallet features:
//! immutable identity, the advertised feature registry, a read-through
//! account snapshot, and the connect/sign/execute/report operations.
//!
//! ## Guarantees
//!
//! - **Rejection is not an error.** A declined connect resolves to an empty
//!   account list; thrown failures are reserved for transport and system
//!   faults.
//! - **Idempotent re-connect.** With accounts already in the snapshot,
//!   connect returns them without a second prompt.
//! - **Uniform encoding.** Every byte payload crossing the page boundary is
//!   base64; no method mixes encodings.
//! - **Placeholder discipline.** An advertised feature with no implementation
//!   deterministically yields `NotImplemented`, never a silent success.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod features;
pub mod identity;
pub mod provider;

// Re-export main types
pub use features::{FeatureConflict, FeatureEntry, FeatureSet, FeatureStatus};
pub use identity::{IconUri, IdentityError, WalletIdentity};
pub use provider::{ConnectOptions, ExecutedTransaction, SignedPayload, WalletProvider};
