//! # Wallet Types - Shared Domain Types for the Wallet Core
//!
//! Defines the vocabulary every other wallet crate speaks:
//!
//! - **Accounts** and their lifecycle ([`Account`], [`AccountId`], [`AccountSpec`])
//! - **Chains** and **features** as closed enumerations ([`ChainId`], [`FeatureName`])
//! - **Origins**, the security boundary identifying a requesting page ([`Origin`])
//! - The **error taxonomy** shared across contexts ([`WalletError`])
//! - Collaborator **ports**: the durable account store ([`AccountRegistry`])
//!   and the private-key holder ([`Keystore`]), with in-memory reference
//!   implementations for wiring and tests.
//!
//! The registry and keystore are external collaborators of the core: this
//! crate owns their contracts, not their production storage.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod account;
pub mod chain;
pub mod encoding;
pub mod errors;
pub mod feature;
pub mod keystore;
pub mod origin;
pub mod registry;

// Re-export main types
pub use account::{Account, AccountId, AccountSpec};
pub use chain::ChainId;
pub use errors::{KeystoreError, RegistryError, WalletError, WalletResult};
pub use feature::FeatureName;
pub use keystore::{Keystore, MemoryKeystore};
pub use origin::Origin;
pub use registry::{AccountRegistry, MemoryRegistry};
