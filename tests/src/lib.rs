//! # Reef Wallet Test Suite
//!
//! Cross-crate integration tests for the wallet provider core.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── support.rs        # Scripted approval surface shared by the suites
//! └── integration/
//!     ├── consent_flows.rs   # Single-flight consent, prompt counting
//!     ├── protocol_flows.rs  # End-to-end page scenarios, reply isolation
//!     └── account_flows.rs   # Account lifecycle across context boundaries
//! ```
//!
//! ## Running
//!
//! ```bash
//! cargo test -p wallet-tests
//! cargo test -p wallet-tests integration::consent_flows::
//! ```

#![allow(dead_code)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod integration;
pub mod support;
