//! # Wallet Transport - Cross-Context Message Bridge
//!
//! The relay between a page's untrusted global message channel and the
//! privileged background context. One [`PageRelay`] exists per page; all
//! relays feed one [`BackgroundEndpoint`].
//!
//! ## Guarantees
//!
//! - **Target filtering**: page messages without the wallet target marker are
//!   ignored, never parsed or forwarded.
//! - **Origin stamping**: the relay overwrites the envelope origin with its
//!   own verified origin; page content cannot speak for another site.
//! - **Sender-preserving replies**: the reply path is captured per request at
//!   receipt, so a reply can only ever reach the page that sent the request.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod bridge;
pub mod relay;

// Re-export main types
pub use bridge::{channel, BackgroundEndpoint, EnvelopeHandler, Transfer, DEFAULT_CHANNEL_CAPACITY};
pub use relay::{PageRelay, TransportError};
