//! Approval surface port.
//!
//! The user-facing approval UI lives in its own execution context; the
//! coordinator only asks it to present a request. The eventual decision comes
//! back through [`crate::ConsentCoordinator::resolve`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wallet_types::Origin;

/// What the approval surface shows the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentRequest {
    /// The origin asking to connect.
    pub origin: Origin,
}

/// Errors from presenting the approval surface.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SurfaceError {
    /// The UI host could not be opened (no window, context torn down).
    #[error("approval surface unavailable: {0}")]
    Unavailable(String),
}

/// Port to the user-facing approval surface.
#[async_trait]
pub trait ApprovalSurface: Send + Sync {
    /// Present the request to the user.
    ///
    /// Returning `Ok` means the prompt is on screen; it does NOT carry the
    /// decision. Failure here is a system error, distinct from the user
    /// declining.
    async fn present(&self, request: ConsentRequest) -> Result<(), SurfaceError>;
}
