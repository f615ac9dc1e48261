//! Unified error handling for the sync client.

use crate::gateway::GatewayError;

/// Client error type.
///
/// Only precondition failures reach callers: remote failures are caught at
/// the gateway boundary and surfaced as [`Notice`](crate::Notice)s, never
/// propagated upward.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("Engine error: {0}")]
    Engine(#[from] rally_engine::Error),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Sign in required")]
    SignInRequired,
}

/// Result type alias for controller operations.
pub type Result<T> = std::result::Result<T, ClientError>;
