//! The contract for talking to the remote document store.
//!
//! Everything the storefront persists - cart lines, wishlist membership -
//! goes through [`SyncGateway`]. Implementations wrap whatever document
//! service backs the shop; controllers receive one at construction, so a
//! test double slots in without any ambient global state.
//!
//! Delivery is at-least-once: callers must tolerate duplicate successful
//! completions of the same logical operation. Every operation is phrased so
//! a duplicate is a no-op (set this quantity, set this membership).

use rally_engine::{Product, ProductId, UserId};
use std::future::Future;
use thiserror::Error;

/// Opaque remote failure carrying a human-readable message.
///
/// The remote store reports no structured error codes; controllers only
/// surface the message and never branch on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GatewayError {
    /// Human-readable description of the failure
    pub message: String,
}

impl GatewayError {
    /// Create an error from any displayable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Asynchronous create/update/delete access to the remote cart and
/// wishlist documents.
///
/// Calls complete with success or a reported failure; there are no
/// partial-success states. Futures are `Send` so completions can be driven
/// from spawned tasks.
pub trait SyncGateway: Send + Sync + 'static {
    /// Create the cart line for `product` or set its quantity.
    ///
    /// Carries the full product so a first write can create the document;
    /// the quantity is absolute, making the call idempotent.
    fn upsert_cart_line(
        &self,
        user: UserId,
        product: Product,
        quantity: u32,
    ) -> impl Future<Output = GatewayResult<()>> + Send;

    /// Delete a cart line. Deleting an absent line succeeds.
    fn delete_cart_line(
        &self,
        user: UserId,
        product_id: ProductId,
    ) -> impl Future<Output = GatewayResult<()>> + Send;

    /// Set wishlist membership for a product. Idempotent: setting the same
    /// membership twice yields the same state as once.
    fn set_wishlist_membership(
        &self,
        user: UserId,
        product_id: ProductId,
        present: bool,
    ) -> impl Future<Output = GatewayResult<()>> + Send;

    /// Whether the product is currently in the user's wishlist.
    fn query_wishlist_membership(
        &self,
        user: UserId,
        product_id: ProductId,
    ) -> impl Future<Output = GatewayResult<bool>> + Send;

    /// All product ids in the user's wishlist.
    fn list_wishlist(&self, user: UserId)
        -> impl Future<Output = GatewayResult<Vec<ProductId>>> + Send;

    /// All cart line items for the user, quantities included.
    fn fetch_cart(&self, user: UserId) -> impl Future<Output = GatewayResult<Vec<Product>>> + Send;

    /// Full product documents for the user's wishlist.
    fn fetch_wishlist(
        &self,
        user: UserId,
    ) -> impl Future<Output = GatewayResult<Vec<Product>>> + Send;

    /// Remove every line from the user's cart.
    fn clear_cart(&self, user: UserId) -> impl Future<Output = GatewayResult<()>> + Send;

    /// Remove every entry from the user's wishlist.
    fn clear_wishlist(&self, user: UserId) -> impl Future<Output = GatewayResult<()>> + Send;
}
