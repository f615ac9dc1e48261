//! In-memory document store implementing [`SyncGateway`].
//!
//! Mirrors the remote store's shape: a product catalog plus per-user cart
//! and wishlist sub-collections. Used as the reference gateway in tests and
//! demos; failure injection and call counting let tests assert write-volume
//! bounds and failure handling without a network.

use crate::gateway::{GatewayError, GatewayResult, SyncGateway};
use rally_engine::{Product, ProductId, UserId};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct Documents {
    catalog: HashMap<ProductId, Product>,
    carts: HashMap<UserId, BTreeMap<ProductId, (Product, u32)>>,
    wishlists: HashMap<UserId, BTreeSet<ProductId>>,
    injected_failures: VecDeque<GatewayError>,
    call_counts: HashMap<String, usize>,
}

/// HashMap-backed gateway with injectable failures.
///
/// Cheap to clone; clones share the same documents.
#[derive(Clone, Default)]
pub struct MemoryGateway {
    docs: Arc<Mutex<Documents>>,
}

impl MemoryGateway {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a product document in the catalog.
    pub fn insert_product(&self, product: Product) {
        self.docs().catalog.insert(product.id.clone(), product);
    }

    /// Make the next gateway call (any operation) fail with `message`.
    /// Queued failures are consumed in order.
    pub fn fail_next(&self, message: impl Into<String>) {
        let err = GatewayError::new(message);
        self.docs().injected_failures.push_back(err);
    }

    /// How many times the named operation was called.
    pub fn call_count(&self, operation: &str) -> usize {
        self.docs()
            .call_counts
            .get(operation)
            .copied()
            .unwrap_or_default()
    }

    /// Remote-side cart quantity, for asserting what actually synced.
    pub fn stored_cart_quantity(&self, user: &str, product_id: &str) -> Option<u32> {
        self.docs()
            .carts
            .get(user)
            .and_then(|cart| cart.get(product_id))
            .map(|(_, quantity)| *quantity)
    }

    /// Remote-side wishlist membership.
    pub fn stored_wishlist_contains(&self, user: &str, product_id: &str) -> bool {
        self.docs()
            .wishlists
            .get(user)
            .is_some_and(|wishlist| wishlist.contains(product_id))
    }

    fn docs(&self) -> MutexGuard<'_, Documents> {
        self.docs.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Count the call and consume a queued failure if one is waiting.
    fn enter(&self, operation: &str) -> GatewayResult<MutexGuard<'_, Documents>> {
        let mut docs = self.docs();
        *docs.call_counts.entry(operation.to_string()).or_default() += 1;
        if let Some(err) = docs.injected_failures.pop_front() {
            return Err(err);
        }
        Ok(docs)
    }
}

impl SyncGateway for MemoryGateway {
    async fn upsert_cart_line(
        &self,
        user: UserId,
        product: Product,
        quantity: u32,
    ) -> GatewayResult<()> {
        let mut docs = self.enter("upsert_cart_line")?;
        docs.carts
            .entry(user)
            .or_default()
            .insert(product.id.clone(), (product, quantity));
        Ok(())
    }

    async fn delete_cart_line(&self, user: UserId, product_id: ProductId) -> GatewayResult<()> {
        let mut docs = self.enter("delete_cart_line")?;
        if let Some(cart) = docs.carts.get_mut(&user) {
            cart.remove(&product_id);
        }
        Ok(())
    }

    async fn set_wishlist_membership(
        &self,
        user: UserId,
        product_id: ProductId,
        present: bool,
    ) -> GatewayResult<()> {
        let mut docs = self.enter("set_wishlist_membership")?;
        let wishlist = docs.wishlists.entry(user).or_default();
        if present {
            wishlist.insert(product_id);
        } else {
            wishlist.remove(&product_id);
        }
        Ok(())
    }

    async fn query_wishlist_membership(
        &self,
        user: UserId,
        product_id: ProductId,
    ) -> GatewayResult<bool> {
        let docs = self.enter("query_wishlist_membership")?;
        Ok(docs
            .wishlists
            .get(&user)
            .is_some_and(|wishlist| wishlist.contains(&product_id)))
    }

    async fn list_wishlist(&self, user: UserId) -> GatewayResult<Vec<ProductId>> {
        let docs = self.enter("list_wishlist")?;
        Ok(docs
            .wishlists
            .get(&user)
            .map(|wishlist| wishlist.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn fetch_cart(&self, user: UserId) -> GatewayResult<Vec<Product>> {
        let docs = self.enter("fetch_cart")?;
        Ok(docs
            .carts
            .get(&user)
            .map(|cart| {
                cart.values()
                    .map(|(product, quantity)| {
                        let mut product = product.clone();
                        product.cart_quantity = *quantity;
                        product
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn fetch_wishlist(&self, user: UserId) -> GatewayResult<Vec<Product>> {
        let docs = self.enter("fetch_wishlist")?;
        let ids: Vec<ProductId> = docs
            .wishlists
            .get(&user)
            .map(|wishlist| wishlist.iter().cloned().collect())
            .unwrap_or_default();
        Ok(ids
            .iter()
            .filter_map(|id| docs.catalog.get(id).cloned())
            .collect())
    }

    async fn clear_cart(&self, user: UserId) -> GatewayResult<()> {
        let mut docs = self.enter("clear_cart")?;
        docs.carts.remove(&user);
        Ok(())
    }

    async fn clear_wishlist(&self, user: UserId) -> GatewayResult<()> {
        let mut docs = self.enter("clear_wishlist")?;
        docs.wishlists.remove(&user);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn paddle() -> Product {
        Product::new("p-1", "Paddle", Decimal::new(1000, 2))
    }

    #[tokio::test]
    async fn upsert_is_idempotent() {
        let gateway = MemoryGateway::new();
        gateway
            .upsert_cart_line("u".into(), paddle(), 3)
            .await
            .unwrap();
        gateway
            .upsert_cart_line("u".into(), paddle(), 3)
            .await
            .unwrap();
        assert_eq!(gateway.stored_cart_quantity("u", "p-1"), Some(3));
        assert_eq!(gateway.call_count("upsert_cart_line"), 2);
    }

    #[tokio::test]
    async fn membership_set_twice_equals_once() {
        let gateway = MemoryGateway::new();
        gateway
            .set_wishlist_membership("u".into(), "p-1".into(), true)
            .await
            .unwrap();
        gateway
            .set_wishlist_membership("u".into(), "p-1".into(), true)
            .await
            .unwrap();
        assert!(gateway.stored_wishlist_contains("u", "p-1"));
        assert_eq!(gateway.list_wishlist("u".into()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_absent_line_succeeds() {
        let gateway = MemoryGateway::new();
        gateway
            .delete_cart_line("u".into(), "ghost".into())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn injected_failure_is_consumed_in_order() {
        let gateway = MemoryGateway::new();
        gateway.fail_next("write rejected");

        let err = gateway
            .upsert_cart_line("u".into(), paddle(), 1)
            .await
            .unwrap_err();
        assert_eq!(err.message, "write rejected");

        // The failure was consumed; the next call succeeds.
        gateway
            .upsert_cart_line("u".into(), paddle(), 1)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn fetch_wishlist_resolves_catalog_documents() {
        let gateway = MemoryGateway::new();
        gateway.insert_product(paddle());
        gateway
            .set_wishlist_membership("u".into(), "p-1".into(), true)
            .await
            .unwrap();

        let products = gateway.fetch_wishlist("u".into()).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Paddle");
    }
}
