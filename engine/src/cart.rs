//! Cart State Store - the authoritative in-memory cart.
//!
//! The store owns the ordered sequence of line items the cart screen shows.
//! User actions mutate it synchronously (optimistic); remote confirmations
//! never touch it directly - they only report back to the controller that
//! owns it.

use crate::error::{Error, Result};
use crate::{Product, ProductId};
use rust_decimal::Decimal;

/// Outcome of a decrement on a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecrementOutcome {
    /// Quantity was reduced; carries the new quantity (still >= 1)
    Decremented(u32),
    /// Quantity was 1: the line must be removed, not set to 0
    RemoveLine,
}

/// The ordered collection of cart line items.
///
/// Invariant: no line with `cart_quantity == 0` is ever observable. A
/// decrement at quantity 1 reports [`DecrementOutcome::RemoveLine`] so the
/// caller routes it through [`CartStore::remove`] instead.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    items: Vec<Product>,
}

impl CartStore {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add a product as a new line item with the given starting quantity.
    ///
    /// If the product is already in the cart its quantity is increased
    /// instead - the cart never holds duplicate lines for one id.
    pub fn add(&mut self, product: Product, quantity: u32) -> Result<u32> {
        if !product.has_id() {
            return Err(Error::MissingProductId);
        }
        if quantity == 0 {
            return Err(Error::ZeroQuantity);
        }

        if let Some(existing) = self.find_mut(&product.id) {
            existing.cart_quantity += quantity;
            return Ok(existing.cart_quantity);
        }

        let mut product = product;
        product.cart_quantity = quantity;
        self.items.push(product);
        Ok(quantity)
    }

    /// Increase a line's quantity by one. The line must exist.
    pub fn increment(&mut self, id: &str) -> Result<u32> {
        let item = self
            .find_mut(id)
            .ok_or_else(|| Error::NotInCart(id.to_string()))?;
        item.cart_quantity += 1;
        Ok(item.cart_quantity)
    }

    /// Decrease a line's quantity by one.
    ///
    /// At quantity 1 the line is left untouched and
    /// [`DecrementOutcome::RemoveLine`] is returned; the caller removes the
    /// line and issues a delete, never a quantity-0 update.
    pub fn decrement(&mut self, id: &str) -> Result<DecrementOutcome> {
        let item = self
            .find_mut(id)
            .ok_or_else(|| Error::NotInCart(id.to_string()))?;
        if item.cart_quantity <= 1 {
            return Ok(DecrementOutcome::RemoveLine);
        }
        item.cart_quantity -= 1;
        Ok(DecrementOutcome::Decremented(item.cart_quantity))
    }

    /// Remove a line from the visible collection, returning it.
    pub fn remove(&mut self, id: &str) -> Result<Product> {
        let pos = self
            .items
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| Error::NotInCart(id.to_string()))?;
        Ok(self.items.remove(pos))
    }

    /// Sum of all line totals. Pure, O(n) over visible items.
    pub fn totals(&self) -> Decimal {
        self.items.iter().map(Product::line_total).sum()
    }

    /// Replace the cart contents from a bulk remote fetch.
    ///
    /// Documents without an id are skipped, not crash-propagated. Fetched
    /// quantities are clamped to at least 1 so the no-zero-line invariant
    /// holds even against malformed remote data.
    pub fn load(&mut self, items: impl IntoIterator<Item = Product>) {
        self.items = items
            .into_iter()
            .filter(Product::has_id)
            .map(|mut p| {
                p.cart_quantity = p.cart_quantity.max(1);
                p
            })
            .collect();
    }

    /// Get a line item by product id.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.items.iter().find(|p| p.id == id)
    }

    /// Current quantity of a line item, if present.
    pub fn quantity(&self, id: &str) -> Option<u32> {
        self.get(id).map(|p| p.cart_quantity)
    }

    /// Whether the cart holds a line for this id.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// The visible line items, in display order.
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// Count of visible line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart has no line items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove all line items.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Ids of all visible line items, in display order.
    pub fn ids(&self) -> Vec<ProductId> {
        self.items.iter().map(|p| p.id.clone()).collect()
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Product> {
        self.items.iter_mut().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paddle() -> Product {
        Product::new("p-1", "Carbon Paddle", Decimal::new(1000, 2)) // $10.00
    }

    fn ball() -> Product {
        Product::new("p-2", "3-Star Ball", Decimal::new(250, 2)) // $2.50
    }

    #[test]
    fn add_new_line() {
        let mut cart = CartStore::new();
        assert_eq!(cart.add(paddle(), 2).unwrap(), 2);
        assert_eq!(cart.quantity("p-1"), Some(2));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn add_existing_line_merges() {
        let mut cart = CartStore::new();
        cart.add(paddle(), 2).unwrap();
        assert_eq!(cart.add(paddle(), 3).unwrap(), 5);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn add_rejects_missing_id() {
        let mut cart = CartStore::new();
        let anonymous = Product::new("", "Mystery", Decimal::ZERO);
        assert_eq!(cart.add(anonymous, 1), Err(Error::MissingProductId));
    }

    #[test]
    fn add_rejects_zero_quantity() {
        let mut cart = CartStore::new();
        assert_eq!(cart.add(paddle(), 0), Err(Error::ZeroQuantity));
    }

    #[test]
    fn increment_existing() {
        let mut cart = CartStore::new();
        cart.add(paddle(), 2).unwrap();
        assert_eq!(cart.increment("p-1").unwrap(), 3);
    }

    #[test]
    fn increment_missing() {
        let mut cart = CartStore::new();
        assert_eq!(
            cart.increment("ghost"),
            Err(Error::NotInCart("ghost".into()))
        );
    }

    #[test]
    fn decrement_above_one() {
        let mut cart = CartStore::new();
        cart.add(paddle(), 2).unwrap();
        assert_eq!(
            cart.decrement("p-1").unwrap(),
            DecrementOutcome::Decremented(1)
        );
        assert_eq!(cart.quantity("p-1"), Some(1));
    }

    #[test]
    fn decrement_at_one_routes_to_removal() {
        let mut cart = CartStore::new();
        cart.add(paddle(), 1).unwrap();
        assert_eq!(cart.decrement("p-1").unwrap(), DecrementOutcome::RemoveLine);
        // The store itself does not remove; quantity is untouched.
        assert_eq!(cart.quantity("p-1"), Some(1));
    }

    #[test]
    fn remove_line() {
        let mut cart = CartStore::new();
        cart.add(paddle(), 2).unwrap();
        cart.add(ball(), 1).unwrap();
        let removed = cart.remove("p-1").unwrap();
        assert_eq!(removed.id, "p-1");
        assert!(!cart.contains("p-1"));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn remove_missing() {
        let mut cart = CartStore::new();
        assert_eq!(cart.remove("ghost"), Err(Error::NotInCart("ghost".into())));
    }

    #[test]
    fn totals_sum_line_totals() {
        let mut cart = CartStore::new();
        cart.add(paddle(), 3).unwrap(); // $30.00
        cart.add(ball(), 4).unwrap(); // $10.00
        assert_eq!(cart.totals(), Decimal::new(4000, 2));
    }

    #[test]
    fn totals_empty_cart() {
        assert_eq!(CartStore::new().totals(), Decimal::ZERO);
    }

    #[test]
    fn load_skips_documents_without_id() {
        let mut cart = CartStore::new();
        let mut good = paddle();
        good.cart_quantity = 2;
        let broken = Product::new("", "Broken", Decimal::ONE);
        cart.load(vec![good, broken]);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity("p-1"), Some(2));
    }

    #[test]
    fn load_clamps_quantity_to_one() {
        let mut cart = CartStore::new();
        let zeroed = paddle(); // cart_quantity defaults to 0
        cart.load(vec![zeroed]);
        assert_eq!(cart.quantity("p-1"), Some(1));
    }

    #[test]
    fn load_replaces_previous_contents() {
        let mut cart = CartStore::new();
        cart.add(paddle(), 2).unwrap();
        cart.load(vec![ball()]);
        assert!(!cart.contains("p-1"));
        assert!(cart.contains("p-2"));
    }

    #[test]
    fn display_order_is_insertion_order() {
        let mut cart = CartStore::new();
        cart.add(paddle(), 1).unwrap();
        cart.add(ball(), 1).unwrap();
        assert_eq!(cart.ids(), vec!["p-1".to_string(), "p-2".to_string()]);
    }
}
