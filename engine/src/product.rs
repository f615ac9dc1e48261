//! Product model shared by the cart and wishlist.

use crate::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A storefront product as stored in the remote "products" collection.
///
/// `id` is the remote document id. Documents fetched without one are
/// unusable for cart or wishlist operations and are skipped at load time
/// rather than propagated as errors.
///
/// `cart_quantity` is only meaningful while the product sits in a
/// [`CartStore`](crate::CartStore); a line with quantity 0 never stays in
/// the store - it is removed, not shown as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Remote document id; empty until assigned by the store
    #[serde(default)]
    pub id: ProductId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Display description
    #[serde(default)]
    pub description: String,
    /// Unit price, non-negative decimal
    #[serde(default)]
    pub price: Decimal,
    /// Category the product belongs to
    #[serde(default)]
    pub category_id: String,
    /// Tags for search and filtering
    #[serde(default)]
    pub tags: Vec<String>,
    /// Quantity of this product in the user's cart
    #[serde(default)]
    pub cart_quantity: u32,
    /// View counter maintained by the remote store
    #[serde(default)]
    pub views: u64,
    /// Ordered product image references
    #[serde(default)]
    pub image_urls: Vec<String>,
}

impl Product {
    /// Create a product with the fields the cart logic needs.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            category_id: String::new(),
            tags: Vec::new(),
            cart_quantity: 0,
            views: 0,
            image_urls: Vec::new(),
        }
    }

    /// Whether the remote store has assigned this product an id.
    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    /// Line total: `cart_quantity` times unit price.
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.cart_quantity) * self.price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_total() {
        let mut p = Product::new("p-1", "Paddle", Decimal::new(1000, 2)); // $10.00
        p.cart_quantity = 3;
        assert_eq!(p.line_total(), Decimal::new(3000, 2)); // $30.00
    }

    #[test]
    fn line_total_zero_quantity() {
        let p = Product::new("p-1", "Paddle", Decimal::new(1000, 2));
        assert_eq!(p.line_total(), Decimal::ZERO);
    }

    #[test]
    fn has_id() {
        assert!(Product::new("p-1", "Paddle", Decimal::ZERO).has_id());
        assert!(!Product::new("", "Paddle", Decimal::ZERO).has_id());
    }

    #[test]
    fn serialization_roundtrip() {
        let mut p = Product::new("p-1", "Carbon Paddle", Decimal::new(4999, 2));
        p.description = "Offensive blade".into();
        p.tags = vec!["paddle".into(), "carbon".into()];
        p.image_urls = vec!["https://cdn.rally.shop/p-1.jpg".into()];
        p.cart_quantity = 2;

        let json = serde_json::to_string(&p).unwrap();
        let parsed: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(p, parsed);
    }

    #[test]
    fn serialization_format() {
        let p = Product::new("p-1", "Paddle", Decimal::ZERO);
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("cartQuantity")); // camelCase
        assert!(json.contains("imageUrls"));
    }

    #[test]
    fn deserialize_partial_document() {
        // Remote documents may omit fields; defaults fill in.
        let p: Product = serde_json::from_str(r#"{"name":"Net"}"#).unwrap();
        assert_eq!(p.name, "Net");
        assert!(!p.has_id());
        assert_eq!(p.cart_quantity, 0);
    }
}
