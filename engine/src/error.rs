//! Error types for the Rally engine.

use crate::ProductId;
use thiserror::Error;

/// All possible errors from the Rally engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("product not in cart: {0}")]
    NotInCart(ProductId),

    #[error("product has no id assigned")]
    MissingProductId,

    #[error("quantity must be at least 1")]
    ZeroQuantity,
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::NotInCart("p-1".into());
        assert_eq!(err.to_string(), "product not in cart: p-1");

        let err = Error::MissingProductId;
        assert_eq!(err.to_string(), "product has no id assigned");
    }
}
