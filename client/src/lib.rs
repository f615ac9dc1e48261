//! # Rally Client
//!
//! Async orchestration for the Rally storefront's cart and wishlist sync.
//!
//! The deterministic state logic lives in `rally-engine`; this crate drives
//! it on tokio against a remote document store reached through the
//! [`SyncGateway`] trait:
//!
//! - [`CartController`] - optimistic cart mutations with debounced remote
//!   writes (one upsert per quiescence window, however fast the user taps)
//! - [`WishlistController`] - optimistic heart toggling with rollback on
//!   failure and last-tap-wins under out-of-order completions
//! - [`MemoryGateway`] - in-memory reference gateway and test double
//!
//! Controllers receive their gateway and [`AuthProvider`] at construction;
//! there is no ambient global store. UI layers hook the change listener for
//! redraws, the cart-changed listener for summary totals, and the
//! [`Notice`] sink for everything toast-shaped.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rally_client::{CartController, Config, MemoryGateway, StaticAuth};
//! use rally_engine::Product;
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), rally_client::ClientError> {
//! let gateway = MemoryGateway::new();
//! let auth = Arc::new(StaticAuth::signed_in("user-1"));
//! let cart = CartController::new(gateway, auth, Config::default());
//!
//! cart.add(Product::new("p-1", "Carbon Paddle", Decimal::new(4999, 2)), 1)?;
//! cart.increment("p-1")?;
//! // After ~500ms of quiescence, exactly one upsert with quantity 2 fires.
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod cart;
pub mod config;
pub mod error;
pub mod events;
pub mod gateway;
pub mod memory;
pub mod wishlist;

// Re-export main types at crate root
pub use auth::{AuthProvider, StaticAuth};
pub use cart::CartController;
pub use config::{Config, ConfigError};
pub use error::ClientError;
pub use events::{CartChangedListener, ChangeListener, Notice, NoticeSink};
pub use gateway::{GatewayError, GatewayResult, SyncGateway};
pub use memory::MemoryGateway;
pub use wishlist::WishlistController;
