//! # Rally Engine
//!
//! The deterministic state core behind the Rally storefront's cart and
//! wishlist screens.
//!
//! Mobile storefront UIs take rapid, repeated edits (tapping +/- many times,
//! toggling a heart icon back and forth) against state that also lives in a
//! remote document store. This crate holds the logic that keeps the local
//! view consistent under that load while bounding network writes:
//!
//! - [`CartStore`] - the authoritative ordered collection of cart line items
//! - [`DebounceMap`] - coalesces rapid quantity changes into one pending
//!   write per product, guarded by generation counters
//! - [`WishlistState`] - optimistic membership state machine with
//!   last-tap-wins semantics
//!
//! ## Design Principles
//!
//! - **No IO**: the engine has no knowledge of timers, network, or platform.
//!   Time enters as an explicit [`Timestamp`] argument.
//! - **Deterministic**: same inputs always produce same outputs
//! - **Testable**: pure logic, no mocks needed
//!
//! The async side - gateway calls, debounce timers, completion delivery -
//! lives in the `rally-client` crate, which drives this engine.
//!
//! ## Quick Start
//!
//! ```rust
//! use rally_engine::{CartStore, DebounceMap, DecrementOutcome, Product};
//! use rust_decimal::Decimal;
//!
//! let paddle = Product::new("p-1", "Carbon Paddle", Decimal::new(4999, 2));
//!
//! let mut cart = CartStore::new();
//! cart.add(paddle, 2).unwrap();
//!
//! // Three rapid taps, one pending write.
//! let mut debounce = DebounceMap::new(500);
//! let q = cart.increment("p-1").unwrap();
//! debounce.schedule("p-1", 1, q, 1_000);
//! let q = cart.increment("p-1").unwrap();
//! debounce.schedule("p-1", 1, q, 1_100);
//! let q = match cart.decrement("p-1").unwrap() {
//!     DecrementOutcome::Decremented(q) => q,
//!     DecrementOutcome::RemoveLine => unreachable!(),
//! };
//! let generation = debounce.schedule("p-1", -1, q, 1_200);
//!
//! // Only the latest generation fires, carrying the final quantity.
//! let write = debounce.take_due("p-1", generation, 1_700).unwrap();
//! assert_eq!(write.quantity, 3);
//! assert_eq!(write.delta, 1);
//! ```

pub mod cart;
pub mod debounce;
pub mod error;
pub mod product;
pub mod wishlist;

// Re-export main types at crate root
pub use cart::{CartStore, DecrementOutcome};
pub use debounce::{DebounceMap, PendingWrite, DEFAULT_DEBOUNCE_WINDOW_MS};
pub use error::Error;
pub use product::Product;
pub use wishlist::{Membership, TapToken, ToggleIntent, WishlistState};

/// Type aliases for clarity
pub type ProductId = String;
pub type UserId = String;
pub type Timestamp = u64;
pub type Generation = u64;
