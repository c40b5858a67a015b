//! # vitrine-core: Pure Storefront Logic for Vitrine
//!
//! This crate is the **heart** of Vitrine. It holds the storefront rules
//! (cart math, catalog mirror, input validation) as plain data and pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vitrine Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Front End (vitrine CLI)                      │   │
//! │  │    Browse ──► Cart ──► Checkout ──► Admin CRUD                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            vitrine-client (stores + REST client)                │   │
//! │  │    AuthStore, CatalogStore, CartStore, StorefrontSession        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ vitrine-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │  catalog  │  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │  Catalog  │  │   │
//! │  │   │   User    │  │  (cents)  │  │ CartItem  │  │  filters  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO GLOBAL STATE • PURE FUNCTIONS       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Category, User, payloads)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Shopping cart with unique entries and derived totals
//! - [`catalog`] - Local mirror of the server catalog
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use vitrine_core::{Cart, Money, Product, ProductId, CategoryId};
//!
//! let product = Product::new(ProductId(1), "Mug", Money::from_cents(1000), 5, CategoryId(1));
//!
//! let mut cart = Cart::new();
//! cart.add_item(&product, 2).unwrap();
//!
//! assert_eq!(cart.total_price(), Money::from_cents(2000));
//! assert_eq!(cart.total_items(), 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use vitrine_core::Money` instead of
// `use vitrine_core::money::Money`

pub use cart::{Cart, CartItem, CartTotals};
pub use catalog::Catalog;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct products allowed in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and keeps checkout payloads reasonable.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single product in cart
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_ITEM_QUANTITY: u32 = 999;
