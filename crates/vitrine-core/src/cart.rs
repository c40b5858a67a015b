//! # Cart
//!
//! The shopping cart: unique entries per product and derived totals.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  User Action              Method                  Cart Change           │
//! │  ───────────              ──────                  ───────────           │
//! │                                                                         │
//! │  Tap "Add" ──────────────► add_item() ──────────► push or qty += n     │
//! │                                                                         │
//! │  Tap "+" ────────────────► add_item(.., 1) ─────► qty += 1             │
//! │                                                                         │
//! │  Tap "-" ────────────────► decrease_item() ─────► qty -= 1 (0 → gone)  │
//! │                                                                         │
//! │  Tap "✖" ────────────────► remove_item() ───────► entry removed        │
//! │                                                                         │
//! │  Checkout / Logout ──────► clear() ─────────────► items.clear()        │
//! │                                                                         │
//! │  Badge / Footer ─────────► total_items() ───────► (read only)          │
//! │                            total_price()                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals are never cached: every read folds over the current entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CheckoutLine, Product, ProductId};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// An entry in the shopping cart.
///
/// ## Design Notes
/// `product` is a snapshot taken when the entry was created. The cart keeps
/// showing that name and price even if the catalog refreshes underneath it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product snapshot at time of adding
    pub product: Product,

    /// Quantity in cart (always >= 1)
    pub quantity: u32,
}

impl CartItem {
    /// The product this entry refers to.
    #[inline]
    pub fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Calculates the line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.product.price * self.quantity
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by product id (adding same product increases quantity)
/// - Quantity is always > 0 (reaching 0 removes the entry)
/// - Held quantity never exceeds the stock known when it was requested
/// - Maximum entries: [`MAX_CART_ITEMS`]
/// - Maximum quantity per entry: [`MAX_ITEM_QUANTITY`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,

    /// When the cart was created/last cleared
    created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds a product to the cart or increases quantity if already present.
    ///
    /// ## Behavior
    /// - If product already in cart: quantity accumulates
    /// - If product not in cart: a new entry is created from `product`
    /// - The resulting quantity is checked against `product.stock`
    ///
    /// ## Errors
    /// - `Validation` when `quantity` is 0
    /// - `InsufficientStock` when the accumulated quantity exceeds stock
    /// - `QuantityTooLarge` / `CartTooLarge` on the cart limits
    ///
    /// A rejected add leaves the cart untouched.
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> CoreResult<()> {
        crate::validation::validate_quantity(quantity)?;

        let held = self.quantity_of(product.id);
        let requested = held.saturating_add(quantity);

        if requested > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested,
                max: MAX_ITEM_QUANTITY,
            });
        }

        if !product.can_sell(requested) {
            return Err(CoreError::InsufficientStock {
                name: product.name.clone(),
                available: product.stock,
                requested,
            });
        }

        if let Some(item) = self.find_mut(product.id) {
            item.quantity = requested;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.items.push(CartItem {
            product: product.clone(),
            quantity,
        });
        Ok(())
    }

    /// Decrements an entry by one, removing it when it reaches zero.
    ///
    /// Returns `false` if the product was not in the cart.
    pub fn decrease_item(&mut self, product_id: ProductId) -> bool {
        let Some(index) = self.position(product_id) else {
            return false;
        };

        let remaining = self.items[index].quantity - 1;
        if remaining == 0 {
            self.items.remove(index);
        } else {
            self.items[index].quantity = remaining;
        }
        true
    }

    /// Sets an absolute quantity for an entry already in the cart.
    ///
    /// ## Behavior
    /// - Quantity 0: removes the item
    /// - Quantity above the snapshot stock: `InsufficientStock`
    /// - Product not in cart: `ProductNotFound`
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> CoreResult<()> {
        if quantity == 0 {
            self.remove_item(product_id);
            return Ok(());
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        let item = self
            .find_mut(product_id)
            .ok_or(CoreError::ProductNotFound(product_id))?;

        if !item.product.can_sell(quantity) {
            return Err(CoreError::InsufficientStock {
                name: item.product.name.clone(),
                available: item.product.stock,
                requested: quantity,
            });
        }

        item.quantity = quantity;
        Ok(())
    }

    /// Removes an entry regardless of quantity.
    ///
    /// Returns `false` if the product was not in the cart.
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product.id != product_id);
        self.items.len() != initial_len
    }

    /// Takes submitted order lines out of the cart.
    ///
    /// Each line's quantity is subtracted from its entry and entries that
    /// reach zero are dropped. Units added after the lines were built stay.
    /// When nothing remains the cart is reset like [`Cart::clear`].
    pub fn remove_ordered(&mut self, lines: &[CheckoutLine]) {
        for line in lines {
            let Some(index) = self.position(line.product_id) else {
                continue;
            };
            let remaining = self.items[index].quantity.saturating_sub(line.quantity);
            if remaining == 0 {
                self.items.remove(index);
            } else {
                self.items[index].quantity = remaining;
            }
        }

        if self.items.is_empty() {
            self.clear();
        }
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.created_at = Utc::now();
    }

    /// Entries in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Looks up the entry for a product.
    pub fn get(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product.id == product_id)
    }

    /// Quantity currently held for a product (0 when absent).
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.get(product_id).map_or(0, |i| i.quantity)
    }

    /// When the cart was created or last cleared.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the number of distinct products in the cart.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all items.
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Calculates Σ(price × quantity) over the current entries.
    pub fn total_price(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Builds the `items` array of a checkout request.
    pub fn checkout_lines(&self) -> Vec<CheckoutLine> {
        self.items
            .iter()
            .map(|i| CheckoutLine {
                product_id: i.product.id,
                quantity: i.quantity,
            })
            .collect()
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items.iter().position(|i| i.product.id == product_id)
    }

    fn find_mut(&mut self, product_id: ProductId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|i| i.product.id == product_id)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

/// Cart totals summary for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub total_items: u32,
    pub total_price: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
