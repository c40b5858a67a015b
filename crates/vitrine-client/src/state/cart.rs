//! # Cart Store
//!
//! Shared handle over the core [`Cart`].
//!
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! - Front-end handlers and the session both hold a handle
//! - Every cart operation is short and most of them write
//!
//! Nothing here touches the network. Rule violations come back as
//! [`ClientError::Core`] so callers handle one error type.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;
use vitrine_core::{Cart, CartTotals, CheckoutLine, Money, Product, ProductId};

use crate::error::ClientResult;

/// Shared cart state.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    cart: Arc<Mutex<Cart>>,
}

impl CartStore {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let lines = cart_store.with_cart(|cart| cart.items().len());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }

    /// Adds `quantity` units of `product`, accumulating onto an existing entry.
    ///
    /// Rejected when the resulting quantity exceeds `product.stock`; the cart
    /// is left untouched in that case.
    pub fn add(&self, product: &Product, quantity: u32) -> ClientResult<()> {
        self.with_cart_mut(|cart| cart.add_item(product, quantity))?;
        debug!(product_id = %product.id, quantity, "Added to cart");
        Ok(())
    }

    /// Decrements an entry by one. Returns `false` for an unknown product.
    pub fn decrease(&self, product_id: ProductId) -> bool {
        self.with_cart_mut(|cart| cart.decrease_item(product_id))
    }

    /// Removes an entry regardless of quantity. Returns `false` for an unknown product.
    pub fn remove(&self, product_id: ProductId) -> bool {
        let removed = self.with_cart_mut(|cart| cart.remove_item(product_id));
        if removed {
            debug!(product_id = %product_id, "Removed from cart");
        }
        removed
    }

    /// Sets an absolute quantity; 0 removes the entry.
    pub fn set_quantity(&self, product_id: ProductId, quantity: u32) -> ClientResult<()> {
        Ok(self.with_cart_mut(|cart| cart.set_quantity(product_id, quantity))?)
    }

    /// Takes placed order lines out of the cart, leaving anything added since.
    pub fn remove_ordered(&self, lines: &[CheckoutLine]) {
        self.with_cart_mut(|cart| cart.remove_ordered(lines));
        debug!(lines = lines.len(), "Ordered lines removed from cart");
    }

    /// Empties the cart.
    pub fn clear(&self) {
        self.with_cart_mut(Cart::clear);
    }

    /// A snapshot of the cart's entries.
    pub fn snapshot(&self) -> Cart {
        self.with_cart(Cart::clone)
    }

    pub fn totals(&self) -> CartTotals {
        self.with_cart(|cart| CartTotals::from(cart))
    }

    pub fn total_price(&self) -> Money {
        self.with_cart(Cart::total_price)
    }

    pub fn total_items(&self) -> u32 {
        self.with_cart(Cart::total_items)
    }

    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.with_cart(|cart| cart.quantity_of(product_id))
    }

    pub fn is_empty(&self) -> bool {
        self.with_cart(Cart::is_empty)
    }

    /// Lines for the checkout request.
    pub fn checkout_lines(&self) -> Vec<CheckoutLine> {
        self.with_cart(Cart::checkout_lines)
    }
}
