//! # Catalog
//!
//! The in-memory mirror of the server's products and categories.
//!
//! ## Reconciliation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                SERVER RESPONSE ALWAYS WINS                              │
//! │                                                                         │
//! │  fetch ──► replace_products([A:stock 5, B:stock 2])                     │
//! │                    │                                                    │
//! │  checkout A×2 ──► apply_stock_delta(A, 2)                               │
//! │                    │    A:stock 3  (provisional ✱)                      │
//! │                    ▼                                                    │
//! │  fetch ──► replace_products([A:stock 4, B:stock 2])                     │
//! │                         A:stock 4  (provisional mark cleared)           │
//! │                                                                         │
//! │  A local patch only lives until the next successful fetch. It is never │
//! │  merged into, or replayed over, a server list.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{Category, CategoryId, Product, ProductId};

/// Local copy of the storefront catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    products: Vec<Product>,
    categories: Vec<Category>,
    /// Products whose stock was patched locally since the last fetch.
    provisional: BTreeSet<ProductId>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Server Updates
    // =========================================================================

    /// Replaces the product list with the server's.
    ///
    /// Every provisional stock patch is discarded.
    pub fn replace_products(&mut self, products: Vec<Product>) {
        self.products = products;
        self.provisional.clear();
    }

    /// Replaces the category list with the server's.
    pub fn replace_categories(&mut self, categories: Vec<Category>) {
        self.categories = categories;
    }

    /// Inserts or replaces one product with the server's record.
    pub fn upsert_product(&mut self, product: Product) {
        self.provisional.remove(&product.id);
        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => self.products.push(product),
        }
    }

    /// Removes a product, returning it if it was present.
    pub fn remove_product(&mut self, id: ProductId) -> Option<Product> {
        self.provisional.remove(&id);
        let index = self.products.iter().position(|p| p.id == id)?;
        Some(self.products.remove(index))
    }

    /// Inserts or replaces one category with the server's record.
    pub fn upsert_category(&mut self, category: Category) {
        match self.categories.iter_mut().find(|c| c.id == category.id) {
            Some(existing) => *existing = category,
            None => self.categories.push(category),
        }
    }

    /// Removes a category. Returns `false` if it was not present.
    pub fn remove_category(&mut self, id: CategoryId) -> bool {
        let initial_len = self.categories.len();
        self.categories.retain(|c| c.id != id);
        self.categories.len() != initial_len
    }

    // =========================================================================
    // Local Patches
    // =========================================================================

    /// Decrements a product's stock locally after a purchase.
    ///
    /// Stock saturates at zero. The product is marked provisional until the
    /// next [`Catalog::replace_products`].
    ///
    /// ## Returns
    /// The patched stock level.
    pub fn apply_stock_delta(&mut self, id: ProductId, quantity_sold: u32) -> CoreResult<u32> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CoreError::ProductNotFound(id))?;

        product.stock = product.stock.saturating_sub(quantity_sold);
        self.provisional.insert(id);
        Ok(product.stock)
    }

    /// Checks if a product carries a local patch the server hasn't confirmed.
    pub fn is_provisional(&self, id: ProductId) -> bool {
        self.provisional.contains(&id)
    }

    /// Checks if any product carries a local patch.
    pub fn has_provisional(&self) -> bool {
        !self.provisional.is_empty()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// All products in server order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// All categories in server order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Looks up a product by id.
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Looks up a category by id.
    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Products listed under a category; `None` means every product.
    pub fn in_category(&self, category: Option<CategoryId>) -> Vec<&Product> {
        self.browse(category, "")
    }

    /// Products whose name contains `query`, ignoring case.
    ///
    /// An empty query matches every product.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        self.browse(None, query)
    }

    /// Category filter and name search in one pass.
    pub fn browse(&self, category: Option<CategoryId>, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| category.map_or(true, |c| p.category_id == c))
            .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Checks if the catalog has been populated with products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
