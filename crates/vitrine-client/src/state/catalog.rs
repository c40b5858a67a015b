//! # Catalog Store
//!
//! Products and categories as last fetched, plus local stock patches.
//!
//! ## Fetch Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  fetch_products()                                                       │
//! │       │                                                                 │
//! │       ├── gate busy? ──────────────► Err(Busy), no second request       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  GET /products   (is_loading() == true)                                 │
//! │       │                                                                 │
//! │       ├── Ok(list) ──► Catalog::replace_products(list)                  │
//! │       │                provisional patches discarded                    │
//! │       │                                                                 │
//! │       └── Err(e) ───► previous list kept, error returned               │
//! │                                                                         │
//! │  is_loading() == false again on both paths                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, warn};
use vitrine_core::{Catalog, Category, CategoryId, Product, ProductId};

use crate::api::StorefrontApi;
use crate::error::ClientResult;
use crate::guard::InFlight;

/// Shared catalog state.
pub struct CatalogStore<A> {
    api: Arc<A>,
    catalog: Arc<RwLock<Catalog>>,
    products_in_flight: InFlight,
    categories_in_flight: InFlight,
}

impl<A> Clone for CatalogStore<A> {
    fn clone(&self) -> Self {
        CatalogStore {
            api: Arc::clone(&self.api),
            catalog: Arc::clone(&self.catalog),
            products_in_flight: self.products_in_flight.clone(),
            categories_in_flight: self.categories_in_flight.clone(),
        }
    }
}

impl<A: StorefrontApi> CatalogStore<A> {
    /// Creates an empty catalog store.
    pub fn new(api: Arc<A>) -> Self {
        CatalogStore {
            api,
            catalog: Arc::new(RwLock::new(Catalog::new())),
            products_in_flight: InFlight::new(),
            categories_in_flight: InFlight::new(),
        }
    }

    /// Replaces the product list with the server's.
    ///
    /// ## Returns
    /// The number of products received.
    pub async fn fetch_products(&self) -> ClientResult<usize> {
        let _ticket = self.products_in_flight.enter("product fetch")?;

        let products = self.api.list_products().await.map_err(|e| {
            warn!(error = %e, "Product fetch failed, keeping previous list");
            e
        })?;

        let count = products.len();
        self.with_catalog_mut(|catalog| catalog.replace_products(products));
        info!(count, "Products refreshed");
        Ok(count)
    }

    /// Replaces the category list with the server's.
    pub async fn fetch_categories(&self) -> ClientResult<usize> {
        let _ticket = self.categories_in_flight.enter("category fetch")?;

        let categories = self.api.list_categories().await.map_err(|e| {
            warn!(error = %e, "Category fetch failed, keeping previous list");
            e
        })?;

        let count = categories.len();
        self.with_catalog_mut(|catalog| catalog.replace_categories(categories));
        info!(count, "Categories refreshed");
        Ok(count)
    }

    /// Fetches both lists concurrently.
    ///
    /// A failure in one list does not stop the other from updating; the
    /// first error is returned.
    pub async fn refresh(&self) -> ClientResult<()> {
        let (products, categories) = tokio::join!(self.fetch_products(), self.fetch_categories());
        products?;
        categories?;
        Ok(())
    }

    /// Whether either fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.products_in_flight.is_busy() || self.categories_in_flight.is_busy()
    }

    /// Decrements a product's stock locally until the next fetch.
    ///
    /// ## Returns
    /// The patched stock level (saturating at 0).
    pub fn update_stock(&self, product_id: ProductId, quantity_sold: u32) -> ClientResult<u32> {
        let stock =
            self.with_catalog_mut(|catalog| catalog.apply_stock_delta(product_id, quantity_sold))?;
        debug!(product_id = %product_id, quantity_sold, stock, "Stock patched locally");
        Ok(stock)
    }

    // =========================================================================
    // Admin Patches
    // =========================================================================

    pub(crate) fn upsert_product(&self, product: Product) {
        self.with_catalog_mut(|catalog| catalog.upsert_product(product));
    }

    pub(crate) fn remove_product(&self, id: ProductId) -> Option<Product> {
        self.with_catalog_mut(|catalog| catalog.remove_product(id))
    }

    pub(crate) fn upsert_category(&self, category: Category) {
        self.with_catalog_mut(|catalog| catalog.upsert_category(category));
    }

    pub(crate) fn remove_category(&self, id: CategoryId) -> bool {
        self.with_catalog_mut(|catalog| catalog.remove_category(id))
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Executes a function with read access to the catalog.
    pub fn with_catalog<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Catalog) -> R,
    {
        let catalog = self.catalog.read().unwrap_or_else(PoisonError::into_inner);
        f(&catalog)
    }

    fn with_catalog_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Catalog) -> R,
    {
        let mut catalog = self.catalog.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut catalog)
    }

    pub fn product(&self, id: ProductId) -> Option<Product> {
        self.with_catalog(|catalog| catalog.get(id).cloned())
    }

    pub fn products(&self) -> Vec<Product> {
        self.with_catalog(|catalog| catalog.products().to_vec())
    }

    pub fn categories(&self) -> Vec<Category> {
        self.with_catalog(|catalog| catalog.categories().to_vec())
    }

    /// Products in a category; `None` lists everything.
    pub fn in_category(&self, category: Option<CategoryId>) -> Vec<Product> {
        self.with_catalog(|catalog| catalog.in_category(category).into_iter().cloned().collect())
    }

    /// Case-insensitive name search.
    pub fn search(&self, query: &str) -> Vec<Product> {
        self.with_catalog(|catalog| catalog.search(query).into_iter().cloned().collect())
    }

    /// Products in a category whose name contains `query`.
    pub fn browse(&self, category: Option<CategoryId>, query: &str) -> Vec<Product> {
        self.with_catalog(|catalog| catalog.browse(category, query).into_iter().cloned().collect())
    }

    pub fn is_provisional(&self, id: ProductId) -> bool {
        self.with_catalog(|catalog| catalog.is_provisional(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::testing::{product, FakeApi};
    use std::sync::atomic::Ordering;
    use vitrine_core::CoreError;

    fn store(products: Vec<Product>) -> (Arc<FakeApi>, CatalogStore<FakeApi>) {
        let api = Arc::new(FakeApi::with_products(products));
        (Arc::clone(&api), CatalogStore::new(api))
    }

    #[tokio::test]
    async fn test_fetch_replaces_products() {
        let (_, catalog) = store(vec![product(1, "Caneca", 2500, 5), product(2, "Boné", 3000, 1)]);

        assert_eq!(catalog.fetch_products().await.unwrap(), 2);
        assert_eq!(catalog.products().len(), 2);
        assert_eq!(catalog.product(ProductId(2)).unwrap().name, "Boné");
        assert!(!catalog.is_loading());
    }

    #[tokio::test]
    async fn test_browse_filters_by_category_and_name() {
        let mut shirt = product(2, "Camiseta Azul", 4990, 3);
        shirt.category_id = CategoryId(2);
        let (_, catalog) = store(vec![product(1, "Caneca Azul", 2500, 5), shirt]);
        catalog.fetch_products().await.unwrap();

        assert_eq!(catalog.browse(None, "azul").len(), 2);
        let found = catalog.browse(Some(CategoryId(2)), "AZUL");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, ProductId(2));
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_list() {
        let (api, catalog) = store(vec![product(1, "Caneca", 2500, 5)]);
        catalog.fetch_products().await.unwrap();

        api.offline.store(true, Ordering::SeqCst);
        let err = catalog.fetch_products().await.unwrap_err();

        assert!(err.is_network());
        assert_eq!(catalog.products().len(), 1);
        assert!(!catalog.is_loading());
    }

    #[tokio::test]
    async fn test_server_fetch_overwrites_local_patch() {
        let (api, catalog) = store(vec![product(1, "Caneca", 2500, 5)]);
        catalog.fetch_products().await.unwrap();

        assert_eq!(catalog.update_stock(ProductId(1), 2).unwrap(), 3);
        assert!(catalog.is_provisional(ProductId(1)));

        // Someone else bought one too; the server knows better than our patch.
        api.products.lock().unwrap()[0].stock = 2;
        catalog.fetch_products().await.unwrap();

        assert_eq!(catalog.product(ProductId(1)).unwrap().stock, 2);
        assert!(!catalog.is_provisional(ProductId(1)));
    }

    #[tokio::test]
    async fn test_update_stock_unknown_product() {
        let (_, catalog) = store(vec![]);
        let err = catalog.update_stock(ProductId(9), 1).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Core(CoreError::ProductNotFound(ProductId(9)))
        ));
    }

    #[tokio::test]
    async fn test_refresh_surfaces_failure_then_recovers() {
        let (api, catalog) = store(vec![product(1, "Caneca", 2500, 5)]);
        catalog.fetch_products().await.unwrap();
        api.categories.lock().unwrap().push(Category {
            id: CategoryId(1),
            name: "Casa".to_string(),
        });

        api.offline.store(true, Ordering::SeqCst);
        assert!(catalog.refresh().await.is_err());
        assert!(catalog.categories().is_empty());

        api.offline.store(false, Ordering::SeqCst);
        catalog.refresh().await.unwrap();
        assert_eq!(catalog.categories().len(), 1);
        assert_eq!(catalog.in_category(Some(CategoryId(1))).len(), 1);
        assert_eq!(catalog.search("CANECA").len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_fetch_is_busy() {
        let (api, catalog) = store(vec![product(1, "Caneca", 2500, 5)]);
        api.hold.store(true, Ordering::SeqCst);

        let pending = {
            let catalog = catalog.clone();
            tokio::spawn(async move { catalog.fetch_products().await })
        };
        while !catalog.is_loading() {
            tokio::task::yield_now().await;
        }

        assert!(matches!(
            catalog.fetch_products().await,
            Err(ClientError::Busy { .. })
        ));

        api.release();
        assert_eq!(pending.await.unwrap().unwrap(), 1);
        assert_eq!(api.call_count("list_products"), 1);
    }
}
