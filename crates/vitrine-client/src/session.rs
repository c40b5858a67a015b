//! # Storefront Session
//!
//! One explicitly scoped container per signed-in front end: the three stores
//! sharing one API handle, and the flows that span more than one store.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  checkout()                                                             │
//! │       │                                                                 │
//! │       ├── no token ─────────────► Err(Authorization)                    │
//! │       ├── already submitting ───► Err(Busy)                             │
//! │       ├── cart empty ───────────► Err(Core(EmptyCart))                  │
//! │       ▼                                                                 │
//! │  POST /orders/checkout {items}                                          │
//! │       │                                                                 │
//! │       ├── Err(e) ──► cart and catalog untouched                        │
//! │       ▼                                                                 │
//! │  catalog.update_stock(line) for each line   (provisional)               │
//! │  cart.clear()                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Ok(confirmation)                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Admin operations check the role locally before any request, then patch
//! the catalog with the entity the server returned.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;
use vitrine_core::validation::{
    validate_new_category, validate_new_product, validate_product_update,
};
use vitrine_core::{
    Category, CategoryId, CoreError, NewCategory, NewProduct, Product, ProductId, ProductUpdate,
};

use crate::api::{CheckoutConfirmation, CheckoutRequest, HttpApi, StorefrontApi};
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::guard::InFlight;
use crate::state::{AuthStore, CartStore, CatalogStore};

/// The stores of one storefront session.
pub struct StorefrontSession<A = HttpApi> {
    id: Uuid,
    started_at: DateTime<Utc>,
    api: Arc<A>,
    auth: AuthStore<A>,
    catalog: CatalogStore<A>,
    cart: CartStore,
    checkout_in_flight: InFlight,
}

impl StorefrontSession<HttpApi> {
    /// Starts a session against the configured backend.
    pub fn connect(config: &ClientConfig) -> ClientResult<Self> {
        let api = HttpApi::new(config)?;
        info!(base_url = %api.base_url(), "Connecting to storefront");
        Ok(Self::start(api))
    }
}

impl<A: StorefrontApi> StorefrontSession<A> {
    /// Starts a session with empty stores.
    pub fn start(api: A) -> Self {
        let api = Arc::new(api);
        let session = StorefrontSession {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            auth: AuthStore::new(Arc::clone(&api)),
            catalog: CatalogStore::new(Arc::clone(&api)),
            cart: CartStore::new(),
            checkout_in_flight: InFlight::new(),
            api,
        };
        debug!(session_id = %session.id, "Session started");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn auth(&self) -> &AuthStore<A> {
        &self.auth
    }

    pub fn catalog(&self) -> &CatalogStore<A> {
        &self.catalog
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    // =========================================================================
    // Shopping
    // =========================================================================

    /// Adds a catalog product to the cart.
    ///
    /// Stock is checked against the catalog's current copy of the product.
    pub fn add_to_cart(&self, product_id: ProductId, quantity: u32) -> ClientResult<()> {
        let product = self
            .catalog
            .product(product_id)
            .ok_or(CoreError::ProductNotFound(product_id))?;
        self.cart.add(&product, quantity)
    }

    /// Places an order for the cart's contents.
    pub async fn checkout(&self) -> ClientResult<CheckoutConfirmation> {
        let token = self.auth.require_token()?;
        let _ticket = self.checkout_in_flight.enter("checkout")?;

        let items = self.cart.checkout_lines();
        if items.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        info!(
            session_id = %self.id,
            lines = items.len(),
            total = %self.cart.total_price(),
            "Submitting order"
        );
        let request = CheckoutRequest { items };
        let confirmation = self.api.checkout(&token, &request).await?;

        for line in &request.items {
            // The product may have been deleted from the catalog meanwhile.
            if let Err(e) = self.catalog.update_stock(line.product_id, line.quantity) {
                debug!(product_id = %line.product_id, error = %e, "Skipped stock patch");
            }
        }
        self.cart.remove_ordered(&request.items);

        info!(session_id = %self.id, message = %confirmation.message, "Order placed");
        Ok(confirmation)
    }

    /// Whether an order submission is pending.
    pub fn is_checking_out(&self) -> bool {
        self.checkout_in_flight.is_busy()
    }

    /// Clears the logged-in user and the cart.
    pub fn logout(&self) {
        self.auth.logout();
        self.cart.clear();
        debug!(session_id = %self.id, "Session cleared");
    }

    /// Refreshes products and categories.
    pub async fn refresh(&self) -> ClientResult<()> {
        self.catalog.refresh().await
    }

    // =========================================================================
    // Admin
    // =========================================================================

    /// Creates a product and adds it to the local catalog.
    pub async fn create_product(&self, product: &NewProduct) -> ClientResult<Product> {
        let token = self.auth.require_admin()?;
        validate_new_product(product)?;

        let created = self.api.create_product(&token, product).await?;
        info!(product_id = %created.id, name = %created.name, "Product created");
        self.catalog.upsert_product(created.clone());
        Ok(created)
    }

    /// Changes the given fields of a product.
    pub async fn update_product(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> ClientResult<Product> {
        let token = self.auth.require_admin()?;
        validate_product_update(update)?;

        let updated = self.api.update_product(&token, id, update).await?;
        info!(product_id = %updated.id, stock = updated.stock, "Product updated");
        self.catalog.upsert_product(updated.clone());
        Ok(updated)
    }

    /// Deletes a product from the server, the catalog, and the cart.
    pub async fn delete_product(&self, id: ProductId) -> ClientResult<()> {
        let token = self.auth.require_admin()?;

        self.api.delete_product(&token, id).await?;
        self.catalog.remove_product(id);
        self.cart.remove(id);
        info!(product_id = %id, "Product deleted");
        Ok(())
    }

    /// Creates a category and adds it to the local catalog.
    pub async fn create_category(&self, category: &NewCategory) -> ClientResult<Category> {
        let token = self.auth.require_admin()?;
        validate_new_category(category)?;

        let created = self.api.create_category(&token, category).await?;
        info!(category_id = %created.id, name = %created.name, "Category created");
        self.catalog.upsert_category(created.clone());
        Ok(created)
    }

    /// Deletes a category.
    pub async fn delete_category(&self, id: CategoryId) -> ClientResult<()> {
        let token = self.auth.require_admin()?;

        self.api.delete_category(&token, id).await?;
        self.catalog.remove_category(id);
        info!(category_id = %id, "Category deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::testing::{product, FakeApi, ADMIN_EMAIL, PASSWORD};
    use std::sync::atomic::Ordering;
    use vitrine_core::{Money, ValidationError};

    async fn session_with(products: Vec<Product>) -> StorefrontSession<FakeApi> {
        let session = StorefrontSession::start(FakeApi::with_products(products));
        session.catalog().fetch_products().await.unwrap();
        session
    }

    async fn shopper() -> StorefrontSession<FakeApi> {
        let session = session_with(vec![
            product(1, "Caneca", 2500, 5),
            product(2, "Boné", 3000, 2),
        ])
        .await;
        session
            .auth()
            .login("ana@loja.example", PASSWORD)
            .await
            .unwrap();
        session
    }

    async fn admin() -> StorefrontSession<FakeApi> {
        let session = session_with(vec![product(1, "Caneca", 2500, 5)]).await;
        session.auth().login(ADMIN_EMAIL, PASSWORD).await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_add_to_cart_uses_catalog_copy() {
        let session = shopper().await;

        session.add_to_cart(ProductId(1), 3).unwrap();
        assert_eq!(session.cart().total_price(), Money::from_cents(7500));
        assert_eq!(session.cart().total_items(), 3);

        let err = session.add_to_cart(ProductId(2), 3).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Core(CoreError::InsufficientStock { available: 2, .. })
        ));

        let err = session.add_to_cart(ProductId(9), 1).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Core(CoreError::ProductNotFound(ProductId(9)))
        ));
    }

    #[tokio::test]
    async fn test_checkout_patches_stock_and_clears_cart() {
        let session = shopper().await;
        session.add_to_cart(ProductId(1), 2).unwrap();
        session.add_to_cart(ProductId(2), 2).unwrap();

        let confirmation = session.checkout().await.unwrap();

        assert_eq!(confirmation.message, "Order placed");
        assert!(session.cart().is_empty());
        assert_eq!(session.catalog().product(ProductId(1)).unwrap().stock, 3);
        assert_eq!(session.catalog().product(ProductId(2)).unwrap().stock, 0);
        assert!(session.catalog().is_provisional(ProductId(1)));

        let orders = session.api.orders.lock().unwrap().clone();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].len(), 2);
    }

    #[tokio::test]
    async fn test_checkout_requires_login_and_items() {
        let session = session_with(vec![product(1, "Caneca", 2500, 5)]).await;
        session.add_to_cart(ProductId(1), 1).unwrap();

        assert!(matches!(
            session.checkout().await,
            Err(ClientError::Authorization(_))
        ));

        session
            .auth()
            .login("ana@loja.example", PASSWORD)
            .await
            .unwrap();
        session.cart().clear();
        assert!(matches!(
            session.checkout().await,
            Err(ClientError::Core(CoreError::EmptyCart))
        ));
        assert_eq!(session.api.call_count("checkout"), 0);
    }

    #[tokio::test]
    async fn test_failed_checkout_keeps_cart() {
        let session = shopper().await;
        session.add_to_cart(ProductId(1), 2).unwrap();
        session.api.offline.store(true, Ordering::SeqCst);

        assert!(session.checkout().await.unwrap_err().is_network());
        assert_eq!(session.cart().total_items(), 2);
        assert_eq!(session.catalog().product(ProductId(1)).unwrap().stock, 5);
        assert!(!session.is_checking_out());
    }

    #[tokio::test]
    async fn test_double_checkout_is_busy() {
        let session = Arc::new(shopper().await);
        session.add_to_cart(ProductId(1), 1).unwrap();
        session.api.hold.store(true, Ordering::SeqCst);

        let pending = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.checkout().await })
        };
        while !session.is_checking_out() {
            tokio::task::yield_now().await;
        }

        assert!(matches!(
            session.checkout().await,
            Err(ClientError::Busy {
                operation: "checkout"
            })
        ));

        session.api.release();
        pending.await.unwrap().unwrap();
        assert_eq!(session.api.call_count("checkout"), 1);
    }

    #[tokio::test]
    async fn test_items_added_during_checkout_stay_in_cart() {
        let session = Arc::new(shopper().await);
        session.add_to_cart(ProductId(1), 1).unwrap();
        session.api.hold.store(true, Ordering::SeqCst);

        let pending = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.checkout().await })
        };
        while !session.is_checking_out() {
            tokio::task::yield_now().await;
        }

        session.add_to_cart(ProductId(1), 1).unwrap();
        session.add_to_cart(ProductId(2), 2).unwrap();
        session.api.release();
        pending.await.unwrap().unwrap();

        let orders = session.api.orders.lock().unwrap().clone();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].len(), 1);
        assert_eq!(orders[0][0].quantity, 1);

        assert_eq!(session.cart().quantity_of(ProductId(1)), 1);
        assert_eq!(session.cart().quantity_of(ProductId(2)), 2);
        assert_eq!(session.catalog().product(ProductId(1)).unwrap().stock, 4);
    }

    #[tokio::test]
    async fn test_logout_clears_auth_and_cart() {
        let session = shopper().await;
        session.add_to_cart(ProductId(1), 1).unwrap();

        session.logout();

        assert!(!session.auth().is_authenticated());
        assert!(session.cart().is_empty());
        assert_eq!(session.catalog().products().len(), 2);
    }

    #[tokio::test]
    async fn test_admin_operations_require_admin_locally() {
        let session = shopper().await;

        let err = session.delete_product(ProductId(1)).await.unwrap_err();
        assert!(matches!(err, ClientError::Authorization(_)));
        let err = session
            .create_category(&NewCategory {
                name: "Casa".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Authorization(_)));

        assert_eq!(session.api.call_count("delete_product"), 0);
        assert_eq!(session.api.call_count("create_category"), 0);
    }

    #[tokio::test]
    async fn test_admin_product_lifecycle() {
        let session = admin().await;

        let created = session
            .create_product(&NewProduct {
                name: "Camiseta".to_string(),
                price: Money::from_cents(4990),
                description: "Algodão".to_string(),
                stock: 10,
                image_url: String::new(),
                category_id: CategoryId(1),
            })
            .await
            .unwrap();
        assert_eq!(session.catalog().product(created.id), Some(created.clone()));

        let updated = session
            .update_product(created.id, &ProductUpdate::stock(4))
            .await
            .unwrap();
        assert_eq!(updated.stock, 4);
        assert_eq!(session.catalog().product(created.id).unwrap().stock, 4);

        session.add_to_cart(created.id, 1).unwrap();
        session.delete_product(created.id).await.unwrap();
        assert!(session.catalog().product(created.id).is_none());
        assert_eq!(session.cart().quantity_of(created.id), 0);
    }

    #[tokio::test]
    async fn test_admin_validation_before_request() {
        let session = admin().await;

        let err = session
            .update_product(ProductId(1), &ProductUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Core(CoreError::Validation(_))));

        let err = session
            .create_category(&NewCategory {
                name: "  ".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Core(CoreError::Validation(ValidationError::Required { .. }))
        ));

        assert_eq!(session.api.call_count("update_product"), 0);
        assert_eq!(session.api.call_count("create_category"), 0);
    }

    #[tokio::test]
    async fn test_admin_category_lifecycle() {
        let session = admin().await;

        let created = session
            .create_category(&NewCategory {
                name: "Casa".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(session.catalog().categories(), vec![created.clone()]);

        session.delete_category(created.id).await.unwrap();
        assert!(session.catalog().categories().is_empty());
    }

    #[tokio::test]
    async fn test_update_of_deleted_product_is_not_found() {
        let session = admin().await;

        let err = session
            .update_product(ProductId(77), &ProductUpdate::stock(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }
}
