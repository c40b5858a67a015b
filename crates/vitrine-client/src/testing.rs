//! In-process [`StorefrontApi`] used by the store and session tests.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use tokio::sync::Notify;
use vitrine_core::{
    Category, CategoryId, CheckoutLine, Money, NewCategory, NewProduct, Product, ProductId,
    ProductUpdate, Role, User, UserId,
};

use crate::api::{
    CheckoutConfirmation, CheckoutRequest, LoginRequest, LoginResponse, RegisterRequest,
    StorefrontApi,
};
use crate::error::{ClientError, ClientResult};

pub(crate) const TOKEN: &str = "tok-123";
pub(crate) const PASSWORD: &str = "secret";
pub(crate) const ADMIN_EMAIL: &str = "admin@loja.example";
pub(crate) const TAKEN_EMAIL: &str = "taken@loja.example";

pub(crate) fn product(id: i64, name: &str, price_cents: i64, stock: u32) -> Product {
    Product::new(
        ProductId(id),
        name,
        Money::from_cents(price_cents),
        stock,
        CategoryId(1),
    )
}

/// A backend kept in memory.
///
/// `offline` makes every call fail with a network error. `hold` parks calls
/// until [`FakeApi::release`] so tests can observe in-flight state.
#[derive(Default)]
pub(crate) struct FakeApi {
    pub products: Mutex<Vec<Product>>,
    pub categories: Mutex<Vec<Category>>,
    pub offline: AtomicBool,
    pub hold: AtomicBool,
    released: Notify,
    pub calls: Mutex<Vec<&'static str>>,
    pub orders: Mutex<Vec<Vec<CheckoutLine>>>,
    next_id: AtomicI64,
}

impl FakeApi {
    pub fn with_products(products: Vec<Product>) -> Self {
        let api = FakeApi::default();
        *api.products.lock().unwrap() = products;
        api.next_id.store(100, Ordering::SeqCst);
        api
    }

    pub fn release(&self) {
        self.released.notify_one();
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == name).count()
    }

    async fn enter(&self, name: &'static str) -> ClientResult<()> {
        self.calls.lock().unwrap().push(name);
        if self.hold.load(Ordering::SeqCst) {
            self.released.notified().await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(ClientError::Network("connection refused".to_string()));
        }
        Ok(())
    }

    fn authorize(token: &str) -> ClientResult<()> {
        if token == TOKEN {
            Ok(())
        } else {
            Err(ClientError::Authorization("Not authenticated".to_string()))
        }
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

impl StorefrontApi for FakeApi {
    async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        self.enter("login").await?;
        if request.password != PASSWORD {
            return Err(ClientError::Authentication(
                "Incorrect email or password".to_string(),
            ));
        }
        let role = if request.email == ADMIN_EMAIL {
            Role::Admin
        } else {
            Role::User
        };
        Ok(LoginResponse {
            access_token: TOKEN.to_string(),
            user: User {
                id: UserId("1".to_string()),
                name: "Ana".to_string(),
                email: request.email.clone(),
                role,
            },
        })
    }

    async fn register(&self, request: &RegisterRequest) -> ClientResult<User> {
        self.enter("register").await?;
        if request.email == TAKEN_EMAIL {
            return Err(ClientError::Validation("Email already registered".to_string()));
        }
        Ok(User {
            id: UserId(self.next_id().to_string()),
            name: request.name.clone(),
            email: request.email.clone(),
            role: Role::User,
        })
    }

    async fn list_products(&self) -> ClientResult<Vec<Product>> {
        self.enter("list_products").await?;
        Ok(self.products.lock().unwrap().clone())
    }

    async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        self.enter("list_categories").await?;
        Ok(self.categories.lock().unwrap().clone())
    }

    async fn create_product(&self, token: &str, product: &NewProduct) -> ClientResult<Product> {
        self.enter("create_product").await?;
        Self::authorize(token)?;
        let created = Product {
            id: ProductId(self.next_id()),
            name: product.name.clone(),
            price: product.price,
            description: product.description.clone(),
            stock: product.stock,
            image_url: product.image_url.clone(),
            category_id: product.category_id,
        };
        self.products.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_product(
        &self,
        token: &str,
        id: ProductId,
        update: &ProductUpdate,
    ) -> ClientResult<Product> {
        self.enter("update_product").await?;
        Self::authorize(token)?;
        let mut products = self.products.lock().unwrap();
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ClientError::NotFound("Product not found".to_string()))?;
        if let Some(name) = &update.name {
            product.name = name.clone();
        }
        if let Some(price) = update.price {
            product.price = price;
        }
        if let Some(stock) = update.stock {
            product.stock = stock;
        }
        Ok(product.clone())
    }

    async fn delete_product(&self, token: &str, id: ProductId) -> ClientResult<()> {
        self.enter("delete_product").await?;
        Self::authorize(token)?;
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(ClientError::NotFound("Product not found".to_string()));
        }
        Ok(())
    }

    async fn create_category(&self, token: &str, category: &NewCategory) -> ClientResult<Category> {
        self.enter("create_category").await?;
        Self::authorize(token)?;
        let created = Category {
            id: CategoryId(self.next_id()),
            name: category.name.clone(),
        };
        self.categories.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn delete_category(&self, token: &str, id: CategoryId) -> ClientResult<()> {
        self.enter("delete_category").await?;
        Self::authorize(token)?;
        self.categories.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }

    async fn checkout(
        &self,
        token: &str,
        request: &CheckoutRequest,
    ) -> ClientResult<CheckoutConfirmation> {
        self.enter("checkout").await?;
        Self::authorize(token)?;
        self.orders.lock().unwrap().push(request.items.clone());
        Ok(CheckoutConfirmation {
            message: "Order placed".to_string(),
        })
    }
}
