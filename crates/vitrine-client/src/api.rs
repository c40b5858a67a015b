//! # Storefront API
//!
//! Stateless request wrapper over the storefront REST backend.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          One Call, One Request                          │
//! │                                                                         │
//! │  store ──► StorefrontApi::create_product(token, body)                   │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │            HttpApi ── POST {base}/products ──────────────► backend      │
//! │                 │     Authorization: Bearer <token>                     │
//! │                 │     Content-Type: application/json                    │
//! │                 ▼                                                       │
//! │            2xx ──► decode JSON body (204 = empty success)              │
//! │            else ──► ClientError::from_status(status, detail)           │
//! │                                                                         │
//! │  No retries, no backoff, no idempotency keys.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Endpoints
//! ```text
//! ┌────────┬──────────────────────┬────────┬───────────────────────────────┐
//! │ Method │ Path                 │ Bearer │ Success                       │
//! ├────────┼──────────────────────┼────────┼───────────────────────────────┤
//! │ POST   │ /auth/login          │        │ {access_token, user}          │
//! │ POST   │ /auth/register       │        │ created user                  │
//! │ GET    │ /products            │        │ [product]                     │
//! │ GET    │ /categories          │        │ [category]                    │
//! │ POST   │ /products            │   ✓    │ created product               │
//! │ PUT    │ /products/{id}       │   ✓    │ updated product               │
//! │ DELETE │ /products/{id}       │   ✓    │ 204                           │
//! │ POST   │ /categories          │   ✓    │ created category              │
//! │ DELETE │ /categories/{id}     │   ✓    │ 204                           │
//! │ POST   │ /orders/checkout     │   ✓    │ {message}                     │
//! └────────┴──────────────────────┴────────┴───────────────────────────────┘
//! ```
//!
//! Stores depend on the [`StorefrontApi`] trait rather than on [`HttpApi`],
//! so they can be driven by an in-process fake in tests.

use std::fmt;
use std::future::Future;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;
use vitrine_core::{
    Category, CategoryId, CheckoutLine, NewCategory, NewProduct, Product, ProductId,
    ProductUpdate, User,
};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

// =============================================================================
// Wire Payloads
// =============================================================================

/// Body of `POST /auth/login`.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /auth/register`.
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login: the bearer token and the account it belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
}

/// Body of `POST /orders/checkout`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutLine>,
}

/// Server acknowledgement of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutConfirmation {
    #[serde(default)]
    pub message: String,
}

/// Error body returned by the backend on non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

// =============================================================================
// API Trait
// =============================================================================

/// Every call the stores make against the backend.
///
/// Protected calls take the bearer token explicitly; the API handle itself
/// holds no session state.
pub trait StorefrontApi: Send + Sync + 'static {
    /// `POST /auth/login`
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = ClientResult<LoginResponse>> + Send;

    /// `POST /auth/register`
    fn register(&self, request: &RegisterRequest)
        -> impl Future<Output = ClientResult<User>> + Send;

    /// `GET /products`
    fn list_products(&self) -> impl Future<Output = ClientResult<Vec<Product>>> + Send;

    /// `GET /categories`
    fn list_categories(&self) -> impl Future<Output = ClientResult<Vec<Category>>> + Send;

    /// `POST /products`
    fn create_product(
        &self,
        token: &str,
        product: &NewProduct,
    ) -> impl Future<Output = ClientResult<Product>> + Send;

    /// `PUT /products/{id}`
    fn update_product(
        &self,
        token: &str,
        id: ProductId,
        update: &ProductUpdate,
    ) -> impl Future<Output = ClientResult<Product>> + Send;

    /// `DELETE /products/{id}`
    fn delete_product(
        &self,
        token: &str,
        id: ProductId,
    ) -> impl Future<Output = ClientResult<()>> + Send;

    /// `POST /categories`
    fn create_category(
        &self,
        token: &str,
        category: &NewCategory,
    ) -> impl Future<Output = ClientResult<Category>> + Send;

    /// `DELETE /categories/{id}`
    fn delete_category(
        &self,
        token: &str,
        id: CategoryId,
    ) -> impl Future<Output = ClientResult<()>> + Send;

    /// `POST /orders/checkout`
    fn checkout(
        &self,
        token: &str,
        request: &CheckoutRequest,
    ) -> impl Future<Output = ClientResult<CheckoutConfirmation>> + Send;
}

// =============================================================================
// HTTP Implementation
// =============================================================================

/// [`StorefrontApi`] over HTTP with reqwest.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
}

impl HttpApi {
    /// Builds a client from validated configuration.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.api.timeout())
            .user_agent(config.api.user_agent.clone())
            .build()?;

        Ok(HttpApi {
            client,
            base_url: config.api.base_url()?,
        })
    }

    /// The normalised base URL requests are issued against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Sends a request and decodes a JSON success body.
    ///
    /// A 204 decodes as an empty object, so payloads with defaulted fields
    /// still come back as success.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        credentials_request: bool,
    ) -> ClientResult<T> {
        let response = check_status(request.send().await?, credentials_request).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(serde_json::from_str("{}")?);
        }
        Ok(response.json::<T>().await?)
    }

    /// Sends a request whose success body is ignored (e.g. 204).
    async fn send_empty(&self, request: RequestBuilder) -> ClientResult<()> {
        check_status(request.send().await?, false).await?;
        Ok(())
    }
}

/// Passes 2xx responses through; maps everything else to a [`ClientError`].
async fn check_status(response: Response, credentials_request: bool) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        debug!(status = status.as_u16(), url = %response.url(), "Request succeeded");
        return Ok(response);
    }

    // An unreadable body just means no detail.
    let body = response.text().await.unwrap_or_default();
    let detail = error_detail(&body);
    debug!(status = status.as_u16(), ?detail, "Request rejected");

    Err(ClientError::from_status(
        status.as_u16(),
        detail,
        credentials_request,
    ))
}

/// Extracts the human-readable `detail` from an error body.
///
/// Strings are used as-is; structured values (field error lists) are
/// rendered as compact JSON. Null and empty strings count as no detail.
fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

impl StorefrontApi for HttpApi {
    async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        let url = self.endpoint("auth/login")?;
        self.send_json(self.client.post(url).json(request), true).await
    }

    async fn register(&self, request: &RegisterRequest) -> ClientResult<User> {
        let url = self.endpoint("auth/register")?;
        self.send_json(self.client.post(url).json(request), false).await
    }

    async fn list_products(&self) -> ClientResult<Vec<Product>> {
        let url = self.endpoint("products")?;
        self.send_json(self.client.get(url), false).await
    }

    async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        let url = self.endpoint("categories")?;
        self.send_json(self.client.get(url), false).await
    }

    async fn create_product(&self, token: &str, product: &NewProduct) -> ClientResult<Product> {
        let url = self.endpoint("products")?;
        let request = self.client.post(url).bearer_auth(token).json(product);
        self.send_json(request, false).await
    }

    async fn update_product(
        &self,
        token: &str,
        id: ProductId,
        update: &ProductUpdate,
    ) -> ClientResult<Product> {
        let url = self.endpoint(&format!("products/{}", id))?;
        let request = self.client.put(url).bearer_auth(token).json(update);
        self.send_json(request, false).await
    }

    async fn delete_product(&self, token: &str, id: ProductId) -> ClientResult<()> {
        let url = self.endpoint(&format!("products/{}", id))?;
        self.send_empty(self.client.delete(url).bearer_auth(token)).await
    }

    async fn create_category(&self, token: &str, category: &NewCategory) -> ClientResult<Category> {
        let url = self.endpoint("categories")?;
        let request = self.client.post(url).bearer_auth(token).json(category);
        self.send_json(request, false).await
    }

    async fn delete_category(&self, token: &str, id: CategoryId) -> ClientResult<()> {
        let url = self.endpoint(&format!("categories/{}", id))?;
        self.send_empty(self.client.delete(url).bearer_auth(token)).await
    }

    async fn checkout(
        &self,
        token: &str,
        request: &CheckoutRequest,
    ) -> ClientResult<CheckoutConfirmation> {
        let url = self.endpoint("orders/checkout")?;
        let request = self.client.post(url).bearer_auth(token).json(request);
        self.send_json(request, false).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
