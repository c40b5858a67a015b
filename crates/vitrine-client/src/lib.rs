//! # vitrine-client: REST Client and Session State for Vitrine
//!
//! This crate connects the pure rules in `vitrine-core` to a storefront
//! backend. It owns the network calls and every piece of mutable state a
//! front end reads from.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Client Architecture                              │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                StorefrontSession (Container)                     │  │
//! │  │                                                                  │  │
//! │  │  One per front end; owns the stores below and a session id      │  │
//! │  │  Runs the flows that span stores: checkout, logout, admin CRUD  │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │   AuthStore    │  │  CatalogStore  │  │      CartStore         │    │
//! │  │                │  │                │  │                        │    │
//! │  │ login/register │  │ fetch products │  │ add / decrease /       │    │
//! │  │ logout, token  │  │ & categories,  │  │ remove / clear,        │    │
//! │  │ admin check    │  │ stock patches  │  │ derived totals         │    │
//! │  └───────┬────────┘  └───────┬────────┘  └────────────────────────┘    │
//! │          └─────────┬─────────┘                                          │
//! │                    ▼                                                    │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │        StorefrontApi trait  ◄──  HttpApi (reqwest, JSON)        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`api`] - `StorefrontApi` trait, `HttpApi`, wire payloads
//! - [`config`] - Client configuration (base URL, timeout)
//! - [`error`] - Client error taxonomy
//! - [`guard`] - In-flight gate against duplicate requests
//! - [`state`] - Auth, catalog, and cart stores
//! - [`session`] - `StorefrontSession` container
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vitrine_client::{ClientConfig, StorefrontSession};
//! use vitrine_core::ProductId;
//!
//! let config = ClientConfig::load_or_default(None);
//! let session = StorefrontSession::connect(&config)?;
//!
//! session.refresh().await?;
//! session.auth().login("ana@loja.example", "secret").await?;
//! session.add_to_cart(ProductId(1), 2)?;
//!
//! let confirmation = session.checkout().await?;
//! println!("{}", confirmation.message);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod session;
pub mod state;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use api::{CheckoutConfirmation, HttpApi, StorefrontApi};
pub use config::{ApiSettings, ClientConfig};
pub use error::{ClientError, ClientResult, ErrorCode};
pub use session::StorefrontSession;
pub use state::{AuthSession, AuthStore, CartStore, CatalogStore};
