//! # State Module
//!
//! The three stores a storefront front end reads from and acts through.
//!
//! ## Why Separate Stores?
//! Each store owns one concern and its own lock, so a slow catalog fetch
//! never blocks a cart update and a test can exercise one store alone.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │          ┌──────────────────┬──────────────────┐                        │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │  AuthStore   │  │ CatalogStore │  │    CartStore     │              │
//! │  │              │  │              │  │                  │              │
//! │  │  user, token │  │  Catalog     │  │  Arc<Mutex<      │              │
//! │  │  RwLock      │  │  RwLock      │  │    Cart          │              │
//! │  │  login gate  │  │  fetch gates │  │  >>              │              │
//! │  └──────┬───────┘  └──────┬───────┘  └──────────────────┘              │
//! │         │                 │                                             │
//! │         └────────┬────────┘                                             │
//! │                  ▼                                                      │
//! │          Arc<impl StorefrontApi>                                        │
//! │                                                                         │
//! │  LOCKING:                                                              │
//! │  • Locks are taken only after a response arrives, never across .await  │
//! │  • The cart never talks to the network                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod auth;
mod cart;
mod catalog;

pub use auth::{AuthSession, AuthStore};
pub use cart::CartStore;
pub use catalog::CatalogStore;
