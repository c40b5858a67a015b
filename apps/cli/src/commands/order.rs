//! One-shot order placement.
//!
//! # Usage
//!
//! ```bash
//! vitrine order -e ana@loja.example -p secret 3:2 7
//! ```
//!
//! Logs in, loads the catalog, adds each item (stock checked against the
//! fetched catalog), and checks out. Nothing is sent if any item is rejected.

use vitrine_client::{ClientConfig, StorefrontSession};

use super::{parse_item, render};
use crate::error::CliResult;

/// Places an order for `items` (`PRODUCT_ID[:QUANTITY]`).
pub async fn place(
    config: &ClientConfig,
    email: &str,
    password: &str,
    items: &[String],
) -> CliResult<()> {
    let lines = items
        .iter()
        .map(|raw| parse_item(raw))
        .collect::<CliResult<Vec<_>>>()?;

    let session = StorefrontSession::connect(config)?;
    let user = session.auth().login(email, password).await?;
    tracing::info!(session_id = %session.id(), user = %user.email, "Placing order");

    session.catalog().fetch_products().await?;
    for (product_id, quantity) in lines {
        session.add_to_cart(product_id, quantity)?;
    }
    print!("{}", session.cart().with_cart(render::cart));

    let confirmation = session.checkout().await?;
    print!("{}", render::confirmation(&confirmation));

    session.logout();
    Ok(())
}
