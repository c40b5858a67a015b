//! Read-only catalog commands.
//!
//! # Usage
//!
//! ```bash
//! vitrine products --category 2
//! vitrine products --search "caneca" --json
//! vitrine categories
//! ```

use vitrine_client::{ClientConfig, StorefrontSession};
use vitrine_core::validation::validate_search_query;
use vitrine_core::CategoryId;

use super::render;
use crate::error::CliResult;

/// Lists products, filtered by category and name.
pub async fn products(
    config: &ClientConfig,
    category: Option<i64>,
    search: Option<&str>,
    json: bool,
) -> CliResult<()> {
    let query = validate_search_query(search.unwrap_or_default())?;

    let session = StorefrontSession::connect(config)?;
    session.refresh().await?;

    let listed = session.catalog().browse(category.map(CategoryId), &query);
    tracing::debug!(count = listed.len(), "Listing products");

    if json {
        println!("{}", serde_json::to_string_pretty(&listed)?);
    } else {
        print!(
            "{}",
            render::products(&listed, &session.catalog().categories())
        );
    }
    Ok(())
}

/// Lists categories.
pub async fn categories(config: &ClientConfig, json: bool) -> CliResult<()> {
    let session = StorefrontSession::connect(config)?;
    session.catalog().fetch_categories().await?;
    let categories = session.catalog().categories();

    if json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
    } else {
        print!("{}", render::categories(&categories));
    }
    Ok(())
}
