//! Subcommand implementations.

pub mod catalog;
pub mod config;
pub mod order;
pub mod render;
pub mod shell;

use vitrine_core::ProductId;

use crate::error::{CliError, CliResult};

/// Parses a `PRODUCT_ID[:QUANTITY]` item; the quantity defaults to 1.
pub fn parse_item(raw: &str) -> CliResult<(ProductId, u32)> {
    let invalid = || CliError::InvalidArgument(format!("expected PRODUCT_ID[:QUANTITY], got '{raw}'"));

    let (id, quantity) = match raw.split_once(':') {
        Some((id, quantity)) => (id, quantity.parse::<u32>().map_err(|_| invalid())?),
        None => (raw, 1),
    };
    let id = id.trim().parse::<i64>().map_err(|_| invalid())?;

    Ok((ProductId(id), quantity))
}
