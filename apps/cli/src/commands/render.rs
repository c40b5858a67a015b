//! Plain-text tables for terminal output.

use std::fmt::Write;

use vitrine_client::CheckoutConfirmation;
use vitrine_core::{Cart, CartTotals, Category, Product, User};

/// One row per product: id, name, price, stock, category.
pub fn products(products: &[Product], categories: &[Category]) -> String {
    if products.is_empty() {
        return "No products found.\n".to_string();
    }

    let mut out = format!(
        "{:>5}  {:<32}  {:>10}  {:>5}  {}\n",
        "ID", "NAME", "PRICE", "STOCK", "CATEGORY"
    );
    for product in products {
        let category = categories
            .iter()
            .find(|c| c.id == product.category_id)
            .map_or_else(|| product.category_id.to_string(), |c| c.name.clone());
        let stock = if product.in_stock() {
            product.stock.to_string()
        } else {
            "sold out".to_string()
        };
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "{:>5}  {:<32}  {:>10}  {:>5}  {}",
            product.id,
            truncate(&product.name, 32),
            product.price.to_string(),
            stock,
            category
        );
    }
    out
}

pub fn categories(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n".to_string();
    }

    let mut out = format!("{:>5}  {}\n", "ID", "NAME");
    for category in categories {
        let _ = writeln!(out, "{:>5}  {}", category.id, category.name);
    }
    out
}

/// Cart lines followed by the totals footer.
pub fn cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty.\n".to_string();
    }

    let mut out = String::new();
    for item in cart.items() {
        let _ = writeln!(
            out,
            "{:>5}  {:<32}  {:>3} × {:>10}  = {:>10}",
            item.product_id(),
            truncate(&item.product.name, 32),
            item.quantity,
            item.product.price.to_string(),
            item.line_total().to_string()
        );
    }

    let totals = CartTotals::from(cart);
    let _ = writeln!(
        out,
        "{} line(s), {} item(s), total {}",
        totals.line_count, totals.total_items, totals.total_price
    );
    out
}

pub fn user(user: &User) -> String {
    format!("{} <{}> ({})\n", user.name, user.email, user.role)
}

pub fn confirmation(confirmation: &CheckoutConfirmation) -> String {
    if confirmation.message.is_empty() {
        "Order placed.\n".to_string()
    } else {
        format!("{}\n", confirmation.message)
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
