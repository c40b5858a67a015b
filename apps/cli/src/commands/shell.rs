//! Interactive storefront shell.
//!
//! One [`StorefrontSession`] lives for the whole shell, so login, cart, and
//! catalog carry across lines.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stdin line ──► split_words ──► ShellLine (clap) ──► execute           │
//! │                                                         │              │
//! │                     ┌───────────────────────────────────┤              │
//! │                     ▼                                   ▼              │
//! │              Flow::Output(text)                   Flow::Quit            │
//! │              printed, prompt again                session.logout()      │
//! │                                                                         │
//! │  Errors are printed and the shell keeps going.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::Write as _;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;
use vitrine_client::{ClientConfig, StorefrontApi, StorefrontSession};
use vitrine_core::validation::validate_search_query;
use vitrine_core::{CategoryId, Money, NewCategory, NewProduct, ProductId, ProductUpdate};

use super::render;
use crate::error::{CliError, CliResult};

#[derive(Debug, Parser)]
#[command(no_binary_name = true, name = "shell", disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, PartialEq, Subcommand)]
enum ShellCommand {
    /// List products, optionally in one category
    Products { category: Option<i64> },
    /// Search products by name
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// List categories
    Categories,
    /// Reload products and categories from the server
    Refresh,
    /// Log in
    Login { email: String, password: String },
    /// Create an account
    Register {
        name: String,
        email: String,
        password: String,
    },
    /// Log out and empty the cart
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Add a product to the cart
    Add {
        product_id: i64,
        #[arg(default_value_t = 1)]
        quantity: u32,
    },
    /// Take one unit of a product out of the cart
    Dec { product_id: i64 },
    /// Remove a product from the cart
    Remove { product_id: i64 },
    /// Set the quantity of a cart entry (0 removes it)
    Set { product_id: i64, quantity: u32 },
    /// Show the cart
    Cart,
    /// Place the order
    Checkout,
    /// Catalog management (admin only)
    #[command(subcommand)]
    Admin(AdminCommand),
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, PartialEq, Subcommand)]
enum AdminCommand {
    /// Create a product
    NewProduct {
        name: String,
        price: Money,
        stock: u32,
        category_id: i64,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        image_url: String,
    },
    /// Set a product's stock
    Stock { product_id: i64, stock: u32 },
    /// Set a product's price
    Price { product_id: i64, price: Money },
    /// Delete a product
    DeleteProduct { product_id: i64 },
    /// Create a category
    NewCategory { name: String },
    /// Delete a category
    DeleteCategory { category_id: i64 },
}

/// What the shell does after a command.
#[derive(Debug, PartialEq)]
enum Flow {
    Output(String),
    Quit,
}

/// Runs the shell until `quit` or end of input.
pub async fn run(config: &ClientConfig) -> CliResult<()> {
    let session = StorefrontSession::connect(config)?;
    if let Err(e) = session.refresh().await {
        warn!(error = %e, "Initial catalog load failed");
    }

    println!("Vitrine shell. Type 'help' for commands, 'quit' to leave.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt(&session)?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let words = match split_words(line) {
            Ok(words) => words,
            Err(e) => {
                println!("error: {e}");
                continue;
            }
        };
        let parsed = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(e) => {
                print!("{}", e.render());
                continue;
            }
        };

        match execute(&session, parsed.command).await {
            Ok(Flow::Output(text)) => print!("{text}"),
            Ok(Flow::Quit) => break,
            Err(e) => println!("error: {e}"),
        }
    }

    session.logout();
    Ok(())
}

fn prompt<A: StorefrontApi>(session: &StorefrontSession<A>) -> CliResult<()> {
    let who = session
        .auth()
        .current_user()
        .map_or_else(|| "guest".to_string(), |u| u.email);
    let items = session.cart().total_items();
    print!("{who} [{items}]> ");
    std::io::stdout().flush()?;
    Ok(())
}

async fn execute<A: StorefrontApi>(
    session: &StorefrontSession<A>,
    command: ShellCommand,
) -> CliResult<Flow> {
    let catalog = session.catalog();
    let cart = session.cart();

    let text = match command {
        ShellCommand::Products { category } => render::products(
            &catalog.in_category(category.map(CategoryId)),
            &catalog.categories(),
        ),
        ShellCommand::Search { query } => {
            let query = validate_search_query(&query.join(" "))?;
            render::products(&catalog.search(&query), &catalog.categories())
        }
        ShellCommand::Categories => render::categories(&catalog.categories()),
        ShellCommand::Refresh => {
            session.refresh().await?;
            format!(
                "Catalog refreshed: {} products, {} categories.\n",
                catalog.products().len(),
                catalog.categories().len()
            )
        }
        ShellCommand::Login { email, password } => {
            let user = session.auth().login(&email, &password).await?;
            format!("Welcome, {}.\n", user.name)
        }
        ShellCommand::Register {
            name,
            email,
            password,
        } => {
            let user = session.auth().register(&name, &email, &password).await?;
            format!("Account created for {}. Log in to continue.\n", user.email)
        }
        ShellCommand::Logout => {
            session.logout();
            "Logged out.\n".to_string()
        }
        ShellCommand::Whoami => session
            .auth()
            .current_user()
            .map_or_else(|| "Not logged in.\n".to_string(), |u| render::user(&u)),
        ShellCommand::Add {
            product_id,
            quantity,
        } => {
            session.add_to_cart(ProductId(product_id), quantity)?;
            cart.with_cart(render::cart)
        }
        ShellCommand::Dec { product_id } => {
            if !cart.decrease(ProductId(product_id)) {
                return Ok(not_in_cart(product_id));
            }
            cart.with_cart(render::cart)
        }
        ShellCommand::Remove { product_id } => {
            if !cart.remove(ProductId(product_id)) {
                return Ok(not_in_cart(product_id));
            }
            cart.with_cart(render::cart)
        }
        ShellCommand::Set {
            product_id,
            quantity,
        } => {
            cart.set_quantity(ProductId(product_id), quantity)?;
            cart.with_cart(render::cart)
        }
        ShellCommand::Cart => cart.with_cart(render::cart),
        ShellCommand::Checkout => render::confirmation(&session.checkout().await?),
        ShellCommand::Admin(command) => admin(session, command).await?,
        ShellCommand::Quit => return Ok(Flow::Quit),
    };

    Ok(Flow::Output(text))
}

async fn admin<A: StorefrontApi>(
    session: &StorefrontSession<A>,
    command: AdminCommand,
) -> CliResult<String> {
    let text = match command {
        AdminCommand::NewProduct {
            name,
            price,
            stock,
            category_id,
            description,
            image_url,
        } => {
            let product = session
                .create_product(&NewProduct {
                    name,
                    price,
                    description,
                    stock,
                    image_url,
                    category_id: CategoryId(category_id),
                })
                .await?;
            format!("Created product {} ({}).\n", product.id, product.name)
        }
        AdminCommand::Stock { product_id, stock } => {
            let product = session
                .update_product(ProductId(product_id), &ProductUpdate::stock(stock))
                .await?;
            format!("{} now has {} in stock.\n", product.name, product.stock)
        }
        AdminCommand::Price { product_id, price } => {
            let update = ProductUpdate {
                price: Some(price),
                ..ProductUpdate::default()
            };
            let product = session
                .update_product(ProductId(product_id), &update)
                .await?;
            format!("{} now costs {}.\n", product.name, product.price)
        }
        AdminCommand::DeleteProduct { product_id } => {
            session.delete_product(ProductId(product_id)).await?;
            format!("Deleted product {product_id}.\n")
        }
        AdminCommand::NewCategory { name } => {
            let category = session
                .create_category(&NewCategory { name })
                .await?;
            format!("Created category {} ({}).\n", category.id, category.name)
        }
        AdminCommand::DeleteCategory { category_id } => {
            session.delete_category(CategoryId(category_id)).await?;
            format!("Deleted category {category_id}.\n")
        }
    };
    Ok(text)
}

fn not_in_cart(product_id: i64) -> Flow {
    Flow::Output(format!("Product {product_id} is not in the cart.\n"))
}

/// Splits a shell line on whitespace, keeping double-quoted runs together.
fn split_words(line: &str) -> CliResult<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quoted {
        return Err(CliError::InvalidArgument("unclosed quote".to_string()));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
