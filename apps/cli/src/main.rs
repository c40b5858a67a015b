//! Vitrine CLI - browse, buy, and manage a storefront from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List products, optionally filtered
//! vitrine products
//! vitrine products --category 2 --search caneca
//!
//! # List categories as JSON
//! vitrine categories --json
//!
//! # Place an order in one go (product 3 × 2, product 7 × 1)
//! vitrine order -e ana@loja.example -p secret 3:2 7
//!
//! # Interactive session: login, cart, checkout, admin
//! vitrine shell
//!
//! # Show or create the config file
//! vitrine config show
//! vitrine config init --api-url https://api.loja.example
//! ```
//!
//! # Environment Variables
//!
//! - `VITRINE_API_URL` - Backend base URL (overrides the config file)
//! - `VITRINE_TIMEOUT_SECS` - Request timeout in seconds
//! - `RUST_LOG` - Log filter (default `info,vitrine=debug,reqwest=warn`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vitrine_client::ClientConfig;

mod commands;
mod error;

use error::CliResult;

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(author, version, about = "Vitrine storefront client")]
struct Cli {
    /// Path to vitrine.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding config file and environment
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Only list products in this category
        #[arg(short, long)]
        category: Option<i64>,

        /// Only list products whose name contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List categories
    Categories {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Log in, fill a cart, and check out
    Order {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,

        /// Items as PRODUCT_ID[:QUANTITY]
        #[arg(required = true)]
        items: Vec<String>,
    },
    /// Interactive storefront session
    Shell,
    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a config file with the effective settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = load_config(cli.config.clone(), cli.api_url)?;

    match cli.command {
        Commands::Products {
            category,
            search,
            json,
        } => commands::catalog::products(&config, category, search.as_deref(), json).await?,
        Commands::Categories { json } => commands::catalog::categories(&config, json).await?,
        Commands::Order {
            email,
            password,
            items,
        } => commands::order::place(&config, &email, &password, &items).await?,
        Commands::Shell => commands::shell::run(&config).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&config)?,
            ConfigAction::Init { force } => commands::config::init(&config, cli.config, force)?,
        },
    }
    Ok(())
}

/// Loads config from file and environment, then applies the `--api-url` flag.
fn load_config(path: Option<PathBuf>, api_url: Option<String>) -> CliResult<ClientConfig> {
    let mut config = ClientConfig::load(path)?;
    if let Some(url) = api_url {
        config.api.base_url = url;
        config.validate()?;
    }
    Ok(config)
}

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - Default: INFO for all crates, DEBUG for vitrine crates
/// - Set `RUST_LOG` environment variable to override
///
/// Logs go to stderr so command output stays pipeable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,vitrine=debug,reqwest=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
