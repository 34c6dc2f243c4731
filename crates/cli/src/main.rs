//! Cardhaus CLI - Database migrations and stock management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! ch-cli migrate
//!
//! # Show current stock for a variation
//! ch-cli stock show -v 7
//!
//! # Set stock and price for a variation (insert or replace)
//! ch-cli stock set -v 7 -q 10 -p 3.50
//!
//! # List recent orders
//! ch-cli orders recent -n 20
//! ```
//!
//! # Environment Variables
//!
//! - `CARDHAUS_DATABASE_URL` - `PostgreSQL` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;

#[derive(Parser)]
#[command(name = "ch-cli")]
#[command(author, version, about = "Cardhaus CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage variation stock
    Stock {
        #[command(subcommand)]
        action: StockAction,
    },
    /// Inspect orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum StockAction {
    /// Show current stock for a variation
    Show {
        /// Variation ID
        #[arg(short, long)]
        variation: i32,
    },
    /// Set stock and unit price for a variation (insert or replace)
    Set {
        /// Variation ID
        #[arg(short, long)]
        variation: i32,

        /// Stock quantity
        #[arg(short, long)]
        quantity: i32,

        /// Unit price (e.g. 3.50)
        #[arg(short, long)]
        price: Decimal,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List the most recently created orders
    Recent {
        /// How many orders to show
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: i64,
    },
    /// Show one order with its lines
    Show {
        /// Order ID
        #[arg(short, long)]
        order: i32,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Stock { action } => match action {
            StockAction::Show { variation } => commands::stock::show(variation).await?,
            StockAction::Set {
                variation,
                quantity,
                price,
            } => commands::stock::set(variation, quantity, price).await?,
        },
        Commands::Orders { action } => match action {
            OrdersAction::Recent { limit } => commands::orders::recent(limit).await?,
            OrdersAction::Show { order } => commands::orders::show(order).await?,
        },
    }
    Ok(())
}
