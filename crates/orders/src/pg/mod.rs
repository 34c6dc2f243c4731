//! Postgres backends for the inventory ledger and order repository.
//!
//! # Database: `shop` schema
//!
//! - `shop.variation` - per-variation stock counters and unit prices
//! - `shop.orders` - orders with customer details and status
//! - `shop.order_line` - immutable line items referencing variations
//!
//! Migrations live in `crates/orders/migrations/` and are embedded via
//! `sqlx::migrate!`; run them with:
//! ```bash
//! cargo run -p cardhaus-cli -- migrate
//! ```

mod ledger;
mod orders;

pub use ledger::PgInventoryLedger;
pub use orders::PgOrderRepository;
