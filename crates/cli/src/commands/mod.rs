//! CLI command implementations.

pub mod migrate;
pub mod orders;
pub mod stock;

use cardhaus_orders::config::OrdersConfig;
use sqlx::PgPool;

/// Load configuration and open a pool; shared by every command that talks
/// to the database.
pub async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    let config = OrdersConfig::from_env()?;
    let pool = cardhaus_orders::db::create_pool(&config).await?;
    Ok(pool)
}
