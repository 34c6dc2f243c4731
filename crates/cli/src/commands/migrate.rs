//! Database migration command.

use tracing::info;

/// Run the embedded `shop` schema migrations.
///
/// # Errors
///
/// Returns an error if configuration is missing, the database is
/// unreachable, or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    info!("Connecting to database...");
    let pool = super::connect().await?;

    info!("Running shop migrations...");
    cardhaus_orders::db::run_migrations(&pool).await?;

    info!("Migrations complete");
    Ok(())
}
