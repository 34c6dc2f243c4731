//! Stock management commands.
//!
//! `set` goes through the ledger's admin upsert rather than raw SQL so the
//! non-negativity invariant stays owned by one module.

use rust_decimal::Decimal;
use tracing::info;

use cardhaus_core::VariationId;
use cardhaus_orders::ledger::InventoryLedger;
use cardhaus_orders::pg::PgInventoryLedger;

/// Print current stock for a variation.
///
/// # Errors
///
/// Returns an error if the variation does not exist or the database is
/// unreachable.
pub async fn show(variation: i32) -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    let ledger = PgInventoryLedger::new(pool);

    let variation_id = VariationId::new(variation);
    let on_hand = ledger.stock_on_hand(variation_id).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("variation {variation_id}: {on_hand} in stock");
    }
    Ok(())
}

/// Set stock and unit price for a variation, inserting it if missing.
///
/// # Errors
///
/// Returns an error if the quantity or price is negative, or on database
/// failure.
pub async fn set(
    variation: i32,
    quantity: i32,
    price: Decimal,
) -> Result<(), Box<dyn std::error::Error>> {
    if quantity < 0 {
        return Err(format!("stock quantity cannot be negative: {quantity}").into());
    }
    if price < Decimal::ZERO {
        return Err(format!("unit price cannot be negative: {price}").into());
    }

    let pool = super::connect().await?;
    let ledger = PgInventoryLedger::new(pool);

    let variation_id = VariationId::new(variation);
    ledger
        .upsert_variation(variation_id, quantity, price)
        .await?;

    info!(%variation_id, quantity, %price, "variation stock set");
    Ok(())
}
