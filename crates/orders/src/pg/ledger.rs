//! Postgres-backed inventory ledger.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use tracing::error;

use cardhaus_core::VariationId;

use crate::error::LedgerError;
use crate::ledger::InventoryLedger;

/// Inventory ledger over `shop.variation`.
///
/// Reservation is a single conditional `UPDATE` checked by affected-row
/// count, so the check and the decrement are one atomic statement and
/// concurrent reservations against the same row serialize on the row lock.
#[derive(Clone)]
pub struct PgInventoryLedger {
    pool: PgPool,
}

impl PgInventoryLedger {
    /// Create a ledger over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or replace a variation's stock counter and unit price.
    ///
    /// Admin/seeding entry point; customer-facing flows never set the
    /// counter directly.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Database`] on storage failure.
    pub async fn upsert_variation(
        &self,
        variation_id: VariationId,
        stock_quantity: i32,
        unit_price: Decimal,
    ) -> Result<(), LedgerError> {
        sqlx::query(
            r"
            INSERT INTO shop.variation (id, stock_quantity, unit_price)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE
            SET stock_quantity = EXCLUDED.stock_quantity,
                unit_price = EXCLUDED.unit_price,
                updated_at = now()
            ",
        )
        .bind(variation_id)
        .bind(stock_quantity)
        .bind(unit_price)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl InventoryLedger for PgInventoryLedger {
    async fn reserve(
        &self,
        variation_id: VariationId,
        quantity: i32,
    ) -> Result<Decimal, LedgerError> {
        if quantity < 1 {
            return Err(LedgerError::InvalidQuantity {
                variation_id,
                quantity,
            });
        }

        // Check-and-decrement in one statement; the WHERE clause is the
        // stock check, the affected-row count is the answer.
        let row = sqlx::query(
            r"
            UPDATE shop.variation
            SET stock_quantity = stock_quantity - $2, updated_at = now()
            WHERE id = $1 AND stock_quantity >= $2
            RETURNING unit_price
            ",
        )
        .bind(variation_id)
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            return Ok(row.try_get("unit_price")?);
        }

        // Nothing updated: either the row is short on stock or it vanished.
        let available: Option<i32> =
            sqlx::query_scalar("SELECT stock_quantity FROM shop.variation WHERE id = $1")
                .bind(variation_id)
                .fetch_optional(&self.pool)
                .await?;

        match available {
            Some(available) => Err(LedgerError::InsufficientStock {
                variation_id,
                requested: quantity,
                available,
            }),
            None => {
                error!(%variation_id, "reserve against missing variation");
                Err(LedgerError::VariationNotFound(variation_id))
            }
        }
    }

    async fn restore(&self, variation_id: VariationId, quantity: i32) -> Result<(), LedgerError> {
        if quantity < 1 {
            return Err(LedgerError::InvalidQuantity {
                variation_id,
                quantity,
            });
        }

        let result = sqlx::query(
            r"
            UPDATE shop.variation
            SET stock_quantity = stock_quantity + $2, updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(variation_id)
        .bind(quantity)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            error!(%variation_id, "restore against missing variation");
            return Err(LedgerError::VariationNotFound(variation_id));
        }
        Ok(())
    }

    async fn stock_on_hand(&self, variation_id: VariationId) -> Result<i32, LedgerError> {
        sqlx::query_scalar("SELECT stock_quantity FROM shop.variation WHERE id = $1")
            .bind(variation_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(LedgerError::VariationNotFound(variation_id))
    }
}
