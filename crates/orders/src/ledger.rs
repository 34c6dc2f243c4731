//! Inventory ledger: per-variation stock counters.
//!
//! The stock counter is the only shared mutable resource in this core. It is
//! mutated exclusively through [`InventoryLedger::reserve`] and
//! [`InventoryLedger::restore`]; nothing else may write it, which is what
//! preserves the `stock_quantity >= 0` invariant.

use async_trait::async_trait;
use rust_decimal::Decimal;

use cardhaus_core::VariationId;

use crate::error::LedgerError;

/// Atomic check-and-decrement / increment over variation stock.
///
/// Implementations must serialize concurrent reservations against the same
/// variation: of two concurrent `reserve` calls whose combined quantity
/// exceeds available stock, exactly one fails. The Postgres backend does
/// this with a single conditional `UPDATE` (never a separate read followed
/// by a separate write); the in-memory backend holds one lock across the
/// check and the decrement.
#[async_trait]
pub trait InventoryLedger: Send + Sync {
    /// Atomically reserve `quantity` units of a variation.
    ///
    /// On success the stock counter has been decremented and the variation's
    /// unit price, read in the same atomic step, is returned so callers can
    /// snapshot it without a second racy read.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InsufficientStock`] if fewer than `quantity` units
    ///   are available; no change is made.
    /// - [`LedgerError::VariationNotFound`] if the variation does not exist.
    /// - [`LedgerError::InvalidQuantity`] if `quantity < 1`.
    /// - [`LedgerError::Database`] on storage failure.
    async fn reserve(
        &self,
        variation_id: VariationId,
        quantity: i32,
    ) -> Result<Decimal, LedgerError>;

    /// Atomically return `quantity` units of a variation to stock.
    ///
    /// Reverses a prior successful [`reserve`](Self::reserve). Not
    /// idempotent: invoking it twice for one reservation doubles the stock.
    /// At-most-once is guaranteed by the order state machine (a cancelled
    /// order cannot be cancelled again), not by the ledger.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::VariationNotFound`] if the variation does not exist.
    /// - [`LedgerError::InvalidQuantity`] if `quantity < 1`.
    /// - [`LedgerError::Database`] on storage failure.
    async fn restore(&self, variation_id: VariationId, quantity: i32) -> Result<(), LedgerError>;

    /// Current stock for a variation.
    ///
    /// A point-in-time read; never use it to decide a reservation.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::VariationNotFound`] if the variation does not exist.
    /// - [`LedgerError::Database`] on storage failure.
    async fn stock_on_hand(&self, variation_id: VariationId) -> Result<i32, LedgerError>;
}
