//! Integration tests for Cardhaus.
//!
//! These tests drive the checkout orchestrator and status controller
//! end to end over the in-memory backend, so they run without a database.
//! The Postgres backends share the same trait contracts and are covered by
//! the ledger's conditional-UPDATE design plus the state machine living in
//! `cardhaus-core`.
//!
//! # Test Categories
//!
//! - `checkout_flow` - cart to pending order, rollback on partial failure
//! - `order_lifecycle` - the full status state machine over real orders
//! - `stock_contention` - concurrent checkouts against shared stock

#![cfg_attr(not(test), forbid(unsafe_code))]

use rust_decimal::Decimal;

use cardhaus_core::{CustomerDetails, VariationId};
use cardhaus_orders::memory::InMemoryStore;
use cardhaus_orders::models::CartLine;

/// A customer record for tests.
///
/// # Panics
///
/// Panics if the hardcoded email fails to parse (it does not).
#[must_use]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
pub fn test_customer() -> CustomerDetails {
    CustomerDetails::new(
        "Gary Oak".to_owned(),
        "gary@example.com".parse().unwrap(),
        "1 Rival Road, Pallet Town".to_owned(),
    )
}

/// A price of `cents / 100`.
#[must_use]
pub fn price(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// A cart line.
#[must_use]
pub fn line(variation: i32, quantity: i32) -> CartLine {
    CartLine {
        variation_id: VariationId::new(variation),
        quantity,
    }
}

/// A store seeded with one variation.
pub async fn store_with_variation(variation: i32, stock: i32, unit_price_cents: i64) -> InMemoryStore {
    let store = InMemoryStore::new();
    store
        .put_variation(VariationId::new(variation), stock, price(unit_price_cents))
        .await;
    store
}
