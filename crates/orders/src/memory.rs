//! In-memory backend for tests and examples.
//!
//! Implements both [`InventoryLedger`] and [`OrderRepository`] over a single
//! mutex-guarded map, so the full checkout and lifecycle flows can be
//! exercised without a database. Check-and-decrement happens inside one
//! critical section, giving the same serialization guarantee the Postgres
//! backend gets from its conditional `UPDATE`.
//!
//! Cloning is cheap and clones share state, mirroring how `PgPool` handles
//! are shared across services.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use cardhaus_core::{CustomerDetails, OrderId, OrderLineId, OrderStatus, VariationId};

use crate::error::{LedgerError, RepositoryError};
use crate::ledger::InventoryLedger;
use crate::models::{NewOrderLine, Order, OrderLine};
use crate::repository::OrderRepository;

#[derive(Debug, Clone, Copy)]
struct VariationRecord {
    stock_quantity: i32,
    unit_price: Decimal,
}

#[derive(Default)]
struct Inner {
    variations: BTreeMap<VariationId, VariationRecord>,
    orders: BTreeMap<OrderId, Order>,
    next_order_id: i32,
    next_line_id: i32,
}

/// Shared in-memory store implementing both storage traits.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a variation with the given stock and price.
    pub async fn put_variation(&self, id: VariationId, stock_quantity: i32, unit_price: Decimal) {
        let mut inner = self.inner.lock().await;
        inner.variations.insert(
            id,
            VariationRecord {
                stock_quantity,
                unit_price,
            },
        );
    }
}

#[async_trait]
impl InventoryLedger for InMemoryStore {
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

        let mut inner = self.inner.lock().await;
        let record = inner
            .variations
            .get_mut(&variation_id)
            .ok_or(LedgerError::VariationNotFound(variation_id))?;

        if record.stock_quantity < quantity {
            return Err(LedgerError::InsufficientStock {
                variation_id,
                requested: quantity,
                available: record.stock_quantity,
            });
        }

        record.stock_quantity -= quantity;
        Ok(record.unit_price)
    }

    async fn restore(&self, variation_id: VariationId, quantity: i32) -> Result<(), LedgerError> {
        if quantity < 1 {
            return Err(LedgerError::InvalidQuantity {
                variation_id,
                quantity,
            });
        }

        let mut inner = self.inner.lock().await;
        let record = inner
            .variations
            .get_mut(&variation_id)
            .ok_or(LedgerError::VariationNotFound(variation_id))?;

        record.stock_quantity += quantity;
        Ok(())
    }

    async fn stock_on_hand(&self, variation_id: VariationId) -> Result<i32, LedgerError> {
        let inner = self.inner.lock().await;
        inner
            .variations
            .get(&variation_id)
            .map(|r| r.stock_quantity)
            .ok_or(LedgerError::VariationNotFound(variation_id))
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn create(
        &self,
        customer: CustomerDetails,
        lines: Vec<NewOrderLine>,
    ) -> Result<Order, RepositoryError> {
        let mut inner = self.inner.lock().await;

        inner.next_order_id += 1;
        let order_id = OrderId::new(inner.next_order_id);

        let mut order_lines = Vec::with_capacity(lines.len());
        let mut total = Decimal::ZERO;
        for line in lines {
            inner.next_line_id += 1;
            total += line.line_total();
            order_lines.push(OrderLine {
                id: OrderLineId::new(inner.next_line_id),
                variation_id: line.variation_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
            });
        }

        let now = Utc::now();
        let order = Order {
            id: order_id,
            status: OrderStatus::Pending,
            customer,
            total,
            lines: order_lines,
            created_at: now,
            updated_at: now,
        };
        inner.orders.insert(order_id, order.clone());
        Ok(order)
    }

    async fn get(&self, order_id: OrderId) -> Result<Order, RepositoryError> {
        let inner = self.inner.lock().await;
        inner
            .orders
            .get(&order_id)
            .cloned()
            .ok_or(RepositoryError::NotFound(order_id))
    }

    async fn transition(
        &self,
        order_id: OrderId,
        new_status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        // One critical section covers the read, the validation, and the
        // write, so concurrent transitions serialize just like row locks.
        let mut inner = self.inner.lock().await;
        let order = inner
            .orders
            .get_mut(&order_id)
            .ok_or(RepositoryError::NotFound(order_id))?;

        if !order.status.can_transition_to(new_status) {
            return Err(RepositoryError::IllegalTransition {
                from: order.status,
                requested: new_status,
            });
        }

        order.status = new_status;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Order>, RepositoryError> {
        let inner = self.inner.lock().await;
        let mut orders: Vec<Order> = inner.orders.values().cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        orders.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(orders)
    }
}
