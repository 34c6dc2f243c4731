//! Order domain types.
//!
//! These are validated domain objects, separate from database row types
//! (which live with the Postgres backend).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use cardhaus_core::{CustomerDetails, OrderId, OrderLineId, OrderStatus, VariationId};

/// A persisted order with its line items.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Customer contact and shipping details captured at checkout.
    pub customer: CustomerDetails,
    /// Sum of line totals at creation time. Never recomputed.
    pub total: Decimal,
    /// Line items, immutable after creation.
    pub lines: Vec<OrderLine>,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated (status changes only).
    pub updated_at: DateTime<Utc>,
}

/// A single line of an order.
///
/// `unit_price` is a snapshot taken at reservation time; later catalog price
/// changes do not retroactively alter historical orders.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLine {
    /// Database ID of this line.
    pub id: OrderLineId,
    /// Variation this line reserves stock for (weak reference).
    pub variation_id: VariationId,
    /// Quantity reserved. Always positive.
    pub quantity: i32,
    /// Unit price snapshot at order time.
    pub unit_price: Decimal,
}

impl OrderLine {
    /// Total for this line (`quantity * unit_price`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// One line of a customer's cart, as handed in by the storefront layer.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartLine {
    /// Variation the customer wants.
    pub variation_id: VariationId,
    /// Desired quantity. Validated by the checkout orchestrator.
    pub quantity: i32,
}

/// A fully reserved line ready for persistence: quantity plus the unit
/// price snapshot returned by the ledger at reservation time.
#[derive(Debug, Clone, Copy)]
pub struct NewOrderLine {
    /// Variation whose stock was reserved.
    pub variation_id: VariationId,
    /// Reserved quantity.
    pub quantity: i32,
    /// Unit price at reservation time.
    pub unit_price: Decimal,
}

impl NewOrderLine {
    /// Total for this line (`quantity * unit_price`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}
