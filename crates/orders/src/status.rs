//! Order status controller: admin-initiated lifecycle transitions.

use tracing::{error, info, instrument};

use cardhaus_core::{OrderId, OrderStatus};

use crate::error::StatusError;
use crate::ledger::InventoryLedger;
use crate::models::Order;
use crate::repository::OrderRepository;

/// Applies status transitions, restoring reserved stock when an order is
/// cancelled.
///
/// Legality lives in [`OrderStatus::can_transition_to`], enforced by the
/// repository's atomic read-modify-write, so the restoration side effect
/// runs exactly once: a second cancellation attempt loses at the state
/// machine before any stock is touched.
pub struct OrderStatusController<L, R> {
    ledger: L,
    orders: R,
}

impl<L, R> OrderStatusController<L, R>
where
    L: InventoryLedger,
    R: OrderRepository,
{
    /// Create a new status controller.
    pub const fn new(ledger: L, orders: R) -> Self {
        Self { ledger, orders }
    }

    /// Transition an order to `new_status`.
    ///
    /// On a transition to `cancelled`, every line's quantity is returned to
    /// the inventory ledger after the status change commits.
    ///
    /// # Errors
    ///
    /// - [`StatusError::Repository`] wrapping `NotFound`,
    ///   `IllegalTransition` (reporting current and requested status), or a
    ///   storage fault. No stock is touched in any of these cases.
    /// - [`StatusError::RestoreFailed`] if the cancellation committed but a
    ///   line's stock could not be restored. The order stays cancelled;
    ///   the discrepancy is logged for manual reconciliation and no retry
    ///   is attempted.
    #[instrument(skip(self), fields(%order_id, %new_status))]
    pub async fn transition(
        &self,
        order_id: OrderId,
        new_status: OrderStatus,
    ) -> Result<Order, StatusError> {
        let order = self.orders.transition(order_id, new_status).await?;
        info!(status = %order.status, "order transitioned");

        if new_status == OrderStatus::Cancelled {
            for line in &order.lines {
                if let Err(source) = self.ledger.restore(line.variation_id, line.quantity).await {
                    error!(
                        variation_id = %line.variation_id,
                        quantity = line.quantity,
                        error = %source,
                        "stock restoration failed after cancellation committed; \
                         manual reconciliation required"
                    );
                    return Err(StatusError::RestoreFailed {
                        order_id,
                        variation_id: line.variation_id,
                        source,
                    });
                }
            }
            info!(lines = order.lines.len(), "cancelled order stock restored");
        }

        Ok(order)
    }
}
