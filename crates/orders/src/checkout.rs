//! Checkout orchestrator: cart in, persisted order (or clean rejection) out.

use std::collections::BTreeMap;

use tracing::{error, info, instrument};

use cardhaus_core::{CustomerDetails, VariationId};

use crate::error::CheckoutError;
use crate::ledger::InventoryLedger;
use crate::models::{CartLine, NewOrderLine, Order};
use crate::repository::OrderRepository;

/// Turns a cart into either a persisted order or a clean rejection, with no
/// partial stock loss.
///
/// Reservations are made in ascending variation-id order so concurrent
/// checkouts over overlapping variation sets acquire row locks in the same
/// order. Any failure after the first successful reservation triggers
/// compensating restores before the error is returned; stock reserved by a
/// failed checkout is never left decremented.
pub struct CheckoutService<L, R> {
    ledger: L,
    orders: R,
}

impl<L, R> CheckoutService<L, R>
where
    L: InventoryLedger,
    R: OrderRepository,
{
    /// Create a new checkout service.
    pub const fn new(ledger: L, orders: R) -> Self {
        Self { ledger, orders }
    }

    /// Check out a cart.
    ///
    /// Duplicate lines for the same variation are merged before reservation.
    /// On success the returned order has status `pending` and its lines
    /// carry unit prices snapshotted at reservation time.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`] if the cart has no lines.
    /// - [`CheckoutError::InvalidQuantity`] if any line quantity is < 1.
    /// - [`CheckoutError::InsufficientStock`] naming the failing line; all
    ///   reservations made by this attempt have been rolled back.
    /// - [`CheckoutError::VariationNotFound`] if a line references a
    ///   variation missing from the catalog (integrity failure).
    /// - [`CheckoutError::PersistenceFailed`] if storage failed while
    ///   reserving or persisting; reservations have been rolled back.
    #[instrument(skip(self, customer, cart), fields(cart_lines = cart.len()))]
    pub async fn checkout(
        &self,
        customer: CustomerDetails,
        cart: Vec<CartLine>,
    ) -> Result<Order, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        for line in &cart {
            if line.quantity < 1 {
                return Err(CheckoutError::InvalidQuantity {
                    variation_id: line.variation_id,
                    quantity: line.quantity,
                });
            }
        }

        // Merge duplicates; BTreeMap iteration gives the deterministic
        // ascending-id lock order. The merged quantity must still fit in
        // i32, so an overflowing sum is rejected like any other bad
        // quantity.
        let mut wanted: BTreeMap<VariationId, i32> = BTreeMap::new();
        for line in cart {
            let merged = wanted.entry(line.variation_id).or_insert(0);
            *merged = merged.checked_add(line.quantity).ok_or(
                CheckoutError::InvalidQuantity {
                    variation_id: line.variation_id,
                    quantity: line.quantity,
                },
            )?;
        }

        let mut reserved: Vec<NewOrderLine> = Vec::with_capacity(wanted.len());
        for (variation_id, quantity) in wanted {
            match self.ledger.reserve(variation_id, quantity).await {
                Ok(unit_price) => reserved.push(NewOrderLine {
                    variation_id,
                    quantity,
                    unit_price,
                }),
                Err(err) => {
                    info!(
                        %variation_id,
                        quantity,
                        error = %err,
                        "checkout rejected, rolling back prior reservations"
                    );
                    self.release(&reserved).await;
                    return Err(err.into());
                }
            }
        }

        match self.orders.create(customer, reserved.clone()).await {
            Ok(order) => {
                info!(order_id = %order.id, total = %order.total, "order created");
                Ok(order)
            }
            Err(err) => {
                error!(error = %err, "order persistence failed, rolling back reservations");
                self.release(&reserved).await;
                Err(CheckoutError::PersistenceFailed(err))
            }
        }
    }

    /// Compensating rollback of every reservation made by this attempt.
    ///
    /// A restore that itself fails leaves stock decremented with no order
    /// backing it; that is logged for manual reconciliation rather than
    /// masking the error the caller is about to receive.
    async fn release(&self, reserved: &[NewOrderLine]) {
        for line in reserved {
            if let Err(err) = self.ledger.restore(line.variation_id, line.quantity).await {
                error!(
                    variation_id = %line.variation_id,
                    quantity = line.quantity,
                    error = %err,
                    "compensating restore failed; stock requires manual reconciliation"
                );
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use cardhaus_core::{OrderId, OrderStatus};

    use super::*;
    use crate::error::RepositoryError;
    use crate::memory::InMemoryStore;

    fn price(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn customer() -> CustomerDetails {
        CustomerDetails::new(
            "Misty Waters".to_owned(),
            "misty@example.com".parse().unwrap(),
            "12 Gym Road, Cerulean".to_owned(),
        )
    }

    fn line(variation: i32, quantity: i32) -> CartLine {
        CartLine {
            variation_id: VariationId::new(variation),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_happy_path_creates_pending_order_and_decrements_stock() {
        let store = InMemoryStore::new();
        let v1 = VariationId::new(1);
        store.put_variation(v1, 10, price(499)).await;
        let service = CheckoutService::new(store.clone(), store.clone());

        let order = service
            .checkout(customer(), vec![line(1, 3)])
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines[0].quantity, 3);
        assert_eq!(order.lines[0].unit_price, price(499));
        assert_eq!(order.total, price(1497));
        assert_eq!(store.stock_on_hand(v1).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let store = InMemoryStore::new();
        let service = CheckoutService::new(store.clone(), store);

        let err = service.checkout(customer(), vec![]).await.unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[tokio::test]
    async fn test_non_positive_quantity_is_rejected_before_any_reservation() {
        let store = InMemoryStore::new();
        let v1 = VariationId::new(1);
        store.put_variation(v1, 10, price(100)).await;
        let service = CheckoutService::new(store.clone(), store.clone());

        let err = service
            .checkout(customer(), vec![line(1, 2), line(2, 0)])
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidQuantity { .. }));
        // Validation happens before any reserve call.
        assert_eq!(store.stock_on_hand(v1).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_duplicate_lines_are_merged() {
        let store = InMemoryStore::new();
        let v1 = VariationId::new(1);
        store.put_variation(v1, 10, price(200)).await;
        let service = CheckoutService::new(store.clone(), store.clone());

        let order = service
            .checkout(customer(), vec![line(1, 2), line(1, 3)])
            .await
            .unwrap();

        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines[0].quantity, 5);
        assert_eq!(store.stock_on_hand(v1).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_merged_quantity_overflow_is_rejected_before_any_reservation() {
        // Each line passes the per-line check; only their sum overflows.
        let store = InMemoryStore::new();
        let v1 = VariationId::new(1);
        store.put_variation(v1, 10, price(100)).await;
        let service = CheckoutService::new(store.clone(), store.clone());

        let err = service
            .checkout(customer(), vec![line(1, i32::MAX), line(1, 1)])
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidQuantity { .. }));
        assert_eq!(store.stock_on_hand(v1).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_failed_line_rolls_back_earlier_reservations() {
        let store = InMemoryStore::new();
        let v1 = VariationId::new(1);
        let v2 = VariationId::new(2);
        store.put_variation(v1, 10, price(100)).await;
        store.put_variation(v2, 1, price(100)).await;
        let service = CheckoutService::new(store.clone(), store.clone());

        let err = service
            .checkout(customer(), vec![line(1, 4), line(2, 2)])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::InsufficientStock {
                requested: 2,
                available: 1,
                ..
            }
        ));
        // First line's reservation was compensated.
        assert_eq!(store.stock_on_hand(v1).await.unwrap(), 10);
        assert_eq!(store.stock_on_hand(v2).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_variation_rolls_back_and_reports_integrity_error() {
        let store = InMemoryStore::new();
        let v1 = VariationId::new(1);
        store.put_variation(v1, 10, price(100)).await;
        let service = CheckoutService::new(store.clone(), store.clone());

        let err = service
            .checkout(customer(), vec![line(1, 1), line(99, 1)])
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::VariationNotFound(id) if id == VariationId::new(99)));
        assert_eq!(store.stock_on_hand(v1).await.unwrap(), 10);
    }

    /// Repository double whose `create` always fails with a storage fault.
    struct BrokenOrderRepository;

    #[async_trait]
    impl OrderRepository for BrokenOrderRepository {
        async fn create(
            &self,
            _customer: CustomerDetails,
            _lines: Vec<NewOrderLine>,
        ) -> Result<Order, RepositoryError> {
            Err(RepositoryError::Database(sqlx::Error::PoolClosed))
        }

        async fn get(&self, order_id: OrderId) -> Result<Order, RepositoryError> {
            Err(RepositoryError::NotFound(order_id))
        }

        async fn transition(
            &self,
            order_id: OrderId,
            _new_status: OrderStatus,
        ) -> Result<Order, RepositoryError> {
            Err(RepositoryError::NotFound(order_id))
        }

        async fn list_recent(&self, _limit: i64) -> Result<Vec<Order>, RepositoryError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_persistence_failure_restores_all_reservations() {
        let store = InMemoryStore::new();
        let v1 = VariationId::new(1);
        let v2 = VariationId::new(2);
        store.put_variation(v1, 5, price(100)).await;
        store.put_variation(v2, 5, price(100)).await;
        let service = CheckoutService::new(store.clone(), BrokenOrderRepository);

        let err = service
            .checkout(customer(), vec![line(1, 2), line(2, 3)])
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::PersistenceFailed(_)));
        assert_eq!(store.stock_on_hand(v1).await.unwrap(), 5);
        assert_eq!(store.stock_on_hand(v2).await.unwrap(), 5);
    }
}
