//! Order status state machine tests over real orders.

#![allow(clippy::unwrap_used)]

use cardhaus_core::{OrderId, OrderStatus, VariationId};
use cardhaus_integration_tests::{line, store_with_variation, test_customer};
use cardhaus_orders::error::{RepositoryError, StatusError};
use cardhaus_orders::memory::InMemoryStore;
use cardhaus_orders::{
    CheckoutService, InventoryLedger, OrderRepository, OrderStatusController,
};

/// Create an order and drive it into `target` through legal transitions.
async fn order_in_state(store: &InMemoryStore, target: OrderStatus) -> OrderId {
    let service = CheckoutService::new(store.clone(), store.clone());
    let controller = OrderStatusController::new(store.clone(), store.clone());

    let order = service
        .checkout(test_customer(), vec![line(1, 1)])
        .await
        .unwrap();

    match target {
        OrderStatus::Pending => {}
        OrderStatus::Confirmed => {
            controller
                .transition(order.id, OrderStatus::Confirmed)
                .await
                .unwrap();
        }
        OrderStatus::Completed => {
            controller
                .transition(order.id, OrderStatus::Confirmed)
                .await
                .unwrap();
            controller
                .transition(order.id, OrderStatus::Completed)
                .await
                .unwrap();
        }
        OrderStatus::Cancelled => {
            controller
                .transition(order.id, OrderStatus::Cancelled)
                .await
                .unwrap();
        }
    }
    order.id
}

#[tokio::test]
async fn test_every_pair_matches_the_transition_table() {
    // Exhaustive sweep: for each (from, to) pair, build a fresh order in
    // `from` and check the controller agrees with the table.
    for from in OrderStatus::ALL {
        for to in OrderStatus::ALL {
            let store = store_with_variation(1, 100, 100).await;
            let controller = OrderStatusController::new(store.clone(), store.clone());
            let order_id = order_in_state(&store, from).await;

            let result = controller.transition(order_id, to).await;
            if from.can_transition_to(to) {
                let order = result.unwrap();
                assert_eq!(order.status, to, "transition {from} -> {to}");
            } else {
                let err = result.unwrap_err();
                assert!(
                    matches!(
                        err,
                        StatusError::Repository(RepositoryError::IllegalTransition {
                            from: f,
                            requested: r,
                        }) if f == from && r == to
                    ),
                    "transition {from} -> {to} should be illegal"
                );
                // Rejection left the status untouched.
                let current = store.get(order_id).await.unwrap();
                assert_eq!(current.status, from);
            }
        }
    }
}

#[tokio::test]
async fn test_cancelling_confirmed_order_restores_exact_quantity() {
    // Line {variation 7, qty 3}: cancellation puts exactly 3 back.
    let store = store_with_variation(7, 10, 250).await;
    let service = CheckoutService::new(store.clone(), store.clone());
    let controller = OrderStatusController::new(store.clone(), store.clone());

    let order = service
        .checkout(test_customer(), vec![line(7, 3)])
        .await
        .unwrap();
    controller
        .transition(order.id, OrderStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(store.stock_on_hand(VariationId::new(7)).await.unwrap(), 7);

    controller
        .transition(order.id, OrderStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(store.stock_on_hand(VariationId::new(7)).await.unwrap(), 10);

    // Second cancellation is rejected by the state machine; stock stays put.
    let err = controller
        .transition(order.id, OrderStatus::Cancelled)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StatusError::Repository(RepositoryError::IllegalTransition { .. })
    ));
    assert_eq!(store.stock_on_hand(VariationId::new(7)).await.unwrap(), 10);
}

#[tokio::test]
async fn test_completed_order_rejects_reopening_without_side_effects() {
    let store = store_with_variation(1, 10, 100).await;
    let controller = OrderStatusController::new(store.clone(), store.clone());
    let order_id = order_in_state(&store, OrderStatus::Completed).await;
    let stock_before = store.stock_on_hand(VariationId::new(1)).await.unwrap();

    let err = controller
        .transition(order_id, OrderStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StatusError::Repository(RepositoryError::IllegalTransition {
            from: OrderStatus::Completed,
            requested: OrderStatus::Pending,
        })
    ));

    let current = store.get(order_id).await.unwrap();
    assert_eq!(current.status, OrderStatus::Completed);
    assert_eq!(
        store.stock_on_hand(VariationId::new(1)).await.unwrap(),
        stock_before
    );
}

#[tokio::test]
async fn test_orders_are_never_deleted() {
    // Cancelled orders stay queryable; list_recent sees every order.
    let store = store_with_variation(1, 10, 100).await;
    let service = CheckoutService::new(store.clone(), store.clone());
    let controller = OrderStatusController::new(store.clone(), store.clone());

    let first = service
        .checkout(test_customer(), vec![line(1, 1)])
        .await
        .unwrap();
    let second = service
        .checkout(test_customer(), vec![line(1, 2)])
        .await
        .unwrap();
    controller
        .transition(first.id, OrderStatus::Cancelled)
        .await
        .unwrap();

    let recent = store.list_recent(10).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert!(store.get(first.id).await.is_ok());
    assert!(store.get(second.id).await.is_ok());
}
