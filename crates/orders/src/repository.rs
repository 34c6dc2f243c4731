//! Order repository: durable storage of orders and their lines.

use async_trait::async_trait;

use cardhaus_core::{CustomerDetails, OrderId, OrderStatus};

use crate::error::RepositoryError;
use crate::models::{NewOrderLine, Order};

/// Durable storage of orders, enforcing the status state machine on every
/// mutation regardless of who requests it.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a new order (status `pending`) and its lines in one
    /// transaction, computing `total` from the lines.
    ///
    /// Must only be called after every relevant reservation has succeeded;
    /// if persistence fails the caller owns the compensating stock
    /// restoration.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Database`] on storage failure.
    async fn create(
        &self,
        customer: CustomerDetails,
        lines: Vec<NewOrderLine>,
    ) -> Result<Order, RepositoryError>;

    /// Fetch an order with its lines.
    ///
    /// # Errors
    ///
    /// - [`RepositoryError::NotFound`] if no such order exists.
    /// - [`RepositoryError::Database`] on storage failure.
    async fn get(&self, order_id: OrderId) -> Result<Order, RepositoryError>;

    /// Apply a status transition as an atomic read-modify-write.
    ///
    /// The current status is read under a row lock, validated against
    /// [`OrderStatus::can_transition_to`], and updated in the same
    /// transaction, so two concurrent transitions cannot both succeed from
    /// an already-consumed state: the loser observes `IllegalTransition`.
    ///
    /// # Errors
    ///
    /// - [`RepositoryError::NotFound`] if no such order exists.
    /// - [`RepositoryError::IllegalTransition`] if the pair is not in the
    ///   legal transition table; no change is made.
    /// - [`RepositoryError::Database`] on storage failure.
    async fn transition(
        &self,
        order_id: OrderId,
        new_status: OrderStatus,
    ) -> Result<Order, RepositoryError>;

    /// Most recently created orders, newest first. Admin listing.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Database`] on storage failure.
    async fn list_recent(&self, limit: i64) -> Result<Vec<Order>, RepositoryError>;
}
