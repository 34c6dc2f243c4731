//! Error types for the order core.
//!
//! The taxonomy distinguishes business-expected outcomes (insufficient
//! stock, illegal transitions) from integrity failures (rows that should
//! exist but do not) and transient storage faults. Business outcomes are
//! returned as typed results and logged at info level at most; integrity
//! failures are logged at error level where they are detected.

use cardhaus_core::{OrderId, OrderStatus, VariationId};
use thiserror::Error;

/// Errors from the inventory ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Requested quantity exceeds available stock. A normal business
    /// outcome, not a system fault.
    #[error(
        "insufficient stock for variation {variation_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        /// Variation that could not satisfy the request.
        variation_id: VariationId,
        /// Quantity requested.
        requested: i32,
        /// Quantity actually available.
        available: i32,
    },

    /// The variation row does not exist. A referential inconsistency:
    /// carts only reference catalog variations, so the id vanishing
    /// indicates upstream data corruption.
    #[error("variation {0} not found")]
    VariationNotFound(VariationId),

    /// Quantity must be at least 1.
    #[error("invalid quantity {quantity} for variation {variation_id}")]
    InvalidQuantity {
        /// Variation the quantity was requested for.
        variation_id: VariationId,
        /// The rejected quantity.
        quantity: i32,
    },

    /// Underlying storage failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Errors from the order repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No order with the given id.
    #[error("order {0} not found")]
    NotFound(OrderId),

    /// The requested status change is not in the legal transition table.
    #[error("illegal transition from {from} to {requested}")]
    IllegalTransition {
        /// Status the order currently holds.
        from: OrderStatus,
        /// Status that was requested.
        requested: OrderStatus,
    },

    /// A stored value could not be mapped back into a domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Underlying storage failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Errors from the checkout orchestrator.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart contained no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line had a non-positive quantity.
    #[error("invalid quantity {quantity} for variation {variation_id}")]
    InvalidQuantity {
        /// Variation on the offending cart line.
        variation_id: VariationId,
        /// The rejected quantity.
        quantity: i32,
    },

    /// A cart line could not be fully reserved. Names the failing line so
    /// the storefront can prompt the customer to adjust quantity rather
    /// than retry blindly.
    #[error(
        "insufficient stock for variation {variation_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        /// Variation that could not satisfy the request.
        variation_id: VariationId,
        /// Quantity requested across the cart.
        requested: i32,
        /// Quantity actually available.
        available: i32,
    },

    /// A cart line referenced a variation that does not exist.
    #[error("variation {0} not found")]
    VariationNotFound(VariationId),

    /// Storage failed while reserving stock or persisting the order. All
    /// reservations made by this attempt were rolled back before this was
    /// returned.
    #[error("order could not be persisted")]
    PersistenceFailed(#[from] RepositoryError),
}

impl From<LedgerError> for CheckoutError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientStock {
                variation_id,
                requested,
                available,
            } => Self::InsufficientStock {
                variation_id,
                requested,
                available,
            },
            LedgerError::VariationNotFound(id) => Self::VariationNotFound(id),
            LedgerError::InvalidQuantity {
                variation_id,
                quantity,
            } => Self::InvalidQuantity {
                variation_id,
                quantity,
            },
            LedgerError::Database(e) => Self::PersistenceFailed(RepositoryError::Database(e)),
        }
    }
}

/// Errors from the order status controller.
#[derive(Debug, Error)]
pub enum StatusError {
    /// The transition itself was rejected or storage failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The cancellation committed but restoring reserved stock failed.
    /// A fatal inconsistency: the order is cancelled while some stock is
    /// still decremented, and must be reconciled manually.
    #[error("order {order_id} cancelled but stock restoration failed for variation {variation_id}")]
    RestoreFailed {
        /// Order whose cancellation committed.
        order_id: OrderId,
        /// First variation whose restoration failed.
        variation_id: VariationId,
        /// Ledger failure that interrupted restoration.
        #[source]
        source: LedgerError,
    },
}
