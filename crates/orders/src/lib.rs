//! Cardhaus Orders - inventory reservation and order lifecycle.
//!
//! Given a customer's cart this subsystem atomically verifies and decrements
//! per-variation stock, persists an order with its line items, and later
//! reverses (cancellation restores stock) or advances (confirmed →
//! completed) that decision under the legal transition table - while
//! tolerating concurrent checkouts against the same inventory rows.
//!
//! # Architecture
//!
//! Storage sits behind two traits, [`ledger::InventoryLedger`] and
//! [`repository::OrderRepository`], with Postgres backends in [`pg`] and an
//! in-memory backend in [`memory`] for tests. The two entry points are:
//!
//! - [`checkout::CheckoutService`] - cart in, pending order (or clean
//!   rejection) out; the HTTP layer calls this and translates the typed
//!   errors into status codes.
//! - [`status::OrderStatusController`] - admin-initiated transitions; the
//!   admin layer authorizes the caller before invoking it.
//!
//! The `stock_quantity >= 0` invariant holds because stock is mutated only
//! through the ledger's atomic check-and-decrement, never by a read
//! followed by a write.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod config;
pub mod db;
pub mod error;
pub mod ledger;
pub mod memory;
pub mod models;
pub mod pg;
pub mod repository;
pub mod status;

pub use checkout::CheckoutService;
pub use error::{CheckoutError, LedgerError, RepositoryError, StatusError};
pub use ledger::InventoryLedger;
pub use models::{CartLine, NewOrderLine, Order, OrderLine};
pub use repository::OrderRepository;
pub use status::OrderStatusController;
