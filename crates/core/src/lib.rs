//! Cardhaus Core - Shared domain types.
//!
//! This crate provides the common types used across all Cardhaus components:
//! - `orders` - Inventory reservation and order lifecycle subsystem
//! - `cli` - Command-line tools for migrations and stock management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. The order status state machine lives here so that "which
//! transitions are legal" is a property of the type itself, not of whichever
//! caller happens to mutate an order.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, email addresses, customer details, and the
//!   order status state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
