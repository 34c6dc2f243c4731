//! Core types for Cardhaus.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod customer;
pub mod email;
pub mod id;
pub mod status;

pub use customer::CustomerDetails;
pub use email::{Email, EmailError};
pub use id::*;
pub use status::*;
