//! Customer details attached to an order.

use serde::{Deserialize, Serialize};

use crate::types::email::Email;

/// Customer contact and shipping details captured at checkout.
///
/// The order core treats this as an opaque record: it is validated and
/// persisted with the order but never interpreted. Address formatting,
/// localization, and the like belong to the storefront layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    /// Customer's full name.
    pub name: String,
    /// Contact email address.
    pub email: Email,
    /// Free-form shipping address.
    pub shipping_address: String,
    /// Optional customer notes (e.g. "leave at side door").
    pub notes: Option<String>,
}

impl CustomerDetails {
    /// Create customer details without notes.
    #[must_use]
    pub const fn new(name: String, email: Email, shipping_address: String) -> Self {
        Self {
            name,
            email,
            shipping_address,
            notes: None,
        }
    }
}
