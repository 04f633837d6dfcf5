//! Shipping address.

use serde::{Deserialize, Serialize};

/// A user's shipping address, exchanged verbatim with the
/// `accounts/address` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
}
