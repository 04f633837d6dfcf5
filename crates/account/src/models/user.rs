//! The authenticated user.

use serde::{Deserialize, Serialize};

use bazaar_core::{AccountType, Email};

/// The current authenticated user, as returned by login, registration, and
/// the bearer-authenticated account endpoint.
///
/// Owned exclusively by the [`SessionStore`](crate::session::SessionStore):
/// created on a successful login/register response (remote or mirror) and
/// replaced with absent on logout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The user's email address.
    pub email: Email,
    /// Display name shown in the nav bar.
    pub display_name: String,
    /// Bearer token for authenticated requests.
    pub token: String,
    /// Customer or worker role.
    pub account_type: AccountType,
}
