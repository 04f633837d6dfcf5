//! Account type discriminator.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown account type.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown account type {input:?} (expected \"customer\" or \"worker\")")]
pub struct AccountTypeError {
    /// The rejected input.
    pub input: String,
}

/// Discriminator between customer and worker accounts.
///
/// Drives both endpoint selection (`accounts/login/{customer|worker}`) and
/// route access in the guard: workers are kept out of the shopping surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// A shopper. Full access to the storefront.
    Customer,
    /// A service worker. Blocked from `/shop`, `/basket`, and `/checkout`.
    Worker,
}

impl AccountType {
    /// The lowercase wire form, as used in endpoint paths and form fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Worker => "worker",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountType {
    type Err = AccountTypeError;

    /// Case-insensitive, matching how the login flow compares account types.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("customer") {
            Ok(Self::Customer)
        } else if s.eq_ignore_ascii_case("worker") {
            Ok(Self::Worker)
        } else {
            Err(AccountTypeError {
                input: s.to_owned(),
            })
        }
    }
}
