//! The locally mirrored credential record.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bazaar_core::{AccountType, Email, PhoneNumber};

use crate::models::user::User;

/// Token synthesized when a mirrored credential carries none, i.e. the
/// registration that produced it never reached the backend.
pub const OFFLINE_TOKEN: &str = "offline-session";

/// Password hashing failed.
#[derive(Debug, thiserror::Error)]
#[error("password hashing failed")]
pub struct PasswordHashError;

/// The single locally persisted registration record.
///
/// Written on every registration (even when the backend rejects or is
/// unreachable), read back during login attempts and duplicate checks. The
/// mirror keeps at most one record; a new registration overwrites it.
///
/// The password is stored as an argon2id hash. Login-time comparison
/// verifies the submitted password against the hash; the plaintext is
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCredential {
    pub email: Email,
    pub password_hash: String,
    pub display_name: String,
    pub phone_number: PhoneNumber,
    pub account_type: AccountType,
    /// Bearer token from the remote registration, absent when the remote
    /// call failed.
    pub token: Option<String>,
    /// When this record was written.
    pub saved_at: DateTime<Utc>,
}

impl StoredCredential {
    /// Build a record from submitted registration values, hashing the
    /// password for storage.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError`] if argon2 fails to produce a hash.
    pub fn new(
        email: Email,
        password: &str,
        display_name: String,
        phone_number: PhoneNumber,
        account_type: AccountType,
        token: Option<String>,
    ) -> Result<Self, PasswordHashError> {
        Ok(Self {
            email,
            password_hash: hash_password(password)?,
            display_name,
            phone_number,
            account_type,
            token,
            saved_at: Utc::now(),
        })
    }

    /// Whether submitted login values match this record.
    ///
    /// Email comparison is byte-exact, the password is verified against the
    /// stored hash, and the account type must agree (the enum comparison is
    /// inherently case-insensitive; case folding happened at parse time).
    #[must_use]
    pub fn matches(&self, email: &Email, password: &str, account_type: AccountType) -> bool {
        self.email == *email
            && self.account_type == account_type
            && verify_password(password, &self.password_hash)
    }

    /// Synthesize a session [`User`] from this record, substituting
    /// [`OFFLINE_TOKEN`] when no token was stored.
    #[must_use]
    pub fn to_user(&self) -> User {
        User {
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            token: self
                .token
                .clone()
                .unwrap_or_else(|| OFFLINE_TOKEN.to_owned()),
            account_type: self.account_type,
        }
    }
}

/// Hash a password with argon2id and a fresh random salt.
fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordHashError)
}

/// Verify a password against a stored hash. An unparseable hash verifies
/// as false rather than erroring; the record then simply never matches.
fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}
