//! Unified error handling for the account client.
//!
//! Each boundary has its own `thiserror` enum ([`ConfigError`],
//! [`ApiError`], [`MirrorError`]); `AccountError` unifies them for callers
//! of the [`AccountService`](crate::service::AccountService).
//!
//! Remote-call failures on the login/register/load paths never reach this
//! type: the service logs them and fails open to an absent user, so the only
//! errors surfaced there are user-facing validation problems.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::mirror::MirrorError;
use crate::models::PasswordHashError;

/// Account-client error type.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A remote call failed on a path that propagates errors
    /// (the address endpoints).
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The credential mirror could not be read or written.
    #[error("Mirror error: {0}")]
    Mirror(#[from] MirrorError),

    /// Password hashing failed while building a mirror record.
    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordHashError),

    /// Submitted form values failed validation. Non-fatal; shown inline.
    #[error("{0}")]
    Validation(String),

    /// Login failed: no local match and the backend did not return a user.
    #[error("invalid email, password, or account type")]
    InvalidCredentials,

    /// An operation that needs a session was called without one.
    #[error("not logged in")]
    NotAuthenticated,
}

/// Result type alias for `AccountError`.
pub type Result<T> = std::result::Result<T, AccountError>;
