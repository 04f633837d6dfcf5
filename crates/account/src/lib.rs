//! Bazaar account client library.
//!
//! The account/authentication slice of the Bazaar storefront as a reusable
//! client: login and registration against the REST backend, a durable local
//! credential mirror used as an offline fallback, a replay-of-one session
//! store that fans the current user out to subscribers, and the route guard
//! that gates navigation on that state.
//!
//! The pieces compose as:
//!
//! ```text
//! caller ──> AccountService ──> { ApiClient, CredentialMirror }
//!                 │
//!                 └──> SessionStore ──fan-out──> RouteGuard, nav bar, home
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod mirror;
pub mod models;
pub mod service;
pub mod session;

pub use api::{ApiClient, ApiError};
pub use config::{AccountConfig, ConfigError};
pub use error::{AccountError, Result};
pub use guard::{GuardDecision, RouteGuard};
pub use mirror::{CredentialMirror, MirrorError};
pub use models::{Address, IdCard, LoginRequest, RegisterForm, StoredCredential, User};
pub use service::{AccountService, LoginOutcome};
pub use session::SessionStore;
