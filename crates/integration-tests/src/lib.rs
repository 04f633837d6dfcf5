//! End-to-end scenario tests for the Bazaar account client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```
//!
//! Every scenario runs against a fresh [`wiremock::MockServer`] standing in
//! for the REST backend and a throwaway data directory for the credential
//! mirror, so the suite needs no external services.
//!
//! # Test Categories
//!
//! - `account_flow` - register, login, session restore, logout
//! - `guard_navigation` - route guard decisions as session state changes
//! - `offline_resilience` - behavior with an unreachable backend

#![cfg_attr(not(test), forbid(unsafe_code))]

use secrecy::SecretString;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::MockServer;

use bazaar_account::{AccountConfig, AccountService, LoginRequest, RegisterForm, SessionStore};
use bazaar_core::{AccountType, Email, PhoneNumber};

/// A mock backend plus a service wired to it over a throwaway data directory.
///
/// The [`TempDir`] is held so the mirror files live until the scenario ends.
pub struct TestContext {
    pub server: MockServer,
    pub data_dir: TempDir,
    pub service: AccountService,
}

impl TestContext {
    /// Start a mock backend and build a service against it.
    ///
    /// # Panics
    ///
    /// Panics if the temp directory or the service cannot be created.
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let data_dir = tempfile::tempdir().expect("failed to create temp data dir");
        let config = AccountConfig::new(&server.uri(), data_dir.path())
            .expect("failed to build test config");
        let service =
            AccountService::new(&config, SessionStore::new()).expect("failed to build service");
        Self {
            server,
            data_dir,
            service,
        }
    }

    /// A second service over the same backend and data directory, with a
    /// fresh session store. Simulates a process restart: the mirror files
    /// survive, the in-memory session does not.
    ///
    /// # Panics
    ///
    /// Panics if the service cannot be created.
    #[must_use]
    pub fn restart(&self) -> AccountService {
        let config = AccountConfig::new(&self.server.uri(), self.data_dir.path())
            .expect("failed to build test config");
        AccountService::new(&config, SessionStore::new()).expect("failed to build service")
    }
}

/// A backend user payload with the given token.
#[must_use]
pub fn customer_body(token: &str) -> Value {
    json!({
        "email": "amira@example.com",
        "displayName": "Amira",
        "token": token,
        "accountType": "customer"
    })
}

/// A backend worker payload with the given token.
#[must_use]
pub fn worker_body(token: &str) -> Value {
    json!({
        "email": "omar@example.com",
        "displayName": "Omar",
        "token": token,
        "accountType": "worker"
    })
}

/// A login request for the standing test customer.
///
/// # Panics
///
/// Panics if the fixture email is rejected.
#[must_use]
pub fn customer_login(password: &str) -> LoginRequest {
    LoginRequest {
        email: Email::parse("amira@example.com").expect("fixture email"),
        password: SecretString::from(password),
        account_type: AccountType::Customer,
    }
}

/// A registration form for the given account type.
///
/// # Panics
///
/// Panics if a fixture value is rejected.
#[must_use]
pub fn register_form(account_type: AccountType) -> RegisterForm {
    let (name, email, phone) = match account_type {
        AccountType::Customer => ("Amira", "amira@example.com", "01234567890"),
        AccountType::Worker => ("Omar", "omar@example.com", "01987654321"),
    };
    RegisterForm {
        display_name: name.to_owned(),
        email: Email::parse(email).expect("fixture email"),
        phone_number: PhoneNumber::parse(phone).expect("fixture phone"),
        password: SecretString::from("abc123"),
        account_type,
        id_card: None,
    }
}
