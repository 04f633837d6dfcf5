//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BAZAAR_API_BASE_URL` - Base URL of the REST backend
//!   (e.g., `https://api.bazaarstore.dev/api/`)
//!
//! ## Optional
//! - `BAZAAR_DATA_DIR` - Directory for the local credential mirror
//!   (default: `./.bazaar`)
//! - `BAZAAR_USER_AGENT` - User-Agent header for outgoing requests

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default directory for the credential mirror, relative to the working
/// directory.
const DEFAULT_DATA_DIR: &str = ".bazaar";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Account client configuration.
#[derive(Debug, Clone)]
pub struct AccountConfig {
    /// Base URL of the REST backend. Always ends with a trailing slash so
    /// endpoint paths can be joined onto it.
    pub api_base_url: Url,
    /// Directory holding the credential mirror files.
    pub data_dir: PathBuf,
    /// User-Agent header for outgoing requests.
    pub user_agent: String,
}

impl AccountConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `BAZAAR_API_BASE_URL` is missing, is not a
    /// valid http(s) URL, or any other variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let raw_base_url = get_required_env("BAZAAR_API_BASE_URL")?;
        let api_base_url = parse_base_url("BAZAAR_API_BASE_URL", &raw_base_url)?;
        let data_dir =
            PathBuf::from(get_env_or_default("BAZAAR_DATA_DIR", DEFAULT_DATA_DIR));
        let user_agent = get_env_or_default("BAZAAR_USER_AGENT", default_user_agent());

        Ok(Self {
            api_base_url,
            data_dir,
            user_agent,
        })
    }

    /// Build a configuration directly, normalizing the base URL.
    ///
    /// Primarily for tests and embedders that do not use the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not a valid http(s) URL.
    pub fn new(base_url: &str, data_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: parse_base_url("base_url", base_url)?,
            data_dir: data_dir.into(),
            user_agent: default_user_agent().to_owned(),
        })
    }
}

/// Default User-Agent, derived from the crate version.
const fn default_user_agent() -> &'static str {
    concat!("bazaar-account/", env!("CARGO_PKG_VERSION"))
}

/// Parse and normalize a base URL: http(s) scheme only, trailing slash
/// enforced so `Url::join` appends instead of replacing the last segment.
fn parse_base_url(name: &str, value: &str) -> Result<Url, ConfigError> {
    let normalized = if value.ends_with('/') {
        value.to_owned()
    } else {
        format!("{value}/")
    };

    let url = Url::parse(&normalized)
        .map_err(|e| ConfigError::InvalidEnvVar(name.to_owned(), e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigError::InvalidEnvVar(
            name.to_owned(),
            format!("unsupported scheme {scheme}"),
        )),
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
