//! REST client for the account endpoints.
//!
//! Stateless beyond the shared HTTP client and base URL; bearer tokens are
//! passed per call. Endpoint selection for login/register is driven by the
//! account type (`accounts/login/{customer|worker}` and friends).
//!
//! Unlike the rest of the client, this layer does *not* swallow failures:
//! every operation returns a distinguishable [`ApiError`] so callers can
//! tell "backend said no" from "backend unreachable". The fail-open policy
//! (errors logged and converted to an absent user / `false` probe) lives in
//! [`AccountService`](crate::service::AccountService).

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use secrecy::ExposeSecret;
use serde::Serialize;
use url::Url;

use bazaar_core::{AccountType, Email, PhoneNumber};

use crate::config::AccountConfig;
use crate::models::{Address, RegisterForm, User};

/// Errors from the REST boundary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Connection, timeout, or body-decode failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{status} from {endpoint}: {body}")]
    Status {
        status: StatusCode,
        endpoint: String,
        body: String,
    },

    /// An endpoint path could not be joined onto the base URL.
    #[error("invalid endpoint path: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Wire form of the login request body.
#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

/// Client for the Bazaar account REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

#[derive(Debug)]
struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: &AccountConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_base_url.clone(),
            }),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Fetch the current user for a bearer token (`GET account`).
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn current_user(&self, token: &str) -> Result<User, ApiError> {
        let url = self.endpoint("account")?;
        let response = self.inner.http.get(url).bearer_auth(token).send().await?;
        let user = check_status(response).await?.json::<User>().await?;
        Ok(user)
    }

    /// Log in against the endpoint for the given account type.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or when the backend rejects
    /// the credentials (non-2xx).
    pub async fn login(
        &self,
        email: &Email,
        password: &str,
        account_type: AccountType,
    ) -> Result<User, ApiError> {
        let url = self.endpoint(&format!("accounts/login/{account_type}"))?;
        let body = LoginBody {
            email: email.as_str(),
            password,
        };

        let response = self.inner.http.post(url).json(&body).send().await?;
        let user = check_status(response).await?.json::<User>().await?;
        Ok(user)
    }

    /// Register against the endpoint for the form's account type.
    ///
    /// The submission is multipart: text fields for every form value plus an
    /// optional id-card file part, attached only for worker registrations.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or a rejected registration.
    pub async fn register(&self, form: &RegisterForm) -> Result<User, ApiError> {
        let url = self.endpoint(&format!("accounts/register/{}", form.account_type))?;

        let mut multipart = Form::new()
            .text("displayName", form.display_name.clone())
            .text("email", form.email.as_str().to_owned())
            .text("phoneNumber", form.phone_number.as_str().to_owned())
            .text("password", form.password.expose_secret().to_owned())
            .text("accountType", form.account_type.as_str());

        if form.account_type == AccountType::Worker
            && let Some(id_card) = &form.id_card
        {
            let part = Part::bytes(id_card.bytes.clone()).file_name(id_card.file_name.clone());
            multipart = multipart.part("idCardPhoto", part);
        }

        let response = self.inner.http.post(url).multipart(multipart).send().await?;
        let user = check_status(response).await?.json::<User>().await?;
        Ok(user)
    }

    /// Probe whether an email address is already registered.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or non-2xx status.
    pub async fn email_exists(&self, email: &Email) -> Result<bool, ApiError> {
        let url = self.endpoint("accounts/emailexists")?;
        let response = self
            .inner
            .http
            .get(url)
            .query(&[("email", email.as_str())])
            .send()
            .await?;
        let taken = check_status(response).await?.json::<bool>().await?;
        Ok(taken)
    }

    /// Probe whether a phone number is already registered.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or non-2xx status.
    pub async fn phone_number_exists(&self, phone: &PhoneNumber) -> Result<bool, ApiError> {
        let url = self.endpoint("accounts/phonenumberexists")?;
        let response = self
            .inner
            .http
            .get(url)
            .query(&[("phoneNumber", phone.as_str())])
            .send()
            .await?;
        let taken = check_status(response).await?.json::<bool>().await?;
        Ok(taken)
    }

    /// Fetch the user's address (`GET accounts/address`).
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn user_address(&self, token: &str) -> Result<Address, ApiError> {
        let url = self.endpoint("accounts/address")?;
        let response = self.inner.http.get(url).bearer_auth(token).send().await?;
        let address = check_status(response).await?.json::<Address>().await?;
        Ok(address)
    }

    /// Update the user's address (`PUT accounts/address`).
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or non-2xx status.
    pub async fn update_user_address(
        &self,
        token: &str,
        address: &Address,
    ) -> Result<Address, ApiError> {
        let url = self.endpoint("accounts/address")?;
        let response = self
            .inner
            .http
            .put(url)
            .bearer_auth(token)
            .json(address)
            .send()
            .await?;
        let updated = check_status(response).await?.json::<Address>().await?;
        Ok(updated)
    }
}

/// Convert a non-success response into `ApiError::Status`, keeping the body
/// text for the log line.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let endpoint = response.url().path().to_owned();
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status,
        endpoint,
        body,
    })
}
