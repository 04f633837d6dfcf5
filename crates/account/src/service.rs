//! Session lifecycle controller.
//!
//! Orchestrates login, registration, token loading, and logout: consults the
//! credential mirror first, falls back to the REST backend, and publishes
//! the outcome through the session store.
//!
//! Remote failures on these paths are a fact of life for this client (it is
//! expected to work against an unreachable backend), so they are logged and
//! converted into an absent user or a `false` probe result instead of being
//! propagated. Only the address pass-throughs surface API errors.

use secrecy::ExposeSecret;
use tracing::{debug, warn};

use bazaar_core::{AccountType, Email, PhoneNumber};

use crate::api::ApiClient;
use crate::config::AccountConfig;
use crate::error::{AccountError, Result};
use crate::guard::RouteGuard;
use crate::mirror::CredentialMirror;
use crate::models::{Address, LoginRequest, RegisterForm, StoredCredential, User};
use crate::session::SessionStore;

/// Landing route after login (when no return URL was requested) and after
/// registration.
pub const DEFAULT_LANDING: &str = "/shop";

/// Navigation target after logout.
pub const SITE_ROOT: &str = "/";

/// Minimum letters required in a password.
const MIN_PASSWORD_LETTERS: usize = 3;

/// Minimum digits required in a password.
const MIN_PASSWORD_DIGITS: usize = 2;

/// A successful login or registration: the activated user plus where the
/// caller should navigate next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user: User,
    pub redirect: String,
}

/// The session lifecycle controller.
///
/// Owns the API client and mirror, and holds a handle to the session store
/// it publishes into. The store handle is injected so presentation
/// collaborators and the [`RouteGuard`] can share it.
#[derive(Debug, Clone)]
pub struct AccountService {
    api: ApiClient,
    mirror: CredentialMirror,
    session: SessionStore,
}

impl AccountService {
    /// Build a service from configuration, publishing into `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed or the
    /// mirror directory cannot be created.
    pub fn new(config: &AccountConfig, session: SessionStore) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(config)?,
            mirror: CredentialMirror::open(&config.data_dir)?,
            session,
        })
    }

    /// The session store this service publishes into.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// A route guard over this service's session store and mirror.
    #[must_use]
    pub fn route_guard(&self) -> RouteGuard {
        RouteGuard::new(self.session.clone(), self.mirror.clone())
    }

    /// Account type recorded in the mirror, if any. Read by the nav bar and
    /// home views whenever the session changes.
    #[must_use]
    pub fn mirrored_account_type(&self) -> Option<AccountType> {
        self.mirror.load_credential().map(|c| c.account_type)
    }

    /// Log in.
    ///
    /// Mirror first: if the submitted values match the stored record, a user
    /// is synthesized from it and the session activated without any network
    /// traffic. Otherwise the backend decides; a remote failure of any kind
    /// is logged and reported as [`AccountError::InvalidCredentials`].
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`] when neither the mirror
    /// nor the backend accepts the credentials, or `AccountError::Mirror`
    /// if persisting the returned token fails.
    pub async fn login(
        &self,
        request: &LoginRequest,
        return_url: Option<&str>,
    ) -> Result<LoginOutcome> {
        let redirect = return_url.unwrap_or(DEFAULT_LANDING).to_owned();

        if let Some(stored) = self.mirror.load_credential()
            && stored.matches(
                &request.email,
                request.password.expose_secret(),
                request.account_type,
            )
        {
            debug!(email = %request.email, "login matched the local credential mirror");
            let user = stored.to_user();
            self.session.set_current_user(Some(user.clone()));
            return Ok(LoginOutcome { user, redirect });
        }

        match self
            .api
            .login(
                &request.email,
                request.password.expose_secret(),
                request.account_type,
            )
            .await
        {
            Ok(user) => {
                self.mirror.save_token(&user.token)?;
                self.session.set_current_user(Some(user.clone()));
                Ok(LoginOutcome { user, redirect })
            }
            Err(error) => {
                warn!(%error, email = %request.email, "remote login failed");
                Err(AccountError::InvalidCredentials)
            }
        }
    }

    /// Register a new account.
    ///
    /// The backend is asked first, but local bookkeeping always proceeds: a
    /// [`StoredCredential`] snapshot of the submitted values is persisted
    /// whatever the remote outcome (with the remote token when there is
    /// one), and the session is activated from that snapshot. This is the
    /// deliberate offline-friendly fallback - a registration "succeeds"
    /// locally even when the backend is unreachable.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Validation` if the password is too weak,
    /// `AccountError::PasswordHash` or `AccountError::Mirror` if the
    /// snapshot cannot be built or persisted.
    pub async fn register(&self, form: &RegisterForm) -> Result<LoginOutcome> {
        validate_password_strength(form.password.expose_secret())?;

        let token = match self.api.register(form).await {
            Ok(user) => {
                self.mirror.save_token(&user.token)?;
                Some(user.token)
            }
            Err(error) => {
                warn!(%error, email = %form.email, "remote registration failed; keeping local snapshot");
                None
            }
        };

        let credential = StoredCredential::new(
            form.email.clone(),
            form.password.expose_secret(),
            form.display_name.clone(),
            form.phone_number.clone(),
            form.account_type,
            token,
        )?;
        self.mirror.save_credential(&credential)?;

        let user = credential.to_user();
        self.session.set_current_user(Some(user.clone()));
        Ok(LoginOutcome {
            user,
            redirect: DEFAULT_LANDING.to_owned(),
        })
    }

    /// Restore the session from the persisted token, if any.
    ///
    /// With no token this is a no-op that leaves the session absent, without
    /// a network call. Otherwise the account endpoint is asked; on success
    /// the (possibly refreshed) token is re-persisted and the session set.
    /// Any failure is logged and fails open to logged-out.
    pub async fn load_current_user(&self) -> Option<User> {
        let token = self.mirror.load_token()?;

        match self.api.current_user(&token).await {
            Ok(user) => {
                if let Err(error) = self.mirror.save_token(&user.token) {
                    warn!(%error, "failed to persist refreshed token");
                }
                self.session.set_current_user(Some(user.clone()));
                Some(user)
            }
            Err(error) => {
                warn!(%error, "failed to load current user; staying logged out");
                self.session.set_current_user(None);
                None
            }
        }
    }

    /// Log out: clear the persisted token, clear the session, and hand back
    /// the navigation target.
    ///
    /// The mirrored credential record deliberately survives logout; it is
    /// what makes the next offline login possible.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Mirror` if the token file cannot be removed.
    pub fn logout(&self) -> Result<&'static str> {
        self.mirror.clear_token()?;
        self.session.set_current_user(None);
        debug!("session cleared");
        Ok(SITE_ROOT)
    }

    /// Whether an email address is already taken.
    ///
    /// Remote probe OR local mirror match. A failed probe falls back to the
    /// local answer alone, so an unreachable backend reads as "not taken"
    /// unless the mirror says otherwise.
    pub async fn email_taken(&self, email: &Email) -> bool {
        let local = self
            .mirror
            .load_credential()
            .is_some_and(|c| c.email == *email);

        match self.api.email_exists(email).await {
            Ok(remote) => remote || local,
            Err(error) => {
                warn!(%error, "email existence probe failed; using local mirror");
                local
            }
        }
    }

    /// Whether a phone number is already taken. Same OR-with-fallback
    /// semantics as [`email_taken`](Self::email_taken).
    pub async fn phone_taken(&self, phone: &PhoneNumber) -> bool {
        let local = self
            .mirror
            .load_credential()
            .is_some_and(|c| c.phone_number == *phone);

        match self.api.phone_number_exists(phone).await {
            Ok(remote) => remote || local,
            Err(error) => {
                warn!(%error, "phone existence probe failed; using local mirror");
                local
            }
        }
    }

    /// Fetch the logged-in user's address.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::NotAuthenticated`] without a session, or the
    /// underlying `AccountError::Api` - this path propagates remote errors.
    pub async fn user_address(&self) -> Result<Address> {
        let token = self.session_token()?;
        Ok(self.api.user_address(&token).await?)
    }

    /// Update the logged-in user's address.
    ///
    /// # Errors
    ///
    /// Same as [`user_address`](Self::user_address).
    pub async fn update_user_address(&self, address: &Address) -> Result<Address> {
        let token = self.session_token()?;
        Ok(self.api.update_user_address(&token, address).await?)
    }

    fn session_token(&self) -> Result<String> {
        self.session
            .current()
            .map(|user| user.token)
            .ok_or(AccountError::NotAuthenticated)
    }
}

/// Registration password rule carried over from the register form: at least
/// three letters and two digits.
fn validate_password_strength(password: &str) -> Result<()> {
    let letters = password.chars().filter(char::is_ascii_alphabetic).count();
    let digits = password.chars().filter(char::is_ascii_digit).count();

    if letters >= MIN_PASSWORD_LETTERS && digits >= MIN_PASSWORD_DIGITS {
        Ok(())
    } else {
        Err(AccountError::Validation(format!(
            "password must contain at least {MIN_PASSWORD_LETTERS} letters and {MIN_PASSWORD_DIGITS} digits"
        )))
    }
}
