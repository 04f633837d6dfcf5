//! Role-aware navigation guard.
//!
//! Evaluated on every navigation attempt against the *live* session store
//! (not a snapshot taken at construction) and the account type recorded in
//! the credential mirror:
//!
//! | session | account type    | target                          | decision            |
//! |---------|-----------------|---------------------------------|---------------------|
//! | absent  | -               | `/orders`, `/checkout*`         | redirect to login   |
//! | absent  | -               | anything else                   | allow               |
//! | present | worker or unset | `/shop`, `/basket`, `/checkout` | redirect to home    |
//! | present | customer        | any                             | allow               |

use bazaar_core::AccountType;

use crate::mirror::CredentialMirror;
use crate::session::SessionStore;

/// Login page the guard redirects to, with the denied URL preserved in the
/// `returnUrl` query parameter.
pub const LOGIN_ROUTE: &str = "/account/login";

/// Routes that require a session.
const PROTECTED_EXACT: &[&str] = &["/orders"];
const PROTECTED_PREFIX: &[&str] = &["/checkout"];

/// Routes denied to workers (and to sessions with no mirrored account type).
const CUSTOMER_ONLY_EXACT: &[&str] = &["/shop", "/basket"];
const CUSTOMER_ONLY_PREFIX: &[&str] = &["/checkout"];

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Navigation may proceed.
    Allow,
    /// No session on a protected route: go log in, then come back.
    RedirectToLogin {
        /// Login URL carrying the original target as `returnUrl`.
        login_url: String,
    },
    /// Session present but the role is not allowed here: go home.
    RedirectHome,
}

impl GuardDecision {
    /// Whether the navigation was allowed.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// The redirect target, if the navigation was denied.
    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::Allow => None,
            Self::RedirectToLogin { login_url } => Some(login_url),
            Self::RedirectHome => Some("/"),
        }
    }
}

/// Navigation guard over a session store and credential mirror.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: SessionStore,
    mirror: CredentialMirror,
}

impl RouteGuard {
    /// Build a guard reading from the given store and mirror.
    #[must_use]
    pub const fn new(session: SessionStore, mirror: CredentialMirror) -> Self {
        Self { session, mirror }
    }

    /// Decide whether navigation to `target` is permitted right now.
    ///
    /// Reads the latest session value and re-reads the mirror on every call,
    /// so a login or logout between two navigations changes the answer.
    #[must_use]
    pub fn check(&self, target: &str) -> GuardDecision {
        if !self.session.is_logged_in() {
            if is_protected(target) {
                return GuardDecision::RedirectToLogin {
                    login_url: format!(
                        "{LOGIN_ROUTE}?returnUrl={}",
                        urlencoding::encode(target)
                    ),
                };
            }
            return GuardDecision::Allow;
        }

        match self.mirror.load_credential().map(|c| c.account_type) {
            Some(AccountType::Customer) => GuardDecision::Allow,
            // Worker, or logged in with no mirrored record to vouch for a
            // customer role: keep them off the shopping surface.
            Some(AccountType::Worker) | None => {
                if is_customer_only(target) {
                    GuardDecision::RedirectHome
                } else {
                    GuardDecision::Allow
                }
            }
        }
    }
}

fn is_protected(target: &str) -> bool {
    PROTECTED_EXACT.contains(&target)
        || PROTECTED_PREFIX.iter().any(|p| target.starts_with(p))
}

fn is_customer_only(target: &str) -> bool {
    CUSTOMER_ONLY_EXACT.contains(&target)
        || CUSTOMER_ONLY_PREFIX.iter().any(|p| target.starts_with(p))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bazaar_core::{Email, PhoneNumber};

    use crate::models::{StoredCredential, User};

    fn mirror_with(account_type: Option<AccountType>) -> (tempfile::TempDir, CredentialMirror) {
        let dir = tempfile::tempdir().unwrap();
        let mirror = CredentialMirror::open(dir.path()).unwrap();
        if let Some(account_type) = account_type {
            let credential = StoredCredential::new(
                Email::parse("a@b.com").unwrap(),
                "abc123",
                "Test".to_owned(),
                PhoneNumber::parse("01234567890").unwrap(),
                account_type,
                None,
            )
            .unwrap();
            mirror.save_credential(&credential).unwrap();
        }
        (dir, mirror)
    }

    fn logged_in(account_type: AccountType) -> SessionStore {
        let store = SessionStore::new();
        store.set_current_user(Some(User {
            email: Email::parse("a@b.com").unwrap(),
            display_name: "Test".to_owned(),
            token: "jwt".to_owned(),
            account_type,
        }));
        store
    }

    #[test]
    fn anonymous_allowed_on_public_routes() {
        let (_dir, mirror) = mirror_with(None);
        let guard = RouteGuard::new(SessionStore::new(), mirror);
        assert!(guard.check("/shop").is_allowed());
        assert!(guard.check("/basket").is_allowed());
        assert!(guard.check("/").is_allowed());
    }

    #[test]
    fn anonymous_denied_on_orders_with_return_url() {
        let (_dir, mirror) = mirror_with(None);
        let guard = RouteGuard::new(SessionStore::new(), mirror);
        let decision = guard.check("/orders");
        assert_eq!(
            decision,
            GuardDecision::RedirectToLogin {
                login_url: "/account/login?returnUrl=%2Forders".to_owned()
            }
        );
    }

    #[test]
    fn anonymous_denied_on_checkout_subroutes() {
        let (_dir, mirror) = mirror_with(None);
        let guard = RouteGuard::new(SessionStore::new(), mirror);
        let decision = guard.check("/checkout/payment");
        assert_eq!(
            decision.redirect_target(),
            Some("/account/login?returnUrl=%2Fcheckout%2Fpayment")
        );
    }

    #[test]
    fn worker_denied_on_shopping_surface() {
        let (_dir, mirror) = mirror_with(Some(AccountType::Worker));
        let guard = RouteGuard::new(logged_in(AccountType::Worker), mirror);
        assert_eq!(guard.check("/shop"), GuardDecision::RedirectHome);
        assert_eq!(guard.check("/basket"), GuardDecision::RedirectHome);
        assert_eq!(guard.check("/checkout"), GuardDecision::RedirectHome);
    }

    #[test]
    fn worker_allowed_elsewhere() {
        let (_dir, mirror) = mirror_with(Some(AccountType::Worker));
        let guard = RouteGuard::new(logged_in(AccountType::Worker), mirror);
        assert!(guard.check("/orders").is_allowed());
        assert!(guard.check("/").is_allowed());
    }

    #[test]
    fn unset_account_type_is_treated_like_worker() {
        let (_dir, mirror) = mirror_with(None);
        let guard = RouteGuard::new(logged_in(AccountType::Customer), mirror);
        assert_eq!(guard.check("/shop"), GuardDecision::RedirectHome);
    }

    #[test]
    fn customer_allowed_everywhere() {
        let (_dir, mirror) = mirror_with(Some(AccountType::Customer));
        let guard = RouteGuard::new(logged_in(AccountType::Customer), mirror);
        assert!(guard.check("/shop").is_allowed());
        assert!(guard.check("/orders").is_allowed());
        assert!(guard.check("/checkout/payment").is_allowed());
    }

    #[test]
    fn rechecks_live_session_state() {
        let store = SessionStore::new();
        let (_dir, mirror) = mirror_with(Some(AccountType::Customer));
        let guard = RouteGuard::new(store.clone(), mirror);

        assert!(!guard.check("/orders").is_allowed());

        store.set_current_user(Some(User {
            email: Email::parse("a@b.com").unwrap(),
            display_name: "Test".to_owned(),
            token: "jwt".to_owned(),
            account_type: AccountType::Customer,
        }));
        assert!(guard.check("/orders").is_allowed());

        store.set_current_user(None);
        assert!(!guard.check("/orders").is_allowed());
    }
}
