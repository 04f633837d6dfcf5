//! Replay-of-one session state store.
//!
//! Holds the single current-user value and broadcasts it to subscribers.
//! Backed by a `tokio::sync::watch` channel, which gives exactly the
//! replay-buffer-of-one semantics the consumers rely on: a subscriber that
//! attaches after a login still observes the logged-in user immediately.

use std::sync::Arc;

use tokio::sync::watch;

use crate::models::User;

/// The current authenticated-or-absent user, shared across the client.
///
/// Pure state propagation: no validation is performed and the only side
/// effect of a write is notifying subscribers. Updates are atomic
/// single-value replacements, so concurrent readers need no locking.
///
/// The store is an explicitly owned value handed to its consumers (service,
/// guard, presentation), not a process-wide singleton. Cloning the handle is
/// cheap and all clones observe the same state.
#[derive(Debug, Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<Option<User>>>,
}

impl SessionStore {
    /// Create a store with no session. The value stays absent until a token
    /// load, login, or registration succeeds.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Replace the current user and notify all subscribers.
    pub fn set_current_user(&self, user: Option<User>) {
        self.tx.send_replace(user);
    }

    /// Snapshot of the most recent value.
    #[must_use]
    pub fn current(&self) -> Option<User> {
        self.tx.borrow().clone()
    }

    /// Whether a session is currently active.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Subscribe to session changes.
    ///
    /// The receiver immediately holds the last emitted value; await
    /// [`watch::Receiver::changed`] for subsequent updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.tx.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bazaar_core::{AccountType, Email};

    fn user(email: &str) -> User {
        User {
            email: Email::parse(email).unwrap(),
            display_name: "Test".to_owned(),
            token: "jwt".to_owned(),
            account_type: AccountType::Customer,
        }
    }

    #[test]
    fn starts_absent() {
        let store = SessionStore::new();
        assert!(store.current().is_none());
        assert!(!store.is_logged_in());
    }

    #[test]
    fn late_subscriber_sees_last_value() {
        let store = SessionStore::new();
        store.set_current_user(Some(user("a@b.com")));

        // Subscribing after the write still yields the logged-in user.
        let rx = store.subscribe();
        assert_eq!(
            rx.borrow().as_ref().map(|u| u.email.as_str().to_owned()),
            Some("a@b.com".to_owned())
        );
    }

    #[test]
    fn clones_share_state() {
        let store = SessionStore::new();
        let handle = store.clone();
        store.set_current_user(Some(user("a@b.com")));
        assert!(handle.is_logged_in());

        handle.set_current_user(None);
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn subscribers_observe_updates() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();

        store.set_current_user(Some(user("a@b.com")));
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_some());

        store.set_current_user(None);
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_none());
    }

    #[test]
    fn last_completed_write_wins() {
        let store = SessionStore::new();
        store.set_current_user(Some(user("first@b.com")));
        store.set_current_user(Some(user("second@b.com")));
        assert_eq!(
            store.current().map(|u| u.email.as_str().to_owned()),
            Some("second@b.com".to_owned())
        );
    }
}
