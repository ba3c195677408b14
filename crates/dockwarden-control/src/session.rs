//! In-process session registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use dockwarden_common::types::UserId;

/// Opaque bearer token identifying a logged-in session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generates a fresh random token.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Wraps a token presented by a client.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maps live session tokens to user ids.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionToken, UserId>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session for `user_id`.
    #[must_use]
    pub fn issue(&self, user_id: UserId) -> SessionToken {
        let token = SessionToken::generate();
        let _ = self.lock().insert(token.clone(), user_id);
        token
    }

    /// Returns the user behind `token`, if the session is live.
    #[must_use]
    pub fn resolve(&self, token: &SessionToken) -> Option<UserId> {
        self.lock().get(token).copied()
    }

    /// Ends a session. Returns whether it existed.
    pub fn revoke(&self, token: &SessionToken) -> bool {
        self.lock().remove(token).is_some()
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns whether no session is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionToken, UserId>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_resolves_until_revoked() {
        let registry = SessionRegistry::new();
        let token = registry.issue(UserId::new(3));
        assert_eq!(registry.resolve(&token), Some(UserId::new(3)));
        assert!(registry.revoke(&token));
        assert_eq!(registry.resolve(&token), None);
        assert!(!registry.revoke(&token));
    }

    #[test]
    fn tokens_are_unique() {
        let registry = SessionRegistry::new();
        let a = registry.issue(UserId::new(1));
        let b = registry.issue(UserId::new(1));
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn unknown_token_does_not_resolve() {
        let registry = SessionRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.resolve(&SessionToken::new("forged")), None);
    }
}
