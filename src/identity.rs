//! Caller identity and storage keys.
//!
//! [`resolve_identity`] pulls an opaque user handle out of request headers, and
//! [`derive_key`] maps that handle to the single storage key holding the user's list.

use axum::http::HeaderMap;
use std::fmt;

/// Namespace prepended to every storage key.
pub const KEY_NAMESPACE: &str = "memory";

/// An opaque user handle (typically an email address). Never validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserIdentity(String);

impl UserIdentity {
    /// Wrap a raw token. Returns `None` for an empty token, which means "guest".
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of one user's memory list in the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read the identity header verbatim. Missing, empty or non-UTF-8 values mean guest.
pub fn resolve_identity(headers: &HeaderMap, header: &str) -> Option<UserIdentity> {
    headers
        .get(header)
        .and_then(|value| value.to_str().ok())
        .and_then(UserIdentity::new)
}

/// `memory:<identity>`. The identity is not escaped or case-folded.
pub fn derive_key(identity: &UserIdentity) -> StorageKey {
    StorageKey(format!("{KEY_NAMESPACE}:{}", identity.as_str()))
}
