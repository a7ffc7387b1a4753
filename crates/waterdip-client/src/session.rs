//! Waterdip Client Session
//!
//! The authenticated session the HTTP wrapper reads on every request.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// =============================================================================
// Session
// =============================================================================

/// Bearer token and organization of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub org_id: String,
}

impl Session {
    pub fn new(token: impl Into<String>, org_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            org_id: org_id.into(),
        }
    }
}

// =============================================================================
// Session Handle
// =============================================================================

/// Shared, swappable session slot.
///
/// The dashboard's app state writes it on login/logout; the HTTP client reads
/// it per request, so a new login takes effect without rebuilding the client.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        let handle = Self::new();
        handle.set(Some(session));
        handle
    }

    pub fn get(&self) -> Option<Session> {
        self.inner.read().clone()
    }

    pub fn set(&self, session: Option<Session>) {
        *self.inner.write() = session;
    }

    pub fn clear(&self) {
        self.set(None);
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .read()
            .as_ref()
            .map(|s| !s.token.is_empty())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_is_shared() {
        let handle = SessionHandle::new();
        let clone = handle.clone();
        assert!(!clone.is_authenticated());

        handle.set(Some(Session::new("tok", "org-1")));
        assert!(clone.is_authenticated());
        assert_eq!(clone.get().unwrap().org_id, "org-1");

        clone.clear();
        assert!(handle.get().is_none());
    }

    #[test]
    fn test_empty_token_is_not_authenticated() {
        let handle = SessionHandle::with_session(Session::new("", "org"));
        assert!(!handle.is_authenticated());
    }
}
