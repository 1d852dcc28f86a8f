//! Session store: the single source of truth for the current token.
//!
//! Holds at most one token in tab-scoped storage and keeps the default
//! outgoing credential in lockstep with it. Owned by the application root and
//! shared by `Arc` with the request client.

use crate::SessionResult;
use parking_lot::RwLock;
use std::sync::Arc;
use tab_storage::{SessionStorage, StorageKeys};
use tracing::debug;

/// Build the `Authorization` header value for a bearer token.
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Current token plus the default credential derived from it.
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    default_credential: RwLock<Option<String>>,
}

impl SessionStore {
    /// Create a store over `storage`.
    ///
    /// The default credential starts empty even if `storage` already holds a
    /// token; startup validation decides whether to re-apply it.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage,
            default_credential: RwLock::new(None),
        }
    }

    /// Replace (`Some`) or clear (`None`) the current session.
    ///
    /// Setting persists the raw token and then points the default credential
    /// at it. Clearing drops the credential first, so a failing backend can
    /// never leave a logged-out session sending the old token.
    pub fn set_session(&self, token: Option<&str>) -> SessionResult<()> {
        match token {
            Some(token) => {
                self.storage.set(StorageKeys::SESSION_TOKEN, token)?;
                *self.default_credential.write() = Some(bearer(token));
                debug!(
                    token = %observability::redact_token(token),
                    "session token stored"
                );
            }
            None => {
                self.default_credential.write().take();
                let existed = self.storage.delete(StorageKeys::SESSION_TOKEN)?;
                debug!(existed, "session token cleared");
            }
        }
        Ok(())
    }

    /// The stored token, if any.
    pub fn token(&self) -> SessionResult<Option<String>> {
        Ok(self.storage.get(StorageKeys::SESSION_TOKEN)?)
    }

    /// Header value attached to authenticated requests (`Bearer <token>`).
    pub fn default_credential(&self) -> Option<String> {
        self.default_credential.read().clone()
    }
}
