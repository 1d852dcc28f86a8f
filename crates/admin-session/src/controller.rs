//! Auth session controller.
//!
//! Owns the two-state auth FSM and drives the session store through startup
//! validation, login and logout. Identity is never stored here: it is decoded
//! from the store's current token whenever someone asks.

use crate::auth_fsm::{AuthMachine, AuthMachineInput, AuthState, AuthStateChangedPayload};
use crate::identity::Identity;
use crate::store::SessionStore;
use crate::token;
use crate::{SessionError, SessionResult};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Callback type for auth state change notifications.
pub type AuthStateCallback = Box<dyn Fn(AuthStateChangedPayload) + Send + Sync>;

/// Login/logout/startup orchestration over a [`SessionStore`].
pub struct AuthController {
    store: Arc<SessionStore>,
    fsm: Mutex<AuthMachine>,
    /// Set once `initialize` has finished, whatever its outcome.
    initialized: AtomicBool,
    state_callback: Mutex<Option<Arc<dyn Fn(AuthStateChangedPayload) + Send + Sync>>>,
}

impl AuthController {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self {
            store,
            fsm: Mutex::new(AuthMachine::new()),
            initialized: AtomicBool::new(false),
            state_callback: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Set a callback to be notified of auth state changes.
    pub fn set_state_callback(&self, callback: AuthStateCallback) {
        *self.state_callback.lock() = Some(Arc::from(callback));
    }

    /// Get the current FSM state.
    pub fn state(&self) -> AuthState {
        AuthState::from(self.fsm.lock().state())
    }

    /// Whether startup validation has completed. Protected UI waits for this.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Transition the FSM and notify the callback if the state changed.
    ///
    /// Every input is defined in both states, so `consume` cannot fail.
    fn transition(&self, input: &AuthMachineInput) -> AuthState {
        let mut fsm = self.fsm.lock();
        let old_state = AuthState::from(fsm.state());

        if fsm.consume(input).is_err() {
            warn!(input = ?input, state = ?old_state, "Ignoring undefined auth transition");
        }

        let new_state = AuthState::from(fsm.state());
        drop(fsm);

        if old_state != new_state {
            debug!(
                old_state = ?old_state,
                new_state = ?new_state,
                "Auth state transition"
            );
            self.notify_state_change(new_state);
        }

        new_state
    }

    /// Runs the callback without holding the lock, so it may call back in.
    fn notify_state_change(&self, state: AuthState) {
        let callback = self.state_callback.lock().clone();
        if let Some(callback) = callback {
            let identity = self.identity();
            callback(AuthStateChangedPayload {
                state,
                name: identity.as_ref().and_then(|i| i.name()).map(String::from),
                email: identity.as_ref().and_then(|i| i.email()).map(String::from),
                role: identity.as_ref().and_then(|i| i.role()).map(String::from),
            });
        }
    }

    /// Restore the session left in storage, once, at application start.
    ///
    /// A present and unexpired token is re-applied to the store (so the
    /// default credential is set even if storage was filled out-of-band) and
    /// the controller becomes Authenticated. A missing, malformed or expired
    /// token is cleared and the controller stays Unauthenticated. Errors never
    /// escape: any failure also ends Unauthenticated.
    pub fn initialize(&self) -> AuthState {
        let state = match self.restore_session() {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "Session restore failed, continuing unauthenticated");
                self.reject_session()
            }
        };

        self.initialized.store(true, Ordering::SeqCst);
        state
    }

    fn restore_session(&self) -> SessionResult<AuthState> {
        let Some(stored) = self.store.token()? else {
            info!("No existing session found on startup");
            self.store.set_session(None)?;
            return Ok(self.transition(&AuthMachineInput::SessionRejected));
        };

        if !token::is_valid(Some(&stored)) {
            info!("Stored session is malformed or expired, clearing it");
            self.store.set_session(None)?;
            return Ok(self.transition(&AuthMachineInput::SessionRejected));
        }

        self.store.set_session(Some(&stored))?;
        let state = self.transition(&AuthMachineInput::SessionRestored);

        let identity = self.identity();
        info!(
            name = ?identity.as_ref().and_then(|i| i.name()),
            role = ?identity.as_ref().and_then(|i| i.role()),
            "Session restored on startup"
        );
        Ok(state)
    }

    /// Best-effort fallback when restoring failed midway.
    fn reject_session(&self) -> AuthState {
        if let Err(e) = self.store.set_session(None) {
            warn!(error = %e, "Failed to clear session storage");
        }
        self.transition(&AuthMachineInput::SessionRejected)
    }

    /// Start a session with a token obtained from the backend.
    ///
    /// Only a token that cannot be decoded is refused; state and storage are
    /// then left untouched and the error is returned.
    pub fn login(&self, token: &str) -> SessionResult<Identity> {
        let claims = token::decode(token).map_err(|e| {
            warn!(error = %e, "Refusing login with undecodable token");
            e
        })?;

        self.store.set_session(Some(token))?;
        self.transition(&AuthMachineInput::LoginSucceeded);

        let identity = Identity::from(claims);
        info!(
            name = ?identity.name(),
            role = ?identity.role(),
            "Login successful"
        );
        Ok(identity)
    }

    /// End the session. Always leaves the controller Unauthenticated.
    ///
    /// A storage error while deleting the token is returned after the
    /// transition; the credential is already gone by then.
    pub fn logout(&self) -> SessionResult<()> {
        let cleared = self.store.set_session(None);
        self.transition(&AuthMachineInput::LogoutRequested);
        info!("Logged out");
        cleared
    }

    /// Identity decoded from the current token, while Authenticated.
    pub fn identity(&self) -> Option<Identity> {
        if !self.state().is_authenticated() {
            return None;
        }

        let stored = self.store.token().ok().flatten()?;
        token::decode(&stored).ok().map(Identity::from)
    }

    /// Whether a token is stored and its expiry is still in the future.
    pub fn is_authenticated(&self) -> bool {
        match self.store.token() {
            Ok(stored) => token::is_valid(stored.as_deref()),
            Err(e) => {
                warn!(error = %e, "Failed to read session token");
                false
            }
        }
    }

    /// Guard for protected screens.
    ///
    /// Refuses before startup validation has finished, and whenever the
    /// session is not Authenticated or its token has expired since.
    pub fn require_identity(&self) -> SessionResult<Identity> {
        if !self.is_initialized() {
            return Err(SessionError::NotInitialized);
        }
        if !self.state().is_authenticated() || !self.is_authenticated() {
            return Err(SessionError::NotLoggedIn);
        }
        self.identity().ok_or(SessionError::NotLoggedIn)
    }

    /// [`require_identity`](Self::require_identity) plus a `role` claim check.
    pub fn require_role(&self, role: &str) -> SessionResult<Identity> {
        let identity = self.require_identity()?;
        if !identity.has_role(role) {
            return Err(SessionError::Forbidden {
                required: role.to_string(),
            });
        }
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use chrono::Utc;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;
    use tab_storage::{SessionStorage, StorageError, StorageKeys, StorageResult, TabStorage};

    fn encode_token(claims: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        format!("{}.{}.signature", header, payload)
    }

    fn token_expiring_in(seconds: i64) -> String {
        encode_token(json!({
            "exp": Utc::now().timestamp() + seconds,
            "name": "Alice",
            "email": "alice@example.com",
            "role": "admin"
        }))
    }

    fn create_test_controller() -> (Arc<TabStorage>, AuthController) {
        let storage = Arc::new(TabStorage::new());
        let store = Arc::new(SessionStore::new(storage.clone()));
        (storage, AuthController::new(store))
    }

    /// Backend whose reads always fail.
    struct UnreadableStorage;

    impl SessionStorage for UnreadableStorage {
        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Ok(())
        }

        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Unavailable("storage disabled".to_string()))
        }

        fn delete(&self, _key: &str) -> StorageResult<bool> {
            Ok(false)
        }
    }

    #[test]
    fn test_initial_state() {
        let (_, controller) = create_test_controller();
        assert_eq!(controller.state(), AuthState::Unauthenticated);
        assert!(!controller.is_initialized());
        assert!(controller.identity().is_none());
    }

    #[test]
    fn test_initialize_without_token() {
        let (_, controller) = create_test_controller();

        assert_eq!(controller.initialize(), AuthState::Unauthenticated);
        assert!(controller.is_initialized());
        assert!(matches!(
            controller.require_identity(),
            Err(SessionError::NotLoggedIn)
        ));
    }

    #[test]
    fn test_initialize_with_expired_token_clears_it() {
        let (storage, controller) = create_test_controller();
        storage
            .set(StorageKeys::SESSION_TOKEN, &token_expiring_in(-10))
            .unwrap();

        assert_eq!(controller.initialize(), AuthState::Unauthenticated);
        assert!(controller.is_initialized());
        assert_eq!(controller.store().token().unwrap(), None);
        assert_eq!(controller.store().default_credential(), None);
    }

    #[test]
    fn test_initialize_with_malformed_token() {
        let (storage, controller) = create_test_controller();
        storage.set(StorageKeys::SESSION_TOKEN, "garbage").unwrap();

        assert_eq!(controller.initialize(), AuthState::Unauthenticated);
        assert_eq!(controller.store().token().unwrap(), None);
    }

    #[test]
    fn test_initialize_with_valid_token_restores_session() {
        let (storage, controller) = create_test_controller();
        let token = token_expiring_in(3600);
        storage.set(StorageKeys::SESSION_TOKEN, &token).unwrap();

        assert_eq!(controller.initialize(), AuthState::Authenticated);
        assert_eq!(
            controller.store().default_credential(),
            Some(format!("Bearer {}", token))
        );

        let identity = controller.require_identity().unwrap();
        assert_eq!(identity.name(), Some("Alice"));
    }

    #[test]
    fn test_initialize_storage_failure_is_unauthenticated() {
        let store = Arc::new(SessionStore::new(Arc::new(UnreadableStorage)));
        let controller = AuthController::new(store);

        assert_eq!(controller.initialize(), AuthState::Unauthenticated);
        assert!(controller.is_initialized());
        assert!(!controller.is_authenticated());
    }

    #[test]
    fn test_login_sets_identity_and_credential() {
        let (_, controller) = create_test_controller();
        let token = token_expiring_in(3600);

        let identity = controller.login(&token).unwrap();

        assert_eq!(identity.name(), Some("Alice"));
        assert_eq!(identity.role(), Some("admin"));
        assert_eq!(controller.state(), AuthState::Authenticated);
        assert_eq!(controller.identity(), Some(identity));
        assert_eq!(controller.store().token().unwrap(), Some(token.clone()));
        assert_eq!(
            controller.store().default_credential(),
            Some(format!("Bearer {}", token))
        );
        assert!(controller.is_authenticated());
    }

    #[test]
    fn test_login_with_undecodable_token_fails_without_side_effects() {
        let (_, controller) = create_test_controller();

        let result = controller.login("not-a-token");
        assert!(matches!(result, Err(SessionError::Token(_))));
        assert_eq!(controller.state(), AuthState::Unauthenticated);
        assert_eq!(controller.store().token().unwrap(), None);
        assert_eq!(controller.store().default_credential(), None);
    }

    #[test]
    fn test_failed_relogin_keeps_existing_session() {
        let (_, controller) = create_test_controller();
        let token = token_expiring_in(3600);
        controller.login(&token).unwrap();

        assert!(controller.login("a.!!!.c").is_err());
        assert_eq!(controller.state(), AuthState::Authenticated);
        assert_eq!(controller.store().token().unwrap(), Some(token));
    }

    #[test]
    fn test_logout_clears_everything() {
        let (storage, controller) = create_test_controller();
        controller.login(&token_expiring_in(3600)).unwrap();

        controller.logout().unwrap();

        assert_eq!(controller.state(), AuthState::Unauthenticated);
        assert!(controller.identity().is_none());
        assert!(!controller.is_authenticated());
        assert_eq!(controller.store().default_credential(), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_logout_when_not_logged_in() {
        let (_, controller) = create_test_controller();
        controller.logout().unwrap();
        assert_eq!(controller.state(), AuthState::Unauthenticated);
    }

    #[test]
    fn test_require_identity_before_initialize() {
        let (_, controller) = create_test_controller();
        controller.login(&token_expiring_in(3600)).unwrap();

        assert!(matches!(
            controller.require_identity(),
            Err(SessionError::NotInitialized)
        ));
    }

    #[test]
    fn test_require_identity_rejects_expired_login() {
        let (_, controller) = create_test_controller();
        controller.initialize();

        // Decodable but already expired: login accepts it, the guard does not.
        controller.login(&token_expiring_in(-5)).unwrap();
        assert_eq!(controller.state(), AuthState::Authenticated);
        assert!(!controller.is_authenticated());
        assert!(matches!(
            controller.require_identity(),
            Err(SessionError::NotLoggedIn)
        ));
    }

    #[test]
    fn test_require_role() {
        let (_, controller) = create_test_controller();
        controller.initialize();
        controller.login(&token_expiring_in(3600)).unwrap();

        assert!(controller.require_role("admin").is_ok());
        match controller.require_role("superadmin") {
            Err(SessionError::Forbidden { required }) => assert_eq!(required, "superadmin"),
            other => panic!("Expected Forbidden, got {:?}", other),
        }
    }

    #[test]
    fn test_state_callback_may_call_back_into_controller() {
        let (_, controller) = create_test_controller();
        let controller = Arc::new(controller);

        let weak = Arc::downgrade(&controller);
        controller.set_state_callback(Box::new(move |payload| {
            if payload.state == AuthState::Authenticated {
                if let Some(controller) = weak.upgrade() {
                    controller.logout().unwrap();
                }
            }
        }));

        let (tx, rx) = std::sync::mpsc::channel();
        let worker = controller.clone();
        std::thread::spawn(move || {
            let result = worker.login(&token_expiring_in(3600));
            let _ = tx.send(result.is_ok());
        });

        let finished = rx.recv_timeout(std::time::Duration::from_secs(5));
        assert_eq!(finished, Ok(true));
        assert_eq!(controller.state(), AuthState::Unauthenticated);
        assert_eq!(controller.store().default_credential(), None);
    }

    #[test]
    fn test_state_callback_invoked_on_change() {
        let (_, controller) = create_test_controller();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let calls_clone = calls.clone();
        let seen_clone = seen.clone();
        controller.set_state_callback(Box::new(move |payload| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            seen_clone.lock().push(payload);
        }));

        let token = token_expiring_in(3600);
        controller.login(&token).unwrap();
        // Same state again: no notification.
        controller.login(&token).unwrap();
        controller.logout().unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        let seen = seen.lock();
        assert_eq!(seen[0].state, AuthState::Authenticated);
        assert_eq!(seen[0].name.as_deref(), Some("Alice"));
        assert_eq!(seen[0].role.as_deref(), Some("admin"));
        assert_eq!(seen[1].state, AuthState::Unauthenticated);
        assert!(seen[1].name.is_none());
    }
}
