//! Application-root wiring of store, client and controller.

use crate::client::{ClientConfig, RequestClient};
use crate::controller::AuthController;
use crate::store::SessionStore;
use crate::SessionResult;
use admin_config::Config;
use std::sync::Arc;
use tab_storage::{SessionStorage, TabStorage};
use tracing::debug;

/// Everything the dashboard shares: one store, one client, one controller.
///
/// The store is created here and handed to both the client and the
/// controller, so they always agree on the current credential.
#[derive(Clone)]
pub struct SessionContext {
    pub store: Arc<SessionStore>,
    pub client: RequestClient,
    pub controller: Arc<AuthController>,
}

impl SessionContext {
    /// Wire a context over `storage`. Call [`AuthController::initialize`] next.
    pub fn new(config: ClientConfig, storage: Arc<dyn SessionStorage>) -> SessionResult<Self> {
        let store = Arc::new(SessionStore::new(storage));
        let client = RequestClient::new(config, store.clone())?;
        let controller = Arc::new(AuthController::new(store.clone()));

        Ok(Self {
            store,
            client,
            controller,
        })
    }

    /// Wire a context over fresh tab-scoped storage.
    pub fn with_tab_storage(config: ClientConfig) -> SessionResult<Self> {
        Self::new(config, Arc::new(TabStorage::new()))
    }

    /// Wire a context from loaded application configuration.
    pub fn from_config(config: &Config) -> SessionResult<Self> {
        config.api_base_url()?;
        if !config.has_public_token() {
            debug!("No public token configured, GET requests go out without credentials");
        }
        Self::with_tab_storage(ClientConfig::from(config))
    }
}
