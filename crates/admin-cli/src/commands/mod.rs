//! CLI command implementations.

mod auth;
mod request;
mod token;

pub use auth::login;
pub use request::request;
pub use token::{check, decode};

use admin_config::Config;
use admin_session::SessionContext;
use anyhow::Result;

/// Build the same store/client/controller wiring the dashboard uses.
fn session_context(config: &Config) -> Result<SessionContext> {
    Ok(SessionContext::from_config(config)?)
}
