//! Backend login.

use super::session_context;
use crate::output::{self, OutputFormat};
use admin_config::Config;
use anyhow::{anyhow, Result};
use tracing::info;

/// Log in with email and password and print the issued token.
pub async fn login(config: &Config, email: &str, password: &str, format: &OutputFormat) -> Result<()> {
    if email.is_empty() {
        return Err(anyhow!("Email is required"));
    }
    if password.is_empty() {
        return Err(anyhow!("Password is required"));
    }

    let ctx = session_context(config)?;
    ctx.controller.initialize();

    let identity = ctx
        .controller
        .login_with_password(&ctx.client, &config.login_path, email, password)
        .await
        .map_err(|e| anyhow!("Login failed: {}", e))?;
    let token = ctx
        .store
        .token()?
        .ok_or_else(|| anyhow!("Login succeeded but no token was stored"))?;

    info!(email = ?identity.email(), role = ?identity.role(), "Logged in via CLI");

    match format {
        OutputFormat::Text => {
            let who = identity
                .name()
                .or_else(|| identity.email())
                .unwrap_or(email);
            println!("Logged in as {}", who);
            if let Some(role) = identity.role() {
                output::print_row("Role", role);
            }
            if let Some(at) = identity.expires_at() {
                output::print_row("Expires", &at.to_rfc3339());
            }
            println!();
            println!("{}", token);
        }
        OutputFormat::Json => {
            output::print_json(&serde_json::json!({
                "token": token,
                "identity": identity,
            }));
        }
    }

    Ok(())
}
