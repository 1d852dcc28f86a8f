//! Authorized requests through the shared client.

use super::session_context;
use crate::output::{self, OutputFormat};
use admin_config::Config;
use admin_session::{AuthState, Method};
use anyhow::{anyhow, bail, Result};
use tracing::warn;

/// Parse an HTTP method name, case-insensitively.
pub fn parse_method(method: &str) -> Result<Method> {
    Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|_| anyhow!("Invalid HTTP method: {}", method))
}

/// Send one request the way the dashboard would and print the response.
///
/// `token` seeds tab storage before startup validation, so an expired or
/// malformed token is dropped exactly as on a page load.
pub async fn request(
    config: &Config,
    method: &str,
    path: &str,
    token: Option<&str>,
    data: Option<&str>,
    format: &OutputFormat,
) -> Result<()> {
    let method = parse_method(method)?;
    let ctx = session_context(config)?;

    if let Some(token) = token {
        ctx.store.set_session(Some(token))?;
    }
    let state = ctx.controller.initialize();
    if token.is_some() && state == AuthState::Unauthenticated {
        warn!("Session token rejected at startup, sending without user credential");
    }

    let mut builder = ctx.client.request(method, path)?;
    if let Some(data) = data {
        let body: serde_json::Value =
            serde_json::from_str(data).map_err(|e| anyhow!("Invalid JSON body: {}", e))?;
        builder = builder.json(&body);
    }

    let response = ctx.client.send(builder).await?;
    let status = response.status();
    let text = response.text().await?;

    match format {
        OutputFormat::Text => {
            println!("HTTP {}", status);
            match serde_json::from_str::<serde_json::Value>(&text) {
                Ok(json) => output::print_json(&json),
                Err(_) => println!("{}", text),
            }
        }
        OutputFormat::Json => {
            let body = serde_json::from_str::<serde_json::Value>(&text)
                .unwrap_or(serde_json::Value::String(text));
            output::print_json(&serde_json::json!({
                "status": status.as_u16(),
                "body": body,
            }));
        }
    }

    if !status.is_success() {
        bail!("Request failed with HTTP {}", status);
    }
    Ok(())
}
