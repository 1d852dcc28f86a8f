//! Offline token inspection.

use crate::output::{self, OutputFormat};
use admin_session::token;
use anyhow::{bail, Result};

/// Decode a token and show its claims, expiry and validity.
pub fn decode(raw: &str, format: &OutputFormat) -> Result<()> {
    let claims = token::decode(raw)?;
    let valid = token::is_valid(Some(raw));
    let expires_at = claims.expires_at();

    match format {
        OutputFormat::Text => {
            output::print_json(claims.as_map());
            println!();
            output::print_row(
                "Expires",
                &expires_at.map_or_else(|| "never set".to_string(), |t| t.to_rfc3339()),
            );
            output::print_row("Valid", if valid { "yes" } else { "no" });
        }
        OutputFormat::Json => {
            output::print_json(&serde_json::json!({
                "claims": claims.as_map(),
                "expires_at": expires_at,
                "valid": valid,
            }));
        }
    }

    Ok(())
}

/// Succeed only for a decodable token whose expiry is in the future.
pub fn check(raw: &str, format: &OutputFormat) -> Result<()> {
    let claims = match token::decode(raw) {
        Ok(claims) => claims,
        Err(e) => bail!("Token is not valid: {}", e),
    };

    if !token::is_valid(Some(raw)) {
        match claims.expires_at() {
            Some(at) => bail!("Token expired at {}", at.to_rfc3339()),
            None => bail!("Token has no expiry claim"),
        }
    }

    let until = claims
        .expires_at()
        .map_or_else(String::new, |at| format!(" until {}", at.to_rfc3339()));
    output::print_success(&format!("Token is valid{}", until), format);
    Ok(())
}
