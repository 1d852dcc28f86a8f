//! Password login against the backend.

use crate::client::RequestClient;
use crate::controller::AuthController;
use crate::identity::Identity;
use crate::{SessionError, SessionResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Login request body.
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Login response body.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(alias = "access_token")]
    token: String,
}

impl AuthController {
    /// Exchange email and password for a token, then [`login`](Self::login) with it.
    ///
    /// The request goes through `client` like any other write, so it carries
    /// the current session credential if there is one.
    pub async fn login_with_password(
        &self,
        client: &RequestClient,
        login_path: &str,
        email: &str,
        password: &str,
    ) -> SessionResult<Identity> {
        debug!(path = %login_path, email = %email, "Attempting email/password login");

        let response = client
            .post_json(login_path, &LoginRequest { email, password })
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Login failed");
            return Err(SessionError::InvalidCredentials(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let data: LoginResponse = response.json().await?;
        self.login(&data.token)
    }
}
