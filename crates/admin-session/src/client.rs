//! Shared HTTP client with per-request credential selection.
//!
//! Every outgoing request passes through [`RequestClient::authorize`] right
//! before it is sent:
//!
//! - `GET` requests carry the shared public token, so read-only pages work
//!   without a login while the backend still scopes access by that token.
//! - Every other method carries the logged-in user's credential, or nothing.
//!
//! Reads never carry the user's token and writes never carry the public one.
//! Responses come back untouched, including non-2xx statuses.

use crate::store::{bearer, SessionStore};
use crate::SessionResult;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Method, Request, RequestBuilder, Response};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Settings the request client is built from.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every request path is appended to.
    pub api_base_url: String,
    /// Public bearer token for GET requests; empty disables it.
    pub public_token: String,
}

impl From<&admin_config::Config> for ClientConfig {
    fn from(config: &admin_config::Config) -> Self {
        Self {
            api_base_url: config.api_base_url.clone(),
            public_token: config.public_token.clone(),
        }
    }
}

/// Credential chosen for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Build-time public token (raw token).
    Public(String),
    /// Session credential, already in `Bearer <token>` form.
    Session(String),
}

impl Credential {
    /// Value for the `Authorization` header.
    pub fn header_value(&self) -> String {
        match self {
            Credential::Public(token) => bearer(token),
            Credential::Session(header) => header.clone(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Credential::Public(_) => "public",
            Credential::Session(_) => "session",
        }
    }
}

/// Pick the credential for a request with the given method.
///
/// `session_credential` is the session store's current default credential.
pub fn select_credential(
    method: &Method,
    session_credential: Option<&str>,
    public_token: &str,
) -> Option<Credential> {
    if *method == Method::GET {
        if public_token.is_empty() {
            None
        } else {
            Some(Credential::Public(public_token.to_string()))
        }
    } else {
        session_credential.map(|c| Credential::Session(c.to_string()))
    }
}

/// The one HTTP client shared by the whole dashboard.
#[derive(Clone)]
pub struct RequestClient {
    http: reqwest::Client,
    base_url: Url,
    public_token: String,
    session: Arc<SessionStore>,
}

impl RequestClient {
    /// Create a client reading credentials from `session`.
    pub fn new(config: ClientConfig, session: Arc<SessionStore>) -> SessionResult<Self> {
        Self::with_http_client(config, session, reqwest::Client::new())
    }

    /// Same as [`RequestClient::new`] with a preconfigured `reqwest::Client`.
    pub fn with_http_client(
        config: ClientConfig,
        session: Arc<SessionStore>,
        http: reqwest::Client,
    ) -> SessionResult<Self> {
        let base_url = Url::parse(&config.api_base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(crate::SessionError::Config(format!(
                "API base URL cannot be used as a base: {}",
                config.api_base_url
            )));
        }

        Ok(Self {
            http,
            base_url,
            public_token: config.public_token,
            session,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Resolve `path` against the base URL, keeping the base's own path.
    pub fn url(&self, path: &str) -> SessionResult<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, path))?)
    }

    /// Start a request. The credential is attached later, at send time.
    pub fn request(&self, method: Method, path: &str) -> SessionResult<RequestBuilder> {
        Ok(self.http.request(method, self.url(path)?))
    }

    /// Build `builder` and apply the credential rule to it.
    pub fn prepare(&self, builder: RequestBuilder) -> SessionResult<Request> {
        let mut request = builder.build()?;
        self.authorize(&mut request)?;
        Ok(request)
    }

    /// Replace any `Authorization` header on `request` with the selected
    /// credential, reading the session store at this instant.
    pub fn authorize(&self, request: &mut Request) -> SessionResult<Option<Credential>> {
        let session_credential = self.session.default_credential();
        let credential = select_credential(
            request.method(),
            session_credential.as_deref(),
            &self.public_token,
        );

        let headers = request.headers_mut();
        headers.remove(AUTHORIZATION);
        if let Some(credential) = &credential {
            let mut value = HeaderValue::from_str(&credential.header_value())?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        debug!(
            method = %request.method(),
            url = %request.url(),
            credential = credential.as_ref().map_or("none", Credential::kind),
            "authorized request"
        );

        Ok(credential)
    }

    /// Authorize and send. Non-2xx responses are returned, not turned into errors.
    pub async fn send(&self, builder: RequestBuilder) -> SessionResult<Response> {
        let request = self.prepare(builder)?;
        Ok(self.http.execute(request).await?)
    }

    pub async fn get(&self, path: &str) -> SessionResult<Response> {
        self.send(self.request(Method::GET, path)?).await
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> SessionResult<Response> {
        self.send(self.request(Method::POST, path)?.json(body)).await
    }

    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> SessionResult<Response> {
        self.send(self.request(Method::PUT, path)?.json(body)).await
    }

    pub async fn patch_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> SessionResult<Response> {
        self.send(self.request(Method::PATCH, path)?.json(body)).await
    }

    pub async fn delete(&self, path: &str) -> SessionResult<Response> {
        self.send(self.request(Method::DELETE, path)?).await
    }
}
