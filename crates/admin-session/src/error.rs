//! Session error types.

use crate::token::TokenError;
use thiserror::Error;

/// Error type for the session layer.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Token could not be decoded into claims
    #[error("Invalid session token: {0}")]
    Token(#[from] TokenError),

    /// Backend rejected the login credentials
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// No authenticated session
    #[error("Not logged in")]
    NotLoggedIn,

    /// Session state was read before startup validation finished
    #[error("Session not initialized")]
    NotInitialized,

    /// Authenticated identity lacks the required role
    #[error("Forbidden: requires role {required}")]
    Forbidden { required: String },

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] tab_storage::StorageError),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Credential could not be encoded as a header value
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// URL parse error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SessionError {
    /// Returns true if the caller may retry the operation.
    ///
    /// Transient errors are connection failures, timeouts and 5xx statuses
    /// surfaced through `error_for_status`. Nothing here retries on its own.
    pub fn is_transient(&self) -> bool {
        match self {
            SessionError::Http(e) => {
                if e.is_connect() || e.is_timeout() {
                    return true;
                }
                if let Some(status) = e.status() {
                    return status.is_server_error();
                }
                false
            }
            _ => false,
        }
    }
}

impl From<admin_config::CoreError> for SessionError {
    fn from(err: admin_config::CoreError) -> Self {
        match err {
            admin_config::CoreError::InvalidUrl(e) => SessionError::InvalidUrl(e),
            other => SessionError::Config(other.to_string()),
        }
    }
}

/// Result type alias using SessionError.
pub type SessionResult<T> = Result<T, SessionError>;
