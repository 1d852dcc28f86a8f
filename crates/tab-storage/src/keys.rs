//! Storage key constants.

/// Storage keys used by the admin session layer.
pub struct StorageKeys;

impl StorageKeys {
    /// Raw session token as issued by the backend (no JSON wrapper).
    pub const SESSION_TOKEN: &'static str = "session_token";
}
