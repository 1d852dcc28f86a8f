//! Configuration management for the admin tools.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Backend API base URL (can be overridden at compile time via CMS_ADMIN_API_URL env var).
pub const DEFAULT_API_BASE_URL: &str = match option_env!("CMS_ADMIN_API_URL") {
    Some(url) => url,
    None => "http://localhost:5000/api",
};

/// Shared credential for read-only requests (compile time via CMS_ADMIN_PUBLIC_TOKEN env var).
///
/// Empty means "no public credential": GET requests then go out without an
/// `Authorization` header.
pub const DEFAULT_PUBLIC_TOKEN: &str = match option_env!("CMS_ADMIN_PUBLIC_TOKEN") {
    Some(token) => token,
    None => "",
};

/// Path of the backend login endpoint, relative to the API base URL.
pub const DEFAULT_LOGIN_PATH: &str = "/auth/login";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Backend API base URL.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Public bearer token attached to GET requests.
    #[serde(default = "default_public_token")]
    pub public_token: String,
    /// Login endpoint path.
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_public_token() -> String {
    DEFAULT_PUBLIC_TOKEN.to_string()
}

fn default_login_path() -> String {
    DEFAULT_LOGIN_PATH.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            api_base_url: default_api_base_url(),
            public_token: default_public_token(),
            login_path: default_login_path(),
        }
    }
}

impl Config {
    /// Load configuration from a file, falling back to defaults.
    ///
    /// `api_base_url` and `public_token` are build-time values and always
    /// replace whatever the file contains.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.api_base_url = default_api_base_url();
        config.public_token = default_public_token();

        config.load_from_env();

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    /// Only the log level can be overridden at runtime.
    fn load_from_env(&mut self) {
        if let Ok(log_level) = std::env::var("CMS_ADMIN_LOG_LEVEL") {
            self.log_level = log_level;
        }
    }

    /// Get the API base URL as a parsed URL.
    pub fn api_base_url(&self) -> CoreResult<Url> {
        let url = Url::parse(&self.api_base_url)?;
        if url.cannot_be_a_base() {
            return Err(CoreError::Config(format!(
                "API base URL cannot be used as a base: {}",
                self.api_base_url
            )));
        }
        Ok(url)
    }

    /// Whether a public token was configured for read requests.
    pub fn has_public_token(&self) -> bool {
        !self.public_token.is_empty()
    }
}
