//! Configuration, paths, and logging setup for the CMS admin tools.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{
    Config, DEFAULT_API_BASE_URL, DEFAULT_LOGIN_PATH, DEFAULT_LOG_LEVEL, DEFAULT_PUBLIC_TOKEN,
};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, parse_level};
pub use paths::Paths;
