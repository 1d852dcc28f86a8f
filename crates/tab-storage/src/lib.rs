//! Tab-scoped storage for the admin session layer.
//!
//! The session token lives in storage scoped to one browser tab: it survives
//! for as long as the tab does and is gone once the tab closes, so a reopened
//! dashboard always asks for a fresh login. [`TabStorage`] models that scope
//! as an in-process map owned by whoever created it; dropping it is closing
//! the tab. Other backends plug in through [`SessionStorage`].

mod keys;
mod memory;
mod traits;

pub use keys::StorageKeys;
pub use memory::TabStorage;
pub use traits::SessionStorage;

use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend refused or failed the operation
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
