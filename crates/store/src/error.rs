//! Error types for store operations

use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by the store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The data file exists but could not be read at startup
    #[error("failed to read data file {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the data file failed
    #[error("failed to write data file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The data file exists but is not valid JSON
    #[error("data file {} is not valid JSON: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The data file parsed, but its top-level value is not an object
    #[error("data file {} must contain a JSON object at the top level", path.display())]
    NotAnObject { path: PathBuf },

    /// The store was opened outside of a tokio runtime
    #[error("store must be opened from within a tokio runtime")]
    NoRuntime,

    /// A typed value could not be converted to plain JSON
    #[error("failed to encode value for key {key:?}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A stored value does not have the requested shape
    #[error("value at key {key:?} has an unexpected shape: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration could not be read or is out of range
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl StoreError {
    /// Whether this error means the store could not be brought up.
    ///
    /// `Io` is the flush-time counterpart and is never a startup error.
    pub fn is_startup(&self) -> bool {
        matches!(
            self,
            StoreError::Load { .. }
                | StoreError::Corrupt { .. }
                | StoreError::NotAnObject { .. }
                | StoreError::NoRuntime
                | StoreError::Config(_)
        )
    }
}
