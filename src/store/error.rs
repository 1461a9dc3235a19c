//! Error types for the persisted store

use std::path::PathBuf;

use thiserror::Error;

use crate::model::ValidationError;

/// Errors raised while reading or writing persisted records
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file could not be read or written
    #[error("Failed to access store file {path:?}: {source}")]
    Io {
        /// Store file path
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store file itself is not a JSON object of strings
    #[error("Store file {path:?} is corrupt: {source}")]
    Corrupt {
        /// Store file path
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A record under a key could not be (de)serialized
    #[error("Malformed record under key '{key}': {source}")]
    Record {
        /// Store key
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The requested change was rejected before touching the store
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl StoreError {
    pub(crate) fn record(key: &str, source: serde_json::Error) -> Self {
        Self::Record { key: key.to_string(), source }
    }
}
