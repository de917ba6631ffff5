use std::io;
use thiserror::Error;

/// Failures of the key-value substrate
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("i/o error on key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize value for key '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The write would push the stored total above the configured quota.
    /// The previous value under `key` is left untouched.
    #[error("storage quota exceeded writing '{key}': {required} bytes required, {available} available")]
    QuotaExceeded {
        key: String,
        required: usize,
        available: usize,
    },
}

impl StorageError {
    pub fn io(key: impl Into<String>, source: io::Error) -> Self {
        StorageError::Io {
            key: key.into(),
            source,
        }
    }

    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, StorageError::QuotaExceeded { .. })
    }
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;
