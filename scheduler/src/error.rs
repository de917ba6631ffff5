//! Error types shared by every service in the scheduler library.

use thiserror::Error;

use crate::backend::storage::StorageError;

/// Errors surfaced by scheduler operations.
///
/// Not-found is never an error: lookups return `None` and deletes return `false`.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Input rejected before anything was persisted
    #[error("validation failed: {0}")]
    Validation(String),

    /// An import document that is not an object or has a collection of the wrong shape
    #[error("invalid import document: {0}")]
    InvalidDocument(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchedulerError {
    pub fn validation(message: impl Into<String>) -> Self {
        SchedulerError::Validation(message.into())
    }

    pub fn invalid_document(message: impl Into<String>) -> Self {
        SchedulerError::InvalidDocument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
