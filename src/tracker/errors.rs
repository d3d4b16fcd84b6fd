use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for TrackerError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => TrackerError::NotFound(msg),
            other => TrackerError::Storage(other),
        }
    }
}
