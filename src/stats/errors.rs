use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
