use shared_types::StorageError;
use thiserror::Error;

/// Errors that can occur in the history ring
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid history configuration: {0}")]
    InvalidConfig(String),
}
