//! Error types for the contact log

use shared_types::StorageError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid log configuration: {0}")]
    InvalidConfig(String),
}
