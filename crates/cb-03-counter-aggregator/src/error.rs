//! Error types for the counter aggregator

use shared_types::StorageError;
use thiserror::Error;

/// Errors that can occur in the counter aggregator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CounterError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Unparsable counter record: {0}")]
    Parse(String),

    #[error("Invalid counter configuration: {0}")]
    InvalidConfig(String),
}
