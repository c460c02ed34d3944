//! Error types for the encounter table subsystem

use shared_types::StorageError;
use thiserror::Error;

/// Errors that can occur in the encounter table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Home device file has {len} bytes, not a multiple of 6")]
    CorruptHomeSet { len: usize },

    #[error("Invalid table configuration: {0}")]
    InvalidConfig(String),
}
