//! Error types for the membership filter subsystem

use shared_types::StorageError;
use thiserror::Error;

/// Errors that can occur in the membership filter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid filter configuration: {0}")]
    InvalidConfig(String),
}

impl FilterError {
    /// Whether this is a re-read mismatch found by verification.
    pub fn is_integrity_mismatch(&self) -> bool {
        matches!(
            self,
            FilterError::Storage(StorageError::IntegrityMismatch { .. })
        )
    }
}
