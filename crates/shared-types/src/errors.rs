//! # Error Types
//!
//! Storage errors shared by every persisted subsystem.
//!
//! No storage error is fatal: callers log it and continue with in-memory
//! state, retrying the write on a later cycle.

use thiserror::Error;

/// Errors raised by a [`crate::ByteStore`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The key has never been written.
    #[error("Not found: {key}")]
    NotFound { key: String },

    /// Reading the key failed.
    #[error("Read failed for {key}: {message}")]
    Read { key: String, message: String },

    /// Writing the key failed.
    #[error("Write failed for {key}: {message}")]
    Write { key: String, message: String },

    /// The stored value does not have the required fixed size.
    #[error("Wrong size for {key}: expected {expected} bytes, found {actual}")]
    WrongSize {
        key: String,
        expected: usize,
        actual: usize,
    },

    /// Re-read data differs from what is held in memory.
    #[error("Integrity mismatch for {key} at offset {offset}")]
    IntegrityMismatch { key: String, offset: usize },
}

impl StorageError {
    /// Build a read error from any displayable cause.
    pub fn read(key: &str, cause: impl std::fmt::Display) -> Self {
        StorageError::Read {
            key: key.to_string(),
            message: cause.to_string(),
        }
    }

    /// Build a write error from any displayable cause.
    pub fn write(key: &str, cause: impl std::fmt::Display) -> Self {
        StorageError::Write {
            key: key.to_string(),
            message: cause.to_string(),
        }
    }

    /// Whether the error only means "nothing stored yet".
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}
