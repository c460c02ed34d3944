//! # Shared Ports (Driven)
//!
//! Interfaces every persisted subsystem depends on. Implementations live in
//! `shared-storage` (files, memory) and in the runtime (clock).

use parking_lot::Mutex;
use std::time::Instant;

use crate::entities::Timestamp;
use crate::errors::StorageError;

/// Flat key/value byte storage with file-like semantics.
///
/// Keys are plain file names. Methods take `&self` so one store can be shared
/// (behind an `Arc`) by every subsystem of the single control loop.
///
/// Production: `FileByteStore` (shared-storage)
/// Testing: `InMemoryByteStore` (shared-storage)
pub trait ByteStore: Send + Sync {
    /// Read the whole value. Missing keys yield [`StorageError::NotFound`].
    fn read(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Replace the whole value.
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Overwrite `bytes.len()` bytes in place starting at `offset`.
    ///
    /// The key must already exist and the range must lie within it.
    fn write_at(&self, key: &str, offset: u64, bytes: &[u8]) -> Result<(), StorageError>;

    /// Append to the value, creating it when missing.
    fn append(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Size of the stored value in bytes.
    fn size(&self, key: &str) -> Result<u64, StorageError>;
}

/// Monotonic time source (for testability).
pub trait MonotonicClock: Send + Sync {
    /// Seconds elapsed since the clock's origin.
    fn now(&self) -> Timestamp;
}

/// Clock backed by [`Instant`], with its origin at construction.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    fn now(&self) -> Timestamp {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Hand-driven clock for tests and simulation.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    /// Create a clock reading `start` seconds.
    pub fn starting_at(start: Timestamp) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward by `seconds`.
    pub fn advance(&self, seconds: f64) {
        *self.now.lock() += seconds;
    }

    /// Jump to an absolute reading. Going backwards is ignored.
    pub fn set(&self, at: Timestamp) {
        let mut now = self.now.lock();
        if at > *now {
            *now = at;
        }
    }
}

impl MonotonicClock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock()
    }
}
