use parking_lot::RwLock;
use shared_types::{ByteStore, StorageError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// One recorded `write_at` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialWrite {
    pub key: String,
    pub offset: u64,
    pub bytes: Vec<u8>,
}

/// In-memory byte store for unit tests.
///
/// Supports fault injection (`fail_writes`, `fail_reads`) so callers can
/// exercise their fall-back paths, and records every partial write.
#[derive(Default)]
pub struct InMemoryByteStore {
    data: RwLock<HashMap<String, Vec<u8>>>,
    partial_writes: RwLock<Vec<PartialWrite>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl InMemoryByteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write (full, partial, append) fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent read fail.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Store raw bytes bypassing fault injection (to simulate corruption).
    pub fn insert_raw(&self, key: &str, bytes: Vec<u8>) {
        self.data.write().insert(key.to_string(), bytes);
    }

    /// Current value of a key, bypassing fault injection.
    pub fn get_raw(&self, key: &str) -> Option<Vec<u8>> {
        self.data.read().get(key).cloned()
    }

    /// All partial writes recorded so far.
    pub fn partial_writes(&self) -> Vec<PartialWrite> {
        self.partial_writes.read().clone()
    }

    /// Forget recorded partial writes.
    pub fn clear_partial_writes(&self) {
        self.partial_writes.write().clear();
    }

    fn check_write(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::write(key, "injected write failure"));
        }
        Ok(())
    }
}

impl ByteStore for InMemoryByteStore {
    fn read(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::read(key, "injected read failure"));
        }
        self.data
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.check_write(key)?;
        self.data.write().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn write_at(&self, key: &str, offset: u64, bytes: &[u8]) -> Result<(), StorageError> {
        self.check_write(key)?;
        let mut data = self.data.write();
        let value = data
            .get_mut(key)
            .ok_or_else(|| StorageError::write(key, "patch of missing key"))?;

        let start = offset as usize;
        let end = start + bytes.len();
        if end > value.len() {
            return Err(StorageError::write(
                key,
                format!("patch {}..{} beyond end {}", start, end, value.len()),
            ));
        }
        value[start..end].copy_from_slice(bytes);

        self.partial_writes.write().push(PartialWrite {
            key: key.to_string(),
            offset,
            bytes: bytes.to_vec(),
        });
        Ok(())
    }

    fn append(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.check_write(key)?;
        self.data
            .write()
            .entry(key.to_string())
            .or_default()
            .extend_from_slice(bytes);
        Ok(())
    }

    fn size(&self, key: &str) -> Result<u64, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::read(key, "injected read failure"));
        }
        self.data
            .read()
            .get(key)
            .map(|v| v.len() as u64)
            .ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })
    }
}
