//! Membership filter service
//!
//! Owns the in-memory [`RegionBloom`] and keeps `bloom.bin` in step with it.
//! Every storage fault is logged and absorbed; the in-memory answer is always
//! authoritative and unsaved bytes are queued for the next flush.

use std::collections::BTreeSet;
use std::sync::Arc;

use badge_telemetry::log_event;
use shared_types::{ByteStore, DeviceAddress, StorageError};

use crate::domain::{FilterConfig, RegionBloom, FILTER_BYTES, REGION_COUNT};
use crate::error::FilterError;
use crate::metrics::{FilterHealth, FilterMetrics, FilterMetricsSnapshot};
use crate::ports::MembershipApi;

const SUBSYSTEM: &str = "cb-01";

/// Chunk size used when re-reading the image for verification.
pub const VERIFY_CHUNK: usize = 256;

/// Persistent membership filter.
pub struct MembershipFilter {
    config: FilterConfig,
    store: Arc<dyn ByteStore>,
    bloom: RegionBloom,
    /// Byte offsets changed in memory but not yet written.
    pending_bytes: BTreeSet<usize>,
    /// A full image write failed and must be repeated.
    pending_full_save: bool,
    metrics: FilterMetrics,
}

impl MembershipFilter {
    /// Open the filter, loading `bloom.bin` from `store`.
    ///
    /// A missing, unreadable or wrongly sized image is replaced by an all-zero
    /// filter that is immediately persisted. Only an invalid configuration is
    /// reported as an error.
    pub fn open(config: FilterConfig, store: Arc<dyn ByteStore>) -> Result<Self, FilterError> {
        config.validate()?;

        let mut filter = Self {
            config,
            store,
            bloom: RegionBloom::new(),
            pending_bytes: BTreeSet::new(),
            pending_full_save: false,
            metrics: FilterMetrics::new(),
        };
        filter.load();
        Ok(filter)
    }

    /// Reload from storage, self-healing on failure.
    pub fn load(&mut self) {
        match self.read_image() {
            Ok(bloom) => {
                log_event!(
                    info,
                    SUBSYSTEM,
                    "Loaded bloom file",
                    key = %self.config.store_key,
                    bits_set = bloom.bits_set()
                );
                self.bloom = bloom;
                self.pending_bytes.clear();
                self.pending_full_save = false;
            }
            Err(e) => {
                log_event!(
                    warn,
                    SUBSYSTEM,
                    "Unable to load bloom file, creating new",
                    key = %self.config.store_key,
                    error = %e
                );
                self.bloom.clear();
                self.pending_bytes.clear();
                if let Err(e) = self.save_full() {
                    log_event!(warn, SUBSYSTEM, "Fresh bloom file not saved", error = %e);
                }
            }
        }
    }

    fn read_image(&self) -> Result<RegionBloom, StorageError> {
        let key = &self.config.store_key;
        let size = self.store.size(key)? as usize;
        if size != FILTER_BYTES {
            return Err(StorageError::WrongSize {
                key: key.clone(),
                expected: FILTER_BYTES,
                actual: size,
            });
        }

        let bytes = self.store.read(key)?;
        RegionBloom::from_bytes(&bytes).ok_or_else(|| StorageError::WrongSize {
            key: key.clone(),
            expected: FILTER_BYTES,
            actual: bytes.len(),
        })
    }

    /// Write the whole image, replacing whatever is stored.
    pub fn save_full(&mut self) -> Result<(), FilterError> {
        match self
            .store
            .write(&self.config.store_key, self.bloom.as_bytes())
        {
            Ok(()) => {
                self.metrics.record_full_save();
                self.pending_full_save = false;
                self.pending_bytes.clear();
                log_event!(debug, SUBSYSTEM, "Saved complete bloom file");
                self.verify_if_enabled();
                Ok(())
            }
            Err(e) => {
                self.metrics.record_write_failure();
                self.pending_full_save = true;
                Err(e.into())
            }
        }
    }

    /// Write queued byte offsets, stopping at the first failure.
    fn save_pending_bytes(&mut self) -> Result<(), FilterError> {
        let mut written = 0usize;
        let offsets: Vec<usize> = self.pending_bytes.iter().copied().collect();

        for offset in offsets {
            let Some(value) = self.bloom.byte_at(offset) else {
                self.pending_bytes.remove(&offset);
                continue;
            };
            if let Err(e) = self
                .store
                .write_at(&self.config.store_key, offset as u64, &[value])
            {
                self.metrics.record_write_failure();
                self.metrics.record_bytes_flushed(written);
                return Err(e.into());
            }
            self.pending_bytes.remove(&offset);
            written += 1;
        }

        self.metrics.record_bytes_flushed(written);
        if written > 0 {
            log_event!(debug, SUBSYSTEM, "Saved bloom bytes", count = written);
            self.verify_if_enabled();
        }
        Ok(())
    }

    /// Re-read the stored image and compare it with memory chunk by chunk.
    ///
    /// Reports the first mismatching chunk's offset. Diagnostic only.
    pub fn verify(&self) -> Result<(), FilterError> {
        let key = &self.config.store_key;
        let stored = self.store.read(key)?;
        let memory = self.bloom.as_bytes();

        if stored.len() != memory.len() {
            return Err(StorageError::WrongSize {
                key: key.clone(),
                expected: memory.len(),
                actual: stored.len(),
            }
            .into());
        }

        for (chunk, (disk, mem)) in stored
            .chunks(VERIFY_CHUNK)
            .zip(memory.chunks(VERIFY_CHUNK))
            .enumerate()
        {
            if disk != mem {
                return Err(StorageError::IntegrityMismatch {
                    key: key.clone(),
                    offset: chunk * VERIFY_CHUNK,
                }
                .into());
            }
        }
        Ok(())
    }

    fn verify_if_enabled(&self) {
        if !self.config.verify_after_write {
            return;
        }
        match self.verify() {
            Ok(()) => log_event!(debug, SUBSYSTEM, "Verified bloom file ok"),
            Err(e) => {
                self.metrics.record_verify_mismatch();
                log_event!(warn, SUBSYSTEM, "Unable to verify bloom file", error = %e);
            }
        }
    }

    /// Whether any write is waiting to be retried.
    pub fn has_pending_writes(&self) -> bool {
        self.pending_full_save || !self.pending_bytes.is_empty()
    }

    /// In-memory filter state.
    pub fn bloom(&self) -> &RegionBloom {
        &self.bloom
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn metrics(&self) -> FilterMetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn health(&self) -> FilterHealth {
        let max_region_fill = (0..REGION_COUNT)
            .map(|r| self.bloom.region_fill(r))
            .fold(0.0, f64::max);
        FilterHealth {
            bits_set: self.bloom.bits_set(),
            max_region_fill,
            false_positive_rate: self.bloom.false_positive_rate(),
            activity: self.metrics.snapshot(),
        }
    }
}

impl MembershipApi for MembershipFilter {
    fn contains_or_add(&mut self, address: &DeviceAddress) -> bool {
        let insertion = self.bloom.check_and_set(address);
        self.metrics.record_check(insertion.is_new);

        if insertion.is_new {
            self.pending_bytes.extend(insertion.changed_bytes);
            if let Err(e) = self.flush() {
                log_event!(
                    warn,
                    SUBSYSTEM,
                    "Unable to save bloom bytes, will retry",
                    address = %address,
                    error = %e
                );
            }
        }

        insertion.is_new
    }

    fn contains(&self, address: &DeviceAddress) -> bool {
        self.bloom.contains(address)
    }

    fn reset(&mut self) -> Result<(), FilterError> {
        self.bloom.clear();
        self.pending_bytes.clear();
        log_event!(info, SUBSYSTEM, "Bloom filter cleared");
        self.save_full()
    }

    fn flush(&mut self) -> Result<(), FilterError> {
        if self.pending_full_save {
            // A full write covers every queued byte.
            return self.save_full();
        }
        if self.pending_bytes.is_empty() {
            return Ok(());
        }
        self.save_pending_bytes()
    }
}
