//! Ring buffer of occupancy samples.

use std::sync::Arc;

use badge_telemetry::log_event;
use shared_types::{ByteStore, StorageError, Timestamp};

use crate::config::HistoryConfig;
use crate::error::HistoryError;

const SUBSYSTEM: &str = "cb-04";

/// Fixed-size circular history of per-period counts.
///
/// `start_index` is the physical slot of the oldest column, which is also the
/// slot the next write goes to.
pub struct HistoryRingBuffer {
    config: HistoryConfig,
    store: Arc<dyn ByteStore>,
    data: Vec<u16>,
    start_index: usize,
    last_update: Timestamp,
    dirty: bool,
}

impl HistoryRingBuffer {
    /// Open the ring, loading `historybar.bin`.
    ///
    /// The sample clock starts at `now`. A missing or wrongly sized image is
    /// replaced by zeros and persisted.
    pub fn open(
        config: HistoryConfig,
        store: Arc<dyn ByteStore>,
        now: Timestamp,
    ) -> Result<Self, HistoryError> {
        config.validate()?;

        let mut ring = Self {
            data: vec![0; config.columns],
            config,
            store,
            start_index: 0,
            last_update: now,
            dirty: false,
        };
        ring.load();
        Ok(ring)
    }

    fn load(&mut self) {
        match self.read_image() {
            Ok(values) => {
                self.data = values;
                self.start_index = 0;
                log_event!(info, SUBSYSTEM, "Loaded historybar file");
            }
            Err(e) => {
                log_event!(warn, SUBSYSTEM, "Unable to load historybar file", error = %e);
                self.data = vec![0; self.config.columns];
                self.start_index = 0;
                self.dirty = true;
                self.flush();
            }
        }
    }

    fn read_image(&self) -> Result<Vec<u16>, StorageError> {
        let key = &self.config.store_key;
        let bytes = self.store.read(key)?;
        if bytes.len() != self.config.image_len() {
            return Err(StorageError::WrongSize {
                key: key.clone(),
                expected: self.config.image_len(),
                actual: bytes.len(),
            });
        }
        Ok(bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect())
    }

    /// Advance the ring to `now`, writing `count` into every column whose
    /// period has fully elapsed. Returns the number of columns written.
    ///
    /// At most `columns` writes happen per call; the sample clock advances by
    /// whole periods so the schedule does not drift.
    pub fn tick(&mut self, now: Timestamp, count: u16) -> usize {
        let period = self.config.sample_period;
        let elapsed = now - self.last_update;
        if elapsed < period {
            return 0;
        }

        let periods = (elapsed / period).floor();
        self.last_update += periods * period;
        let writes = (periods as usize).min(self.config.columns);

        for _ in 0..writes {
            let slot = self.start_index;
            self.data[slot] = count;
            self.start_index = (slot + 1) % self.config.columns;
        }

        log_event!(debug, SUBSYSTEM, "Updated historybar", columns = writes, count = count);
        self.dirty = true;
        self.flush();
        writes
    }

    /// Persist the ring if it has unsaved changes. Failures are logged and
    /// retried on the next call.
    pub fn flush(&mut self) -> bool {
        if !self.dirty {
            return true;
        }
        match self.save() {
            Ok(()) => {
                self.dirty = false;
                true
            }
            Err(e) => {
                log_event!(warn, SUBSYSTEM, "Unable to save historybar file", error = %e);
                false
            }
        }
    }

    /// Write the whole ring in logical order.
    pub fn save(&self) -> Result<(), HistoryError> {
        self.store.write(&self.config.store_key, &self.to_bytes())?;
        Ok(())
    }

    /// Image bytes: little-endian `u16`, oldest column first.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.values()
            .flat_map(|value| value.to_le_bytes())
            .collect()
    }

    /// Column values oldest to newest.
    pub fn values(&self) -> impl Iterator<Item = u16> + '_ {
        self.data[self.start_index..]
            .iter()
            .chain(self.data[..self.start_index].iter())
            .copied()
    }

    /// Chart series, oldest to newest. Each call starts from the beginning.
    pub fn render_series(&self) -> HistorySeries<'_> {
        HistorySeries { ring: self, pos: 0 }
    }

    /// Tallest column.
    pub fn max_value(&self) -> u16 {
        self.data.iter().copied().max().unwrap_or(0)
    }

    pub fn columns(&self) -> usize {
        self.config.columns
    }

    pub fn last_update(&self) -> Timestamp {
        self.last_update
    }

    pub fn has_pending_writes(&self) -> bool {
        self.dirty
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }
}

impl PartialEq for HistoryRingBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.config.columns == other.config.columns && self.values().eq(other.values())
    }
}

impl std::fmt::Debug for HistoryRingBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryRingBuffer")
            .field("columns", &self.config.columns)
            .field("start_index", &self.start_index)
            .field("last_update", &self.last_update)
            .finish()
    }
}

/// Restartable iterator over `(age, count)` pairs.
///
/// `age` is measured in sample periods before the newest column, so the
/// first item has age `columns - 1` and the last has age `0`.
#[derive(Clone)]
pub struct HistorySeries<'a> {
    ring: &'a HistoryRingBuffer,
    pos: usize,
}

impl Iterator for HistorySeries<'_> {
    type Item = (usize, u16);

    fn next(&mut self) -> Option<Self::Item> {
        let columns = self.ring.config.columns;
        if self.pos >= columns {
            return None;
        }
        let slot = (self.ring.start_index + self.pos) % columns;
        let item = (columns - 1 - self.pos, self.ring.data[slot]);
        self.pos += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.ring.config.columns.saturating_sub(self.pos);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for HistorySeries<'_> {}
