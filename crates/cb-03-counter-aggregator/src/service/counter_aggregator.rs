//! Counter aggregator service

use std::sync::Arc;

use badge_telemetry::log_event;
use cb_02_encounter_table::Encounter;
use shared_types::ByteStore;

use crate::domain::{CounterConfig, CounterRecord, DIAL_COUNT};
use crate::error::CounterError;

const SUBSYSTEM: &str = "cb-03";

/// Owns the persisted counters and the dial migration rule.
pub struct CounterAggregator {
    config: CounterConfig,
    store: Arc<dyn ByteStore>,
    record: CounterRecord,
    dirty: bool,
}

impl CounterAggregator {
    /// Open the aggregator and load the stored record.
    ///
    /// Missing or unparsable records fall back to zeroed counters, which are
    /// persisted straight away.
    pub fn open(config: CounterConfig, store: Arc<dyn ByteStore>) -> Result<Self, CounterError> {
        config.validate()?;

        let mut aggregator = Self {
            config,
            store,
            record: CounterRecord::default(),
            dirty: false,
        };
        aggregator.load();
        Ok(aggregator)
    }

    /// Reload from storage, falling back to defaults.
    pub fn load(&mut self) {
        let loaded = self
            .store
            .read(&self.config.store_key)
            .map_err(CounterError::from)
            .and_then(|bytes| CounterRecord::parse(&String::from_utf8_lossy(&bytes)));

        match loaded {
            Ok(record) => {
                log_event!(
                    info,
                    SUBSYSTEM,
                    "Loaded counter data",
                    unique = record.unique_counts,
                    sample_seconds = record.sample_seconds
                );
                self.record = record;
                self.dirty = false;
            }
            Err(e) => {
                log_event!(warn, SUBSYSTEM, "No counter data to load, using defaults", error = %e);
                self.record = CounterRecord::default();
                self.dirty = true;
                if let Err(e) = self.save() {
                    log_event!(warn, SUBSYSTEM, "Default counter data not saved", error = %e);
                }
            }
        }
    }

    /// Account for a newly created encounter.
    pub fn on_encounter_created(&mut self, is_credited: bool) {
        if is_credited {
            self.record.unique_counts += 1;
            self.dirty = true;
        }
    }

    /// Move `encounter` between dial buckets if its duration crossed a
    /// threshold since the last tick. Returns whether any bucket changed.
    ///
    /// Home devices never contribute. Entering a bucket is refused when it
    /// would push the dial sum above the unique total.
    pub fn on_duration_tick(&mut self, encounter: &mut Encounter) -> bool {
        if encounter.is_exempt {
            return false;
        }

        let previous = encounter.last_known_duration_dial;
        let current = encounter.accumulated_duration;
        let crossed: Vec<usize> = self.config.thresholds.crossed(previous, current).collect();

        let mut changed = false;
        for index in crossed {
            changed |= self.advance_dial(index);
        }

        encounter.last_known_duration_dial = current;
        if changed {
            self.dirty = true;
        }
        changed
    }

    fn advance_dial(&mut self, index: usize) -> bool {
        if index >= DIAL_COUNT {
            return false;
        }
        let lower_has_entry = index > 0 && self.record.dials()[index - 1] > 0;
        let has_room = self.record.dial_sum() < self.record.unique_counts;

        if lower_has_entry {
            if let Some(lower) = self.record.dial_mut(index - 1) {
                *lower -= 1;
            }
        } else if !has_room {
            return false;
        }

        match self.record.dial_mut(index) {
            Some(bucket) => {
                *bucket += 1;
                true
            }
            None => false,
        }
    }

    /// Add sampled wall time. Persisted with the next save.
    pub fn add_sample_time(&mut self, seconds: f64) {
        if seconds.is_finite() && seconds > 0.0 {
            self.record.sample_seconds += seconds;
        }
    }

    /// Zero every counter.
    pub fn reset(&mut self) {
        self.record = CounterRecord::default();
        self.dirty = true;
        log_event!(info, SUBSYSTEM, "Counters reset to zero");
    }

    /// Write the whole record.
    pub fn save(&mut self) -> Result<(), CounterError> {
        let json = self.record.to_json()?;
        self.store.write(&self.config.store_key, json.as_bytes())?;
        self.dirty = false;
        log_event!(debug, SUBSYSTEM, "Saved counter data", unique = self.record.unique_counts);
        Ok(())
    }

    /// Save only if a counter changed since the last successful save.
    pub fn persist(&mut self) -> Result<bool, CounterError> {
        if !self.dirty {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    pub fn total_unique(&self) -> u64 {
        self.record.unique_counts
    }

    pub fn dial_buckets(&self) -> [u64; DIAL_COUNT] {
        self.record.dials()
    }

    pub fn sample_seconds(&self) -> f64 {
        self.record.sample_seconds
    }

    pub fn record(&self) -> &CounterRecord {
        &self.record
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
