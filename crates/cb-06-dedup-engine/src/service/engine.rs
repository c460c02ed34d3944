//! Dedup engine service

use std::sync::Arc;

use badge_telemetry::log_event;
use cb_01_membership_filter::{MembershipApi, MembershipFilter};
use cb_02_encounter_table::{EncounterTable, TableEvent, UpdateOutcome};
use cb_03_counter_aggregator::CounterAggregator;
use cb_04_history_ring::HistoryRingBuffer;
use cb_05_contact_log::EventSink;
use shared_types::{ByteStore, ContactEvent, ObservedRecord, Timestamp};

use super::oracle::FilterOracle;
use crate::domain::{
    format_uptime, CycleReport, EngineConfig, EngineSnapshot, InputState, PersistReport, Phase,
    ResetDebouncer,
};
use crate::error::EngineError;
use crate::ports::DedupApi;

const SUBSYSTEM: &str = "cb-06";

/// Owns every core subsystem and runs one dedup cycle per scan.
pub struct DedupEngine {
    config: EngineConfig,
    filter: MembershipFilter,
    table: EncounterTable,
    counters: CounterAggregator,
    history: HistoryRingBuffer,
    sink: Box<dyn EventSink>,
    phase: Phase,
    debouncer: ResetDebouncer,
    is_low_power: bool,
    scan_serial: u64,
    last_sample: Timestamp,
}

impl DedupEngine {
    /// Open every subsystem over `store` and log the startup event.
    ///
    /// Unreadable persisted state is replaced by defaults inside each
    /// subsystem; only an invalid configuration is an error here.
    pub fn open(
        config: EngineConfig,
        store: Arc<dyn ByteStore>,
        sink: Box<dyn EventSink>,
        now: Timestamp,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        let filter = MembershipFilter::open(config.filter.clone(), store.clone())?;
        let table = EncounterTable::open(config.table.clone(), store.clone(), now)?;
        let counters = CounterAggregator::open(config.counters.clone(), store.clone())?;
        let history = HistoryRingBuffer::open(config.history.clone(), store, now)?;

        let mut engine = Self {
            debouncer: ResetDebouncer::new(config.reset_hold_ticks),
            config,
            filter,
            table,
            counters,
            history,
            sink,
            phase: Phase::Startup,
            is_low_power: false,
            scan_serial: 0,
            last_sample: now,
        };

        let filter_health = engine.filter.health();
        log_event!(
            info,
            SUBSYSTEM,
            "Dedup engine started",
            total_unique = engine.counters.total_unique(),
            home_devices = engine.table.home_set().len(),
            filter_bits_set = filter_health.bits_set,
            filter_max_fill = filter_health.max_region_fill,
            filter_false_positive_rate = filter_health.false_positive_rate
        );
        engine.emit(ContactEvent::Startup {
            at: now,
            total_unique: engine.counters.total_unique(),
        });
        Ok(engine)
    }

    fn emit(&mut self, event: ContactEvent) {
        if let Err(e) = self.sink.record(&event) {
            log_event!(warn, SUBSYSTEM, "Contact log write failed", event = event.tag(), error = %e);
        }
    }

    /// Zero the filter, encounters, home devices and counters, then start a
    /// new home-grace window.
    ///
    /// Every in-memory change happens before this returns; storage failures
    /// are logged and left for `persist` to retry.
    pub fn reset(&mut self, now: Timestamp) {
        log_event!(
            info,
            SUBSYSTEM,
            "Resetting counts",
            total_unique = self.counters.total_unique()
        );

        if let Err(e) = self.filter.reset() {
            log_event!(warn, SUBSYSTEM, "Filter reset not persisted", error = %e);
        }
        if let Err(e) = self.table.clear(now) {
            log_event!(warn, SUBSYSTEM, "Home device reset not persisted", error = %e);
        }
        self.counters.reset();
        if let Err(e) = self.counters.save() {
            log_event!(warn, SUBSYSTEM, "Counter reset not persisted", error = %e);
        }

        self.phase = Phase::HomeGrace { since: now };
        self.scan_serial = 0;
        self.last_sample = now;
    }

    fn set_low_power(&mut self, low_power: bool) {
        self.is_low_power = low_power;
        if low_power {
            log_event!(info, SUBSYSTEM, "Switched to low power mode");
        } else {
            log_event!(info, SUBSYSTEM, "Switched to high power mode");
        }
    }

    fn apply_table_events(&mut self, outcome: &UpdateOutcome, now: Timestamp) -> usize {
        let mut credited = 0;
        for event in &outcome.events {
            let contact = match event {
                TableEvent::Added {
                    address,
                    kind,
                    is_new,
                    credited: is_credited,
                    ..
                } => {
                    self.counters.on_encounter_created(*is_credited);
                    if *is_credited {
                        credited += 1;
                    }
                    ContactEvent::Add {
                        at: now,
                        total_unique: self.counters.total_unique(),
                        address: *address,
                        is_new: *is_new,
                        kind: *kind,
                    }
                }
                TableEvent::Hopped {
                    old_address,
                    new_address,
                    is_new,
                    ..
                } => ContactEvent::Hop {
                    at: now,
                    total_unique: self.counters.total_unique(),
                    old_address: *old_address,
                    new_address: *new_address,
                    is_new: *is_new,
                },
                TableEvent::Deleted { address, encounter } => ContactEvent::Delete {
                    at: now,
                    total_unique: self.counters.total_unique(),
                    address: *address,
                    is_new: encounter.is_newly_unique,
                    first_seen: encounter.first_seen,
                    last_seen: encounter.last_seen,
                    duration: encounter.accumulated_duration,
                },
            };
            self.emit(contact);
        }
        credited
    }

    /// Non-home encounters seen during the last sample period.
    fn history_count(&self, now: Timestamp) -> u16 {
        let period = self.history.config().sample_period;
        let count = self
            .table
            .encounters()
            .filter(|(_, e)| !e.is_exempt && e.is_active(now, period))
            .count();
        u16::try_from(count).unwrap_or(u16::MAX)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_low_power(&self) -> bool {
        self.is_low_power
    }

    pub fn scan_serial(&self) -> u64 {
        self.scan_serial
    }

    pub fn total_unique(&self) -> u64 {
        self.counters.total_unique()
    }

    pub fn filter(&self) -> &MembershipFilter {
        &self.filter
    }

    pub fn table(&self) -> &EncounterTable {
        &self.table
    }

    pub fn counters(&self) -> &CounterAggregator {
        &self.counters
    }

    pub fn history(&self) -> &HistoryRingBuffer {
        &self.history
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl DedupApi for DedupEngine {
    fn handle_input(&mut self, input: InputState, now: Timestamp) -> bool {
        if input.low_power != self.is_low_power {
            self.set_low_power(input.low_power);
        }
        if self.debouncer.observe(input.both_buttons()) {
            self.reset(now);
            return true;
        }
        false
    }

    fn update(&mut self, observed: &[ObservedRecord], now: Timestamp) -> CycleReport {
        let previous = self.phase;
        self.phase = self.phase.advance(now, self.config.home_grace);
        if previous != self.phase {
            log_event!(info, SUBSYSTEM, "Phase changed", from = previous.name(), to = self.phase.name());
        }

        self.scan_serial += 1;
        self.counters.add_sample_time(now - self.last_sample);
        self.last_sample = now;

        let home_grace = self.phase.is_home_grace();
        let mut oracle = FilterOracle(&mut self.filter);
        let outcome = self.table.update(observed, now, home_grace, &mut oracle);
        let credited = self.apply_table_events(&outcome, now);

        let mut dial_changes = 0;
        for encounter in self.table.encounters_mut() {
            if self.counters.on_duration_tick(encounter) {
                dial_changes += 1;
            }
        }

        let occupancy = self.history_count(now);
        let history_columns = self.history.tick(now, occupancy);

        if outcome.report.has_changes() {
            log_event!(
                debug,
                SUBSYSTEM,
                "Cycle complete",
                scan = self.scan_serial,
                new_static = outcome.report.new_static,
                known_static = outcome.report.known_static,
                new_hopper = outcome.report.new_hopper,
                migrated_hopper = outcome.report.migrated_hopper,
                deleted = outcome.report.deleted
            );
        }

        CycleReport {
            scan_serial: self.scan_serial,
            table: outcome.report,
            credited,
            dial_changes,
            history_columns,
        }
    }

    fn snapshot(&self, now: Timestamp) -> EngineSnapshot {
        let window = self.config.active_window;
        let (mut active_home, mut active_other) = (0, 0);
        for (_, encounter) in self.table.encounters() {
            if encounter.is_active(now, window) {
                if encounter.is_exempt {
                    active_home += 1;
                } else {
                    active_other += 1;
                }
            }
        }

        EngineSnapshot {
            active_count: active_home + active_other,
            active_non_exempt_count: active_other,
            active_home_count: active_home,
            live_count: self.table.len(),
            total_unique: self.counters.total_unique(),
            dial_buckets: self.counters.dial_buckets(),
            history_series: self.history.render_series().collect(),
            is_low_power: self.is_low_power,
            phase: self.phase,
            scan_serial: self.scan_serial,
        }
    }

    fn persist(&mut self) -> PersistReport {
        let counters_ok = match self.counters.persist() {
            Ok(_) => true,
            Err(e) => {
                log_event!(warn, SUBSYSTEM, "Unable to save counters", error = %e);
                false
            }
        };
        let home_set_ok = match self.table.persist() {
            Ok(()) => true,
            Err(e) => {
                log_event!(warn, SUBSYSTEM, "Unable to save home devices", error = %e);
                false
            }
        };
        let filter_ok = match self.filter.flush() {
            Ok(()) => true,
            Err(e) => {
                log_event!(warn, SUBSYSTEM, "Unable to flush filter", error = %e);
                false
            }
        };
        let history_ok = self.history.flush();

        let health = self.filter.health();
        log_event!(
            debug,
            SUBSYSTEM,
            "Filter status",
            bits_set = health.bits_set,
            false_positive_rate = health.false_positive_rate,
            checks = health.activity.checks,
            bytes_flushed = health.activity.bytes_flushed,
            full_saves = health.activity.full_saves,
            write_failures = health.activity.write_failures,
            verify_mismatches = health.activity.verify_mismatches
        );

        PersistReport {
            counters_ok,
            home_set_ok,
            filter_ok,
            history_ok,
        }
    }

    fn status_line(&self) -> Option<String> {
        if self.is_low_power {
            return None;
        }
        Some(format!(
            "scan {}: {}/{} contacts t={}",
            self.scan_serial,
            self.table.len(),
            self.counters.total_unique(),
            format_uptime(self.counters.sample_seconds())
        ))
    }
}
