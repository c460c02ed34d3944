//! # Cooperative Scheduler
//!
//! One logical thread of control. Every cycle runs, in this order:
//!
//! 1. poll input (reset gesture, power-saver switch)
//! 2. scan, bounded by the scan timeout; a timeout yields an empty scan
//! 3. dedup update
//! 4. render LEDs and panel (each rate-limited on its own)
//! 5. persist
//! 6. sleep until the next cycle
//!
//! Nothing here returns an error: storage and scan faults are absorbed by the
//! engine and the loop keeps going until shutdown is signalled.

use std::sync::Arc;
use std::time::Duration;

use badge_telemetry::log_event;
use cb_06_dedup_engine::{CycleReport, DedupApi, PersistReport};
use shared_types::{MonotonicClock, Timestamp};
use tokio::sync::watch;
use tokio::time::timeout;

use crate::ports::{InputSource, Rgb, Scanner};
use crate::render::{LedRenderer, PanelRenderer};

const SUBSYSTEM: &str = "runtime";

/// Colour flashed on the strip when a reset fires.
const RESET_FLASH: Rgb = (0, 64, 255);

/// Rate limiter for periodic side effects.
///
/// Due on first check, then once `period` seconds have passed since it last
/// fired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cadence {
    period: f64,
    last: Option<Timestamp>,
}

impl Cadence {
    pub fn new(period: f64) -> Self {
        Self { period, last: None }
    }

    /// Whether the task should run at `now`. Firing restarts the period.
    pub fn is_due(&mut self, now: Timestamp) -> bool {
        let due = match self.last {
            None => true,
            Some(last) => now - last >= self.period,
        };
        if due {
            self.last = Some(now);
        }
        due
    }

    /// Record that the task ran at `now` outside `is_due`.
    pub fn mark(&mut self, now: Timestamp) {
        self.last = Some(now);
    }

    pub fn set_period(&mut self, period: f64) {
        self.period = period;
    }

    pub fn period(&self) -> f64 {
        self.period
    }
}

/// Loop timing and radio settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopSettings {
    pub cycle_period: Duration,
    pub scan_timeout: Duration,
    pub min_rssi: i16,
}

/// What one cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleSummary {
    pub observed: usize,
    pub scan_timed_out: bool,
    pub reset: bool,
    pub report: CycleReport,
    pub persist: PersistReport,
}

/// Drives the engine and peripherals.
pub struct BadgeRuntime<E: DedupApi> {
    engine: E,
    scanner: Box<dyn Scanner>,
    input: Box<dyn InputSource>,
    leds: LedRenderer,
    panel: PanelRenderer,
    clock: Arc<dyn MonotonicClock>,
    settings: LoopSettings,
}

impl<E: DedupApi> BadgeRuntime<E> {
    pub fn new(
        engine: E,
        scanner: Box<dyn Scanner>,
        input: Box<dyn InputSource>,
        leds: LedRenderer,
        panel: PanelRenderer,
        clock: Arc<dyn MonotonicClock>,
        settings: LoopSettings,
    ) -> Self {
        Self {
            engine,
            scanner,
            input,
            leds,
            panel,
            clock,
            settings,
        }
    }

    /// Run one full cycle.
    pub async fn run_cycle(&mut self) -> CycleSummary {
        let input = self.input.poll();
        let reset = self.engine.handle_input(input, self.clock.now());
        if reset {
            self.leds.flash(RESET_FLASH);
        }

        let (observed, scan_timed_out) =
            match timeout(self.settings.scan_timeout, self.scanner.scan(self.settings.min_rssi))
                .await
            {
                Ok(records) => (records, false),
                Err(_) => {
                    log_event!(debug, SUBSYSTEM, "Scan timed out, using empty result");
                    (Vec::new(), true)
                }
            };

        let now = self.clock.now();
        let report = self.engine.update(&observed, now);

        let snapshot = self.engine.snapshot(now);
        self.leds.render(&snapshot);
        self.panel.render(&snapshot, now);

        let persist = self.engine.persist();

        if let Some(status) = self.engine.status_line() {
            log_event!(debug, SUBSYSTEM, "Status", status = %status);
        }

        CycleSummary {
            observed: observed.len(),
            scan_timed_out,
            reset,
            report,
            persist,
        }
    }

    /// Cycle until `shutdown` flips to `true`. Returns the number of cycles.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> u64 {
        log_event!(
            info,
            SUBSYSTEM,
            "Badge loop started",
            cycle_ms = self.settings.cycle_period.as_millis() as u64,
            scan_timeout_ms = self.settings.scan_timeout.as_millis() as u64
        );

        let mut cycles = 0u64;
        loop {
            self.run_cycle().await;
            cycles += 1;

            if *shutdown.borrow() {
                break;
            }
            let sender_gone = tokio::select! {
                _ = tokio::time::sleep(self.settings.cycle_period) => false,
                changed = shutdown.changed() => changed.is_err(),
            };
            if sender_gone || *shutdown.borrow() {
                break;
            }
        }

        let report = self.engine.persist();
        log_event!(
            info,
            SUBSYSTEM,
            "Badge loop stopped",
            cycles = cycles,
            persisted = report.all_ok()
        );
        cycles
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}
