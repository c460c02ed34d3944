//! Inbound Ports (Driving Ports)
//!
//! What the runtime scheduler drives once per cycle.

use shared_types::{ObservedRecord, Timestamp};

use crate::domain::{CycleReport, EngineSnapshot, InputState, PersistReport};

/// Primary dedup engine API (Driving Port)
pub trait DedupApi {
    /// Apply the polled buttons and switch. Returns `true` when a reset ran.
    fn handle_input(&mut self, input: InputState, now: Timestamp) -> bool;

    /// Consume one scan result.
    fn update(&mut self, observed: &[ObservedRecord], now: Timestamp) -> CycleReport;

    /// Read-only view for renderers.
    fn snapshot(&self, now: Timestamp) -> EngineSnapshot;

    /// Write every store with pending changes. Failures are retried next call.
    fn persist(&mut self) -> PersistReport;

    /// One-line status for the debug console, `None` in low-power mode.
    fn status_line(&self) -> Option<String>;
}
