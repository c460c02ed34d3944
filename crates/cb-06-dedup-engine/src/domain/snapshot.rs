//! Read-only views handed to renderers and diagnostics

use cb_02_encounter_table::UpdateReport;
use cb_03_counter_aggregator::DIAL_COUNT;
use serde::{Deserialize, Serialize};

use super::phase::Phase;

/// Display-relevant state after a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Encounters seen within the active window
    pub active_count: usize,
    /// Of those, the ones that are not home devices
    pub active_non_exempt_count: usize,
    /// Of those, the home devices
    pub active_home_count: usize,
    /// Live encounters regardless of recency
    pub live_count: usize,
    pub total_unique: u64,
    pub dial_buckets: [u64; DIAL_COUNT],
    /// `(age, count)` columns, oldest first
    pub history_series: Vec<(usize, u16)>,
    pub is_low_power: bool,
    pub phase: Phase,
    pub scan_serial: u64,
}

impl EngineSnapshot {
    /// Tallest history column.
    pub fn history_max(&self) -> u16 {
        self.history_series
            .iter()
            .map(|&(_, count)| count)
            .max()
            .unwrap_or(0)
    }
}

/// What happened during one `update`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub scan_serial: u64,
    pub table: UpdateReport,
    /// New uniques added to the total
    pub credited: usize,
    /// Encounters that moved dial bucket
    pub dial_changes: usize,
    /// History columns written
    pub history_columns: usize,
}

/// Which stores were written cleanly by `persist`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistReport {
    pub counters_ok: bool,
    pub home_set_ok: bool,
    pub filter_ok: bool,
    pub history_ok: bool,
}

impl PersistReport {
    pub fn all_ok(&self) -> bool {
        self.counters_ok && self.home_set_ok && self.filter_ok && self.history_ok
    }
}

/// `{d}d {h}h {m}m {s}s` for a number of seconds, truncated.
pub fn format_uptime(seconds: f64) -> String {
    let t = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let days = t / 86_400;
    let hours = (t / 3_600) % 24;
    let minutes = (t / 60) % 60;
    let secs = t % 60;
    format!("{days}d {hours}h {minutes}m {secs}s")
}
