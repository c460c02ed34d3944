//! Cycle phases and the reset gesture

use serde::{Deserialize, Serialize};
use shared_types::Timestamp;

/// Both buttons must be held for more than this many consecutive cycles.
pub const DEFAULT_RESET_HOLD_TICKS: u32 = 3;

/// Where the engine is in its startup / reset lifecycle.
///
/// ```text
/// Startup --first cycle--> HomeGrace --window elapsed--> Steady
///                              ^                           |
///                              +-------- reset held -------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    /// Opened, no cycle run yet.
    Startup,
    /// Every newly seen device is a home device.
    HomeGrace { since: Timestamp },
    /// Normal counting.
    Steady,
}

impl Phase {
    /// Phase in effect at `now` given the grace window length.
    pub fn advance(self, now: Timestamp, grace: f64) -> Phase {
        let phase = match self {
            Phase::Startup => Phase::HomeGrace { since: now },
            other => other,
        };
        match phase {
            Phase::HomeGrace { since } if now - since >= grace => Phase::Steady,
            other => other,
        }
    }

    pub fn is_home_grace(&self) -> bool {
        matches!(self, Phase::HomeGrace { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Startup => "startup",
            Phase::HomeGrace { .. } => "home-grace",
            Phase::Steady => "steady",
        }
    }
}

/// Button and switch levels polled once per cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub low_power: bool,
}

impl InputState {
    pub fn both_buttons(&self) -> bool {
        self.left && self.right
    }
}

/// Counts consecutive cycles with both buttons held.
///
/// Fires once the count exceeds the threshold, then starts counting again,
/// so a long hold fires repeatedly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetDebouncer {
    threshold: u32,
    held: u32,
}

impl Default for ResetDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_RESET_HOLD_TICKS)
    }
}

impl ResetDebouncer {
    pub fn new(threshold: u32) -> Self {
        Self { threshold, held: 0 }
    }

    /// Feed one cycle; returns `true` when a reset should happen.
    pub fn observe(&mut self, both_held: bool) -> bool {
        if !both_held {
            self.held = 0;
            return false;
        }
        self.held += 1;
        if self.held > self.threshold {
            self.held = 0;
            return true;
        }
        false
    }

    pub fn held(&self) -> u32 {
        self.held
    }
}
