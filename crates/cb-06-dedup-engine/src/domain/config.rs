//! Engine configuration

use cb_01_membership_filter::FilterConfig;
use cb_02_encounter_table::TableConfig;
use cb_03_counter_aggregator::CounterConfig;
use cb_04_history_ring::HistoryConfig;

use super::phase::DEFAULT_RESET_HOLD_TICKS;
use crate::error::EngineError;

/// Length of the home-grace window after startup or reset.
pub const DEFAULT_HOME_GRACE_SECS: f64 = 2.0 * 60.0;

/// Encounters seen within this many seconds count as active.
pub const DEFAULT_ACTIVE_WINDOW_SECS: f64 = 60.0;

/// Dedup engine configuration, including every owned subsystem.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub filter: FilterConfig,
    pub table: TableConfig,
    pub counters: CounterConfig,
    pub history: HistoryConfig,
    /// Home-grace window in seconds (0 disables it)
    pub home_grace: f64,
    /// Active window for the snapshot counts
    pub active_window: f64,
    /// Consecutive both-button cycles that must be exceeded to reset
    pub reset_hold_ticks: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            table: TableConfig::default(),
            counters: CounterConfig::default(),
            history: HistoryConfig::default(),
            home_grace: DEFAULT_HOME_GRACE_SECS,
            active_window: DEFAULT_ACTIVE_WINDOW_SECS,
            reset_hold_ticks: DEFAULT_RESET_HOLD_TICKS,
        }
    }
}

impl EngineConfig {
    /// Validate this configuration and every subsystem configuration.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.filter.validate()?;
        self.table.validate()?;
        self.counters.validate()?;
        self.history.validate()?;

        if !(self.home_grace.is_finite() && self.home_grace >= 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "home_grace must be non-negative, got {}",
                self.home_grace
            )));
        }
        if !(self.active_window.is_finite() && self.active_window > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "active_window must be positive, got {}",
                self.active_window
            )));
        }
        Ok(())
    }

    /// Builder-style method to set the home-grace window
    pub fn with_home_grace(mut self, secs: f64) -> Self {
        self.home_grace = secs;
        self
    }

    /// Builder-style method to set the end-of-encounter timeout
    pub fn with_encounter_timeout(mut self, secs: f64) -> Self {
        self.table = self.table.with_encounter_timeout(secs);
        self
    }

    /// Builder-style method to set the dial thresholds
    pub fn with_dial_thresholds(mut self, thresholds: [f64; 3]) -> Self {
        self.counters = self.counters.with_thresholds(thresholds);
        self
    }

    /// Builder-style method to set the history sample period
    pub fn with_sample_period(mut self, secs: f64) -> Self {
        self.history = self.history.with_sample_period(secs);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_device_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.home_grace, 120.0);
        assert_eq!(config.active_window, 60.0);
        assert_eq!(config.reset_hold_ticks, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_subsystem_errors_surface() {
        let config = EngineConfig::default().with_encounter_timeout(-1.0);
        assert!(matches!(config.validate(), Err(EngineError::Table(_))));

        let config = EngineConfig::default().with_dial_thresholds([10.0, 10.0, 20.0]);
        assert!(matches!(config.validate(), Err(EngineError::Counter(_))));
    }

    #[test]
    fn test_zero_grace_allowed_negative_rejected() {
        assert!(EngineConfig::default().with_home_grace(0.0).validate().is_ok());
        assert!(matches!(
            EngineConfig::default().with_home_grace(-5.0).validate(),
            Err(EngineError::InvalidConfig(_))
        ));
    }
}
