//! Encounter table configuration

use crate::error::TableError;

/// Seconds a device may go unseen before its encounter ends.
pub const DEFAULT_ENCOUNTER_TIMEOUT_SECS: f64 = 5.0 * 60.0;

/// Encounter table configuration
#[derive(Clone, Debug, PartialEq)]
pub struct TableConfig {
    /// End-of-encounter timeout in seconds
    pub encounter_timeout: f64,
    /// Key of the persisted home-device set
    pub home_store_key: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            encounter_timeout: DEFAULT_ENCOUNTER_TIMEOUT_SECS,
            home_store_key: "home_devices.bin".to_string(),
        }
    }
}

impl TableConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), TableError> {
        if !(self.encounter_timeout.is_finite() && self.encounter_timeout > 0.0) {
            return Err(TableError::InvalidConfig(format!(
                "encounter_timeout must be positive, got {}",
                self.encounter_timeout
            )));
        }
        if self.home_store_key.trim().is_empty() {
            return Err(TableError::InvalidConfig(
                "home_store_key cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Builder-style method to set the timeout
    pub fn with_encounter_timeout(mut self, secs: f64) -> Self {
        self.encounter_timeout = secs;
        self
    }
}
