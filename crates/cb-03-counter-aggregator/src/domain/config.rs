//! Counter aggregator configuration

use super::dials::DialThresholds;
use crate::error::CounterError;

/// Counter aggregator configuration
#[derive(Clone, Debug, PartialEq)]
pub struct CounterConfig {
    /// Key of the persisted record
    pub store_key: String,
    /// Dial duration thresholds
    pub thresholds: DialThresholds,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            store_key: "counter.json".to_string(),
            thresholds: DialThresholds::default(),
        }
    }
}

impl CounterConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), CounterError> {
        if self.store_key.trim().is_empty() {
            return Err(CounterError::InvalidConfig(
                "store_key cannot be empty".to_string(),
            ));
        }
        if !self.thresholds.is_ascending() {
            return Err(CounterError::InvalidConfig(format!(
                "dial thresholds must be positive and ascending: {:?}",
                self.thresholds.0
            )));
        }
        Ok(())
    }

    /// Builder-style method to set thresholds
    pub fn with_thresholds(mut self, thresholds: [f64; 3]) -> Self {
        self.thresholds = DialThresholds(thresholds);
        self
    }
}
