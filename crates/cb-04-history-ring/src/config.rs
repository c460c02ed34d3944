use crate::error::HistoryError;

/// History ring configuration
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryConfig {
    /// Number of columns kept
    pub columns: usize,
    /// Seconds per column
    pub sample_period: f64,
    /// Key of the persisted ring
    pub store_key: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            columns: 120,
            sample_period: 60.0,
            store_key: "historybar.bin".to_string(),
        }
    }
}

impl HistoryConfig {
    pub fn validate(&self) -> Result<(), HistoryError> {
        if self.columns == 0 {
            return Err(HistoryError::InvalidConfig(
                "columns cannot be 0".to_string(),
            ));
        }
        if !(self.sample_period.is_finite() && self.sample_period > 0.0) {
            return Err(HistoryError::InvalidConfig(format!(
                "sample_period must be positive, got {}",
                self.sample_period
            )));
        }
        if self.store_key.trim().is_empty() {
            return Err(HistoryError::InvalidConfig(
                "store_key cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Size of the persisted image in bytes.
    pub fn image_len(&self) -> usize {
        self.columns * 2
    }

    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_sample_period(mut self, secs: f64) -> Self {
        self.sample_period = secs;
        self
    }
}
