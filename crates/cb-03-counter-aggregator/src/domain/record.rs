//! Persisted counter record

use serde::{Deserialize, Serialize};

use super::dials::DIAL_COUNT;
use crate::error::CounterError;

/// Flat key/value counter record stored in `counter.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterRecord {
    /// Running total of credited unique contacts
    pub unique_counts: u64,
    /// Seconds spent sampling
    pub sample_seconds: f64,
    #[serde(rename = "5min")]
    pub five_min: u64,
    #[serde(rename = "30min")]
    pub thirty_min: u64,
    #[serde(rename = "2hour")]
    pub two_hour: u64,
}

impl CounterRecord {
    /// Parse a stored record.
    ///
    /// Accepts JSON as well as the older single-quoted dictionary text.
    pub fn parse(text: &str) -> Result<Self, CounterError> {
        match serde_json::from_str(text) {
            Ok(record) => Ok(record),
            Err(first) => {
                let normalized = text.replace('\'', "\"");
                serde_json::from_str(&normalized)
                    .map_err(|_| CounterError::Parse(first.to_string()))
            }
        }
    }

    pub fn to_json(&self) -> Result<String, CounterError> {
        serde_json::to_string(self).map_err(|e| CounterError::Parse(e.to_string()))
    }

    /// Dial buckets in threshold order.
    pub fn dials(&self) -> [u64; DIAL_COUNT] {
        [self.five_min, self.thirty_min, self.two_hour]
    }

    pub fn dial_mut(&mut self, index: usize) -> Option<&mut u64> {
        match index {
            0 => Some(&mut self.five_min),
            1 => Some(&mut self.thirty_min),
            2 => Some(&mut self.two_hour),
            _ => None,
        }
    }

    pub fn dial_sum(&self) -> u64 {
        self.dials().iter().sum()
    }
}
