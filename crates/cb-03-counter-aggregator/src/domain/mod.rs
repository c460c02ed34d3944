//! Domain layer for the counter aggregator

pub mod config;
pub mod dials;
pub mod record;

pub use config::CounterConfig;
pub use dials::{DialThresholds, DIAL_COUNT};
pub use record::CounterRecord;
