//! # CB-04 History Ring
//!
//! Rolling occupancy history: one 16-bit column per sample period, oldest
//! column overwritten first. Persisted to `historybar.bin` as little-endian
//! `u16` values in logical (oldest first) order.

mod config;
mod error;
mod ring;

pub use config::HistoryConfig;
pub use error::HistoryError;
pub use ring::{HistoryRingBuffer, HistorySeries};
