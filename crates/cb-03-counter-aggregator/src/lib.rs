//! # CB-03 Counter Aggregator
//!
//! Owns the persisted counters shown on the badge:
//!
//! - `unique_counts`: running total of credited new contacts
//! - `sample_seconds`: total time spent scanning
//! - `5min` / `30min` / `2hour`: dial buckets, one per duration threshold
//!
//! Each non-home encounter sits in at most one dial bucket. When its
//! accumulated duration crosses the next threshold it moves up one bucket
//! (the lower bucket is decremented, floored at zero). The sum of the dial
//! buckets never exceeds `unique_counts`.
//!
//! The record is stored as a flat JSON object in `counter.json`. Loading is a
//! best-effort merge over defaults: missing keys default to zero, unknown keys
//! are ignored and single-quoted legacy records are accepted.

pub mod domain;
pub mod error;
pub mod service;

pub use domain::{CounterConfig, CounterRecord, DialThresholds, DIAL_COUNT};
pub use error::CounterError;
pub use service::CounterAggregator;
