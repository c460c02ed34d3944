//! Service layer for the dedup engine

mod engine;
mod oracle;

pub use engine::DedupEngine;
pub use oracle::FilterOracle;
