//! Error types for the dedup engine

use cb_01_membership_filter::FilterError;
use cb_02_encounter_table::TableError;
use cb_03_counter_aggregator::CounterError;
use cb_04_history_ring::HistoryError;
use thiserror::Error;

/// Errors raised while assembling the engine.
///
/// Once open, the engine absorbs persistence failures and never returns
/// these from a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Membership filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("Encounter table error: {0}")]
    Table(#[from] TableError),

    #[error("Counter error: {0}")]
    Counter(#[from] CounterError),

    #[error("History error: {0}")]
    History(#[from] HistoryError),

    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),
}
