//! # CB-06 Dedup Engine
//!
//! Composition root for the contact badge core. One `DedupEngine` owns the
//! membership filter, encounter table, counter aggregator and history ring,
//! and emits contact events to an injected `EventSink`.
//!
//! ## Cycle
//!
//! ```text
//! handle_input ─► update(scan, now) ─► snapshot(now) ─► persist()
//!                   │
//!                   ├─ sample time
//!                   ├─ EncounterTable::update (filter as novelty oracle)
//!                   ├─ credit uniques, emit add / hop / del
//!                   ├─ dial migration for every live encounter
//!                   └─ history tick with the non-home occupancy
//! ```
//!
//! ## Phases
//!
//! `Startup` becomes `HomeGrace` on the first cycle; after the grace window
//! the engine runs `Steady`. Holding both buttons for more than three cycles
//! resets the filter, table and counters in one call and re-enters
//! `HomeGrace`.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{
    format_uptime, CycleReport, EngineConfig, EngineSnapshot, InputState, Phase, PersistReport,
    ResetDebouncer,
};
pub use error::EngineError;
pub use ports::DedupApi;
pub use service::{DedupEngine, FilterOracle};
