//! Domain layer for the dedup engine

mod config;
mod phase;
mod snapshot;

pub use config::{EngineConfig, DEFAULT_ACTIVE_WINDOW_SECS, DEFAULT_HOME_GRACE_SECS};
pub use phase::{InputState, Phase, ResetDebouncer, DEFAULT_RESET_HOLD_TICKS};
pub use snapshot::{format_uptime, CycleReport, EngineSnapshot, PersistReport};
