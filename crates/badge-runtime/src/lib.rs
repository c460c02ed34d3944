//! # Badge Runtime
//!
//! Composition root and cooperative loop for the contact badge.
//!
//! ```text
//!   InputSource ──► DedupEngine::handle_input ──► reset flash
//!   Scanner ──(timeout)──► DedupEngine::update
//!                               │
//!                          snapshot ──► LedRenderer / PanelRenderer
//!                               │
//!                          persist
//! ```
//!
//! The binary wires host-side adapters (seeded crowd simulation, logging
//! outputs) around the engine; board support swaps those for real drivers
//! behind the same [`ports`].

pub mod adapters;
pub mod config;
pub mod ports;
pub mod render;
pub mod scheduler;

pub use config::{BadgeConfig, ConfigError};
pub use scheduler::{BadgeRuntime, Cadence, CycleSummary, LoopSettings};
