//! # Shared Types Crate
//!
//! Domain entities, contact events and port traits shared across the badge
//! subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type that crosses a crate boundary is
//!   defined here.
//! - **Ports, not singletons**: storage and time are reached through the
//!   [`ByteStore`] and [`MonotonicClock`] traits, injected by the composition
//!   root.

pub mod entities;
pub mod errors;
pub mod events;
pub mod ports;

pub use entities::*;
pub use errors::*;
pub use events::*;
pub use ports::*;
