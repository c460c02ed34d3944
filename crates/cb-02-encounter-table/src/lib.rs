//! # CB-02 Encounter Table
//!
//! Tracks the devices that are around right now.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`)
//!   - `Encounter`: one continuous period of contact with a device
//!   - `Fingerprint`: advertisement-profile digest used to re-link hoppers
//!   - `HomeDeviceSet`: addresses of the wearer's own devices
//!   - `UpdateReport` / `TableEvent`: per-cycle results
//!
//! - **Ports Layer** (`ports/`)
//!   - `NoveltyOracle`: driven port answering "first sighting ever?"
//!
//! - **Service Layer** (`service/`)
//!   - `EncounterTable`: per-cycle update, eviction, hopper migration and
//!     home-device exemption
//!
//! ## Hopper re-linking
//!
//! Devices with rotating private addresses cannot be keyed by address. When
//! a hopper address appears that has no live encounter, the table looks for
//! an unseen-but-not-expired encounter with an identical fingerprint and, if
//! one exists, moves it to the new address. The first candidate in address
//! order wins; devices sharing an advertisement profile can be confused.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{
    Encounter, EncounterId, Fingerprint, HomeDeviceSet, TableConfig, TableEvent,
    UpdateOutcome, UpdateReport,
};
pub use error::TableError;
pub use ports::NoveltyOracle;
pub use service::EncounterTable;
