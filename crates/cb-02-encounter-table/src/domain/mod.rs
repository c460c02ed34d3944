//! Domain layer for the encounter table

pub mod config;
pub mod encounter;
pub mod fingerprint;
pub mod home_set;
pub mod report;

pub use config::TableConfig;
pub use encounter::{Encounter, EncounterId};
pub use fingerprint::Fingerprint;
pub use home_set::HomeDeviceSet;
pub use report::{TableEvent, UpdateOutcome, UpdateReport};
