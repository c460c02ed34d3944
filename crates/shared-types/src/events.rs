//! # Contact Events
//!
//! Discrete, append-only events emitted by the deduplication core for the
//! contact log.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::{DeviceAddress, Timestamp};

/// How an address entered the live encounter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdmissionKind {
    /// Stable address the membership filter had never seen.
    NewStatic,
    /// Stable address already known to the filter (or a home device).
    KnownStatic,
    /// Rotating address with no matching prior encounter.
    NewHopper,
    /// Rotating address re-linked to a prior encounter by fingerprint.
    MigratedHopper,
}

impl fmt::Display for AdmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AdmissionKind::NewStatic => "new static",
            AdmissionKind::KnownStatic => "known static",
            AdmissionKind::NewHopper => "new hopper",
            AdmissionKind::MigratedHopper => "migrated hopper",
        };
        f.write_str(label)
    }
}

/// An event destined for the contact log.
///
/// Every variant carries the time it happened and the running unique total
/// at that moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContactEvent {
    /// The engine finished loading persisted state.
    Startup { at: Timestamp, total_unique: u64 },

    /// An address entered the encounter table.
    Add {
        at: Timestamp,
        total_unique: u64,
        address: DeviceAddress,
        is_new: bool,
        kind: AdmissionKind,
    },

    /// A hopper encounter continued under a new address.
    Hop {
        at: Timestamp,
        total_unique: u64,
        old_address: DeviceAddress,
        new_address: DeviceAddress,
        is_new: bool,
    },

    /// An encounter ended after going unseen past the timeout.
    Delete {
        at: Timestamp,
        total_unique: u64,
        address: DeviceAddress,
        is_new: bool,
        first_seen: Timestamp,
        last_seen: Timestamp,
        duration: f64,
    },
}

impl ContactEvent {
    /// Short event tag used as the first column of a log line.
    pub fn tag(&self) -> &'static str {
        match self {
            ContactEvent::Startup { .. } => "startup",
            ContactEvent::Add { .. } => "add",
            ContactEvent::Hop { .. } => "hop",
            ContactEvent::Delete { .. } => "del",
        }
    }

    /// Running unique total carried by the event.
    pub fn total_unique(&self) -> u64 {
        match self {
            ContactEvent::Startup { total_unique, .. }
            | ContactEvent::Add { total_unique, .. }
            | ContactEvent::Hop { total_unique, .. }
            | ContactEvent::Delete { total_unique, .. } => *total_unique,
        }
    }
}
