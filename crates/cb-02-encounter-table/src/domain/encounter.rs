//! Encounter entity

use serde::{Deserialize, Serialize};
use shared_types::Timestamp;
use std::fmt;

use super::fingerprint::Fingerprint;

/// Stable identity of an encounter, kept across hopper migrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EncounterId(pub u64);

impl fmt::Display for EncounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "enc#{}", self.0)
    }
}

/// One continuous period of contact with a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    pub id: EncounterId,
    /// When the contact started.
    pub first_seen: Timestamp,
    /// Last cycle the device (or its hopper successor) was observed.
    pub last_seen: Timestamp,
    /// Integrated presence time in seconds.
    pub accumulated_duration: f64,
    /// First contact ever with this device.
    pub is_newly_unique: bool,
    /// Present only for hoppers.
    pub fingerprint: Option<Fingerprint>,
    /// Home device; never counted or shown.
    pub is_exempt: bool,
    /// Duration last compared against the dial thresholds.
    pub last_known_duration_dial: f64,
}

impl Encounter {
    /// Start an encounter observed at `now`.
    pub fn new(
        id: EncounterId,
        now: Timestamp,
        is_newly_unique: bool,
        fingerprint: Option<Fingerprint>,
    ) -> Self {
        Self {
            id,
            first_seen: now,
            last_seen: now,
            accumulated_duration: 0.0,
            is_newly_unique,
            fingerprint,
            is_exempt: false,
            last_known_duration_dial: 0.0,
        }
    }

    /// Record a sighting at `now`, `elapsed` seconds after the previous cycle.
    pub fn observe(&mut self, now: Timestamp, elapsed: f64) {
        self.last_seen = now;
        self.accumulated_duration += elapsed.max(0.0);
    }

    pub fn is_hopper(&self) -> bool {
        self.fingerprint.is_some()
    }

    /// Unseen for strictly longer than `timeout` seconds.
    pub fn is_expired(&self, now: Timestamp, timeout: f64) -> bool {
        now > self.last_seen + timeout
    }

    /// Seen within the last `window` seconds.
    pub fn is_active(&self, now: Timestamp, window: f64) -> bool {
        now - self.last_seen < window
    }
}
