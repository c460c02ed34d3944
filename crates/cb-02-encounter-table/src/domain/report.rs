//! Per-cycle update results

use shared_types::{AdmissionKind, DeviceAddress};

use super::encounter::{Encounter, EncounterId};

/// Transition counts for one update, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub new_static: usize,
    pub known_static: usize,
    pub new_hopper: usize,
    pub migrated_hopper: usize,
    pub deleted: usize,
}

impl UpdateReport {
    pub fn record(&mut self, kind: AdmissionKind) {
        match kind {
            AdmissionKind::NewStatic => self.new_static += 1,
            AdmissionKind::KnownStatic => self.known_static += 1,
            AdmissionKind::NewHopper => self.new_hopper += 1,
            AdmissionKind::MigratedHopper => self.migrated_hopper += 1,
        }
    }

    /// Whether anything entered or left the table.
    pub fn has_changes(&self) -> bool {
        *self != Self::default()
    }
}

/// Something that happened to the table during an update, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent {
    /// An encounter ended after going unseen past the timeout.
    Deleted {
        address: DeviceAddress,
        encounter: Encounter,
    },

    /// A new encounter was created for `address`.
    Added {
        address: DeviceAddress,
        id: EncounterId,
        kind: AdmissionKind,
        is_new: bool,
        /// Counts toward the unique total.
        credited: bool,
        is_exempt: bool,
    },

    /// A hopper encounter moved from `old_address` to `new_address`.
    Hopped {
        old_address: DeviceAddress,
        new_address: DeviceAddress,
        id: EncounterId,
        is_new: bool,
    },
}

/// Result of [`crate::EncounterTable::update`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateOutcome {
    pub report: UpdateReport,
    pub events: Vec<TableEvent>,
}

impl UpdateOutcome {
    /// Encounters credited as new uniques this cycle.
    pub fn credited(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TableEvent::Added { credited: true, .. }))
            .count()
    }
}
