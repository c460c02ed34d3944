//! Encounter table service
//!
//! One `update` per scan cycle:
//!
//! 1. Encounters whose address is in the scan are refreshed.
//! 2. Unseen encounters past the timeout are evicted; unseen hoppers still
//!    inside the timeout become re-link candidates.
//! 3. Addresses with no live encounter are admitted: hoppers first try to
//!    take over a candidate with an equal fingerprint, statics consult the
//!    novelty oracle and the home-device set.
//! 4. Home-device exemption is applied to everything admitted.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use badge_telemetry::log_event;
use shared_types::{AdmissionKind, ByteStore, DeviceAddress, ObservedRecord, Timestamp};

use crate::domain::{
    Encounter, EncounterId, Fingerprint, HomeDeviceSet, TableConfig, TableEvent, UpdateOutcome,
};
use crate::error::TableError;
use crate::ports::NoveltyOracle;

const SUBSYSTEM: &str = "cb-02";

/// Live mapping of currently-seen addresses to encounters.
pub struct EncounterTable {
    config: TableConfig,
    store: Arc<dyn ByteStore>,
    encounters: BTreeMap<DeviceAddress, Encounter>,
    home: HomeDeviceSet,
    home_dirty: bool,
    next_id: u64,
    last_update: Timestamp,
}

impl EncounterTable {
    /// Create an empty table and load the persisted home-device set.
    ///
    /// A missing or corrupt home file yields an empty set.
    pub fn open(
        config: TableConfig,
        store: Arc<dyn ByteStore>,
        now: Timestamp,
    ) -> Result<Self, TableError> {
        config.validate()?;

        let mut table = Self {
            config,
            store,
            encounters: BTreeMap::new(),
            home: HomeDeviceSet::new(),
            home_dirty: false,
            next_id: 0,
            last_update: now,
        };
        table.load_home_set();
        Ok(table)
    }

    fn load_home_set(&mut self) {
        let key = &self.config.home_store_key;
        let loaded = self
            .store
            .read(key)
            .map_err(TableError::from)
            .and_then(|bytes| HomeDeviceSet::from_bytes(&bytes));

        match loaded {
            Ok(home) => {
                log_event!(info, SUBSYSTEM, "Loaded home devices", count = home.len());
                self.home = home;
            }
            Err(TableError::Storage(e)) if e.is_not_found() => {
                log_event!(debug, SUBSYSTEM, "No home device file");
            }
            Err(e) => {
                log_event!(warn, SUBSYSTEM, "Unable to load home devices", error = %e);
                self.home.clear();
                self.home_dirty = true;
            }
        }
    }

    /// Apply one scan cycle.
    ///
    /// `home_grace` marks the startup/reset window during which every newly
    /// admitted device is treated as a home device. Duplicate addresses in
    /// `observed` keep their first occurrence.
    pub fn update(
        &mut self,
        observed: &[ObservedRecord],
        now: Timestamp,
        home_grace: bool,
        oracle: &mut dyn NoveltyOracle,
    ) -> UpdateOutcome {
        let elapsed = (now - self.last_update).max(0.0);
        let mut outcome = UpdateOutcome::default();

        let mut seen = BTreeSet::new();
        let scan: Vec<&ObservedRecord> = observed
            .iter()
            .filter(|record| seen.insert(record.address))
            .collect();
        let by_address: BTreeMap<DeviceAddress, &ObservedRecord> =
            scan.iter().map(|record| (record.address, *record)).collect();

        // Refresh, evict, collect re-link candidates.
        let timeout = self.config.encounter_timeout;
        let mut expired = Vec::new();
        let mut candidates = Vec::new();
        for (address, encounter) in self.encounters.iter_mut() {
            if let Some(record) = by_address.get(address) {
                encounter.observe(now, elapsed);
                if encounter.fingerprint.is_some() {
                    encounter.fingerprint = Some(Fingerprint::from_record(record));
                }
            } else if encounter.is_expired(now, timeout) {
                expired.push(*address);
            } else if encounter.fingerprint.is_some() {
                candidates.push(*address);
            }
        }

        for address in expired {
            if let Some(encounter) = self.encounters.remove(&address) {
                log_event!(
                    debug,
                    SUBSYSTEM,
                    "Encounter ended",
                    address = %address,
                    duration = encounter.accumulated_duration
                );
                outcome.report.deleted += 1;
                outcome.events.push(TableEvent::Deleted { address, encounter });
            }
        }

        // Admit addresses with no live encounter, in scan order.
        for record in scan {
            let address = record.address;
            if self.encounters.contains_key(&address) {
                continue;
            }

            let (mut encounter, kind, credited) = if record.is_hopper() {
                let fingerprint = Fingerprint::from_record(record);
                match self.take_candidate(&mut candidates, &fingerprint) {
                    Some((old_address, mut encounter)) => {
                        encounter.observe(now, elapsed);
                        encounter.fingerprint = Some(fingerprint);
                        outcome.events.push(TableEvent::Hopped {
                            old_address,
                            new_address: address,
                            id: encounter.id,
                            is_new: encounter.is_newly_unique,
                        });
                        (encounter, AdmissionKind::MigratedHopper, false)
                    }
                    None => {
                        let encounter = Encounter::new(self.next_id(), now, true, Some(fingerprint));
                        (encounter, AdmissionKind::NewHopper, !home_grace)
                    }
                }
            } else {
                let novel = oracle.first_sighting(&address) && !self.home.contains(&address);
                let kind = if novel {
                    AdmissionKind::NewStatic
                } else {
                    AdmissionKind::KnownStatic
                };
                let encounter = Encounter::new(self.next_id(), now, novel, None);
                (encounter, kind, novel && !home_grace)
            };

            if home_grace {
                encounter.is_exempt = true;
                if !record.is_hopper() && self.home.insert(address) {
                    self.home_dirty = true;
                }
            } else if self.home.contains(&address) {
                encounter.is_exempt = true;
            }

            outcome.report.record(kind);
            if kind != AdmissionKind::MigratedHopper {
                outcome.events.push(TableEvent::Added {
                    address,
                    id: encounter.id,
                    kind,
                    is_new: encounter.is_newly_unique,
                    credited,
                    is_exempt: encounter.is_exempt,
                });
            }
            self.encounters.insert(address, encounter);
        }

        self.last_update = now;
        outcome
    }

    /// Remove and return the first candidate whose fingerprint equals `fingerprint`.
    fn take_candidate(
        &mut self,
        candidates: &mut Vec<DeviceAddress>,
        fingerprint: &Fingerprint,
    ) -> Option<(DeviceAddress, Encounter)> {
        let index = candidates.iter().position(|candidate| {
            self.encounters
                .get(candidate)
                .and_then(|e| e.fingerprint.as_ref())
                == Some(fingerprint)
        })?;
        let old_address = candidates.remove(index);
        self.encounters
            .remove(&old_address)
            .map(|encounter| (old_address, encounter))
    }

    fn next_id(&mut self) -> EncounterId {
        self.next_id += 1;
        EncounterId(self.next_id)
    }

    /// Write the home-device set if it changed.
    pub fn persist(&mut self) -> Result<(), TableError> {
        if !self.home_dirty {
            return Ok(());
        }
        self.store
            .write(&self.config.home_store_key, &self.home.to_bytes())?;
        self.home_dirty = false;
        log_event!(debug, SUBSYSTEM, "Saved home devices", count = self.home.len());
        Ok(())
    }

    /// Drop every encounter and the home-device set.
    ///
    /// The cleared home set is persisted immediately; on failure it stays
    /// dirty and is retried by [`Self::persist`].
    pub fn clear(&mut self, now: Timestamp) -> Result<(), TableError> {
        self.encounters.clear();
        self.home.clear();
        self.home_dirty = true;
        self.last_update = now;
        self.persist()
    }

    pub fn get(&self, address: &DeviceAddress) -> Option<&Encounter> {
        self.encounters.get(address)
    }

    /// Live encounters in address order.
    pub fn encounters(&self) -> impl Iterator<Item = (&DeviceAddress, &Encounter)> {
        self.encounters.iter()
    }

    /// Mutable access for per-cycle duration bookkeeping.
    pub fn encounters_mut(&mut self) -> impl Iterator<Item = &mut Encounter> {
        self.encounters.values_mut()
    }

    pub fn len(&self) -> usize {
        self.encounters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encounters.is_empty()
    }

    pub fn home_set(&self) -> &HomeDeviceSet {
        &self.home
    }

    pub fn has_pending_writes(&self) -> bool {
        self.home_dirty
    }

    pub fn last_update(&self) -> Timestamp {
        self.last_update
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_storage::InMemoryByteStore;
    use shared_types::AddressKind;
    use std::collections::HashSet;

    /// Oracle that reports each address new exactly once.
    #[derive(Default)]
    struct SetOracle(HashSet<DeviceAddress>);

    impl NoveltyOracle for SetOracle {
        fn first_sighting(&mut self, address: &DeviceAddress) -> bool {
            self.0.insert(*address)
        }
    }

    fn static_rec(n: u8) -> ObservedRecord {
        ObservedRecord::new(DeviceAddress::new([n, 0, 0, 0, 0, 0xC0]), AddressKind::Public, -50)
    }

    fn hopper_rec(n: u8, field_len: usize) -> ObservedRecord {
        ObservedRecord::new(
            DeviceAddress::new([n, 0x11, 0x22, 0x33, 0x44, 0x55]),
            AddressKind::RandomPrivateResolvable,
            -60,
        )
        .with_field(0x01, vec![0x1A])
        .with_field(0xFF, vec![0u8; field_len])
    }

    fn table(store: &Arc<InMemoryByteStore>) -> EncounterTable {
        EncounterTable::open(TableConfig::default(), store.clone(), 0.0).unwrap()
    }

    fn deletions(outcome: &UpdateOutcome) -> Vec<DeviceAddress> {
        outcome
            .events
            .iter()
            .filter_map(|e| match e {
                TableEvent::Deleted { address, .. } => Some(*address),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_new_statics_are_credited_outside_grace() {
        let store = Arc::new(InMemoryByteStore::new());
        let mut table = table(&store);
        let mut oracle = SetOracle::default();
        let scan: Vec<_> = (1..=5).map(static_rec).collect();

        let outcome = table.update(&scan, 200.0, false, &mut oracle);

        assert_eq!(outcome.report.new_static, 5);
        assert_eq!(outcome.credited(), 5);
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_known_static_not_credited() {
        let store = Arc::new(InMemoryByteStore::new());
        let mut table = table(&store);
        let mut never_new = |_: &DeviceAddress| false;

        let outcome = table.update(&[static_rec(1)], 200.0, false, &mut never_new);

        assert_eq!(outcome.report.known_static, 1);
        assert_eq!(outcome.credited(), 0);
        assert!(!table.get(&static_rec(1).address).unwrap().is_newly_unique);
    }

    #[test]
    fn test_observed_encounter_accumulates_duration() {
        let store = Arc::new(InMemoryByteStore::new());
        let mut table = table(&store);
        let mut oracle = SetOracle::default();
        let a = static_rec(1);

        table.update(&[a.clone()], 10.0, false, &mut oracle);
        table.update(&[a.clone()], 11.0, false, &mut oracle);
        let outcome = table.update(&[a.clone()], 13.5, false, &mut oracle);

        assert!(!outcome.report.has_changes(), "refresh is not a transition");
        let enc = table.get(&a.address).unwrap();
        assert_eq!(enc.first_seen, 10.0);
        assert_eq!(enc.last_seen, 13.5);
        assert_eq!(enc.accumulated_duration, 3.5);
    }

    #[test]
    fn test_unseen_encounter_evicted_after_timeout_once() {
        let store = Arc::new(InMemoryByteStore::new());
        let mut table = table(&store);
        let mut oracle = SetOracle::default();
        let a = static_rec(1);

        table.update(&[a.clone()], 10.0, false, &mut oracle);

        let outcome = table.update(&[], 310.0, false, &mut oracle);
        assert!(deletions(&outcome).is_empty(), "exactly at timeout stays");

        let outcome = table.update(&[], 311.0, false, &mut oracle);
        assert_eq!(deletions(&outcome), vec![a.address]);
        assert_eq!(outcome.report.deleted, 1);
        assert!(table.is_empty());

        let outcome = table.update(&[], 400.0, false, &mut oracle);
        assert!(deletions(&outcome).is_empty(), "no second deletion");
    }

    #[test]
    fn test_hopper_migrates_on_matching_fingerprint() {
        let store = Arc::new(InMemoryByteStore::new());
        let mut table = table(&store);
        let mut oracle = SetOracle::default();
        let old = hopper_rec(1, 20);
        let new = hopper_rec(2, 20);

        let first = table.update(&[old.clone()], 10.0, false, &mut oracle);
        assert_eq!(first.report.new_hopper, 1);
        assert_eq!(first.credited(), 1);
        let id = table.get(&old.address).unwrap().id;

        let outcome = table.update(&[new.clone()], 12.0, false, &mut oracle);

        assert_eq!(outcome.report.migrated_hopper, 1);
        assert_eq!(outcome.credited(), 0, "migration gives no credit");
        assert_eq!(
            outcome.events,
            vec![TableEvent::Hopped {
                old_address: old.address,
                new_address: new.address,
                id,
                is_new: true,
            }]
        );
        assert!(table.get(&old.address).is_none());
        let moved = table.get(&new.address).unwrap();
        assert_eq!(moved.id, id, "identity continues");
        assert_eq!(moved.first_seen, 10.0);
        assert_eq!(moved.accumulated_duration, 2.0);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_hopper_with_different_profile_is_new() {
        let store = Arc::new(InMemoryByteStore::new());
        let mut table = table(&store);
        let mut oracle = SetOracle::default();

        table.update(&[hopper_rec(1, 20)], 10.0, false, &mut oracle);
        let outcome = table.update(&[hopper_rec(2, 21)], 12.0, false, &mut oracle);

        assert_eq!(outcome.report.new_hopper, 1);
        assert_eq!(outcome.report.migrated_hopper, 0);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_seen_hopper_is_not_a_candidate() {
        let store = Arc::new(InMemoryByteStore::new());
        let mut table = table(&store);
        let mut oracle = SetOracle::default();

        table.update(&[hopper_rec(1, 20)], 10.0, false, &mut oracle);
        let outcome = table.update(&[hopper_rec(1, 20), hopper_rec(2, 20)], 12.0, false, &mut oracle);

        assert_eq!(outcome.report.new_hopper, 1);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_expired_hopper_cannot_be_migrated() {
        let store = Arc::new(InMemoryByteStore::new());
        let mut table = table(&store);
        let mut oracle = SetOracle::default();

        table.update(&[hopper_rec(1, 20)], 10.0, false, &mut oracle);
        let outcome = table.update(&[hopper_rec(2, 20)], 400.0, false, &mut oracle);

        assert_eq!(outcome.report.deleted, 1);
        assert_eq!(outcome.report.new_hopper, 1);
    }

    #[test]
    fn test_first_candidate_in_address_order_wins() {
        let store = Arc::new(InMemoryByteStore::new());
        let mut table = table(&store);
        let mut oracle = SetOracle::default();

        table.update(&[hopper_rec(9, 20), hopper_rec(3, 20)], 10.0, false, &mut oracle);
        let outcome = table.update(&[hopper_rec(5, 20)], 11.0, false, &mut oracle);

        match &outcome.events[..] {
            [TableEvent::Hopped { old_address, .. }] => {
                assert_eq!(*old_address, hopper_rec(3, 20).address)
            }
            other => panic!("expected one hop, got {:?}", other),
        }
        assert!(table.get(&hopper_rec(9, 20).address).is_some());
    }

    #[test]
    fn test_hopper_fingerprint_refreshed_while_observed() {
        let store = Arc::new(InMemoryByteStore::new());
        let mut table = table(&store);
        let mut oracle = SetOracle::default();

        table.update(&[hopper_rec(1, 20)], 10.0, false, &mut oracle);
        table.update(&[hopper_rec(1, 24)], 11.0, false, &mut oracle);

        // New profile matches the refreshed fingerprint, not the original.
        let outcome = table.update(&[hopper_rec(2, 24)], 12.0, false, &mut oracle);
        assert_eq!(outcome.report.migrated_hopper, 1);
    }

    #[test]
    fn test_grace_window_marks_home_devices() {
        let store = Arc::new(InMemoryByteStore::new());
        let mut table = table(&store);
        let mut oracle = SetOracle::default();
        let home = static_rec(1);
        let hopper = hopper_rec(2, 20);

        let outcome = table.update(&[home.clone(), hopper.clone()], 5.0, true, &mut oracle);

        assert_eq!(outcome.credited(), 0, "nothing credited during grace");
        assert!(table.get(&home.address).unwrap().is_exempt);
        assert!(table.get(&hopper.address).unwrap().is_exempt);
        assert!(table.home_set().contains(&home.address));
        assert!(!table.home_set().contains(&hopper.address), "hoppers never stored");
    }

    #[test]
    fn test_home_device_exempt_after_grace() {
        let store = Arc::new(InMemoryByteStore::new());
        let mut table = table(&store);
        let mut oracle = SetOracle::default();
        let home = static_rec(1);

        table.update(&[home.clone()], 5.0, true, &mut oracle);
        table.update(&[], 400.0, false, &mut oracle);

        let outcome = table.update(&[home.clone()], 401.0, false, &mut oracle);
        assert_eq!(outcome.report.known_static, 1);
        assert!(table.get(&home.address).unwrap().is_exempt);
    }

    #[test]
    fn test_home_set_persists_across_open() {
        let store = Arc::new(InMemoryByteStore::new());
        let mut first = table(&store);
        let mut oracle = SetOracle::default();
        first.update(&[static_rec(1), static_rec(2)], 5.0, true, &mut oracle);
        assert!(first.has_pending_writes());
        first.persist().unwrap();

        let reopened = table(&store);
        assert_eq!(reopened.home_set(), first.home_set());
        assert_eq!(reopened.home_set().len(), 2);
    }

    #[test]
    fn test_corrupt_home_file_falls_back_to_empty() {
        let store = Arc::new(InMemoryByteStore::new());
        store.insert_raw("home_devices.bin", vec![1, 2, 3, 4]);

        let mut table = table(&store);
        assert!(table.home_set().is_empty());
        assert!(table.has_pending_writes(), "clean file rewritten");
        table.persist().unwrap();
        assert_eq!(store.get_raw("home_devices.bin").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_clear_drops_encounters_and_home_set() {
        let store = Arc::new(InMemoryByteStore::new());
        let mut table = table(&store);
        let mut oracle = SetOracle::default();
        table.update(&[static_rec(1)], 5.0, true, &mut oracle);

        table.clear(50.0).unwrap();

        assert!(table.is_empty());
        assert!(table.home_set().is_empty());
        assert_eq!(table.last_update(), 50.0);
        assert_eq!(store.get_raw("home_devices.bin").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_duplicate_addresses_in_scan_keep_first() {
        let store = Arc::new(InMemoryByteStore::new());
        let mut table = table(&store);
        let mut calls = 0;
        let mut counting = |_: &DeviceAddress| {
            calls += 1;
            true
        };

        let outcome = table.update(&[static_rec(1), static_rec(1)], 200.0, false, &mut counting);

        assert_eq!(outcome.report.new_static, 1);
        assert_eq!(table.len(), 1);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_write_failure_keeps_home_set_dirty() {
        let store = Arc::new(InMemoryByteStore::new());
        let mut table = table(&store);
        let mut oracle = SetOracle::default();
        table.update(&[static_rec(1)], 5.0, true, &mut oracle);

        store.set_fail_writes(true);
        assert!(table.persist().is_err());
        assert!(table.has_pending_writes());

        store.set_fail_writes(false);
        table.persist().unwrap();
        assert!(!table.has_pending_writes());
    }
}
