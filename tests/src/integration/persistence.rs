//! # Persistence Across Power Loss
//!
//! Opens the engine on a real data directory, drops it without warning and
//! reopens it, the way the badge does on every power cycle.

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use cb_01_membership_filter::MembershipApi;
    use cb_05_contact_log::MemoryEventSink;
    use cb_06_dedup_engine::{DedupApi, DedupEngine, EngineConfig};
    use shared_storage::{FileByteStore, InMemoryByteStore};
    use shared_types::{ByteStore, ContactEvent};
    use tempfile::TempDir;

    use crate::integration::static_device;

    fn open_at(dir: &Path, config: EngineConfig) -> (DedupEngine, MemoryEventSink) {
        let store: Arc<dyn ByteStore> = Arc::new(FileByteStore::open(dir).unwrap());
        let sink = MemoryEventSink::new();
        let engine = DedupEngine::open(config, store, Box::new(sink.clone()), 0.0).unwrap();
        (engine, sink)
    }

    fn no_grace() -> EngineConfig {
        EngineConfig::default().with_home_grace(0.0)
    }

    #[test]
    fn test_total_and_filter_survive_restart() {
        let dir = TempDir::new().unwrap();
        {
            let (mut engine, _) = open_at(dir.path(), no_grace());
            let crowd: Vec<_> = (1..=4).map(static_device).collect();
            engine.update(&crowd, 1.0);
            assert!(engine.persist().all_ok());
        }

        let (mut engine, sink) = open_at(dir.path(), no_grace());
        assert_eq!(engine.total_unique(), 4);
        assert!(matches!(
            sink.events().first(),
            Some(ContactEvent::Startup { total_unique: 4, .. })
        ));

        let mut crowd: Vec<_> = (1..=4).map(static_device).collect();
        let report = engine.update(&crowd, 1.0);
        assert_eq!(report.credited, 0, "filter remembers earlier devices");

        crowd.push(static_device(5));
        let report = engine.update(&crowd, 2.0);
        assert_eq!(report.credited, 1);
        assert_eq!(engine.total_unique(), 5);
    }

    #[test]
    fn test_home_devices_survive_restart() {
        let dir = TempDir::new().unwrap();
        {
            let (mut engine, _) = open_at(dir.path(), EngineConfig::default());
            engine.update(&[static_device(1), static_device(2)], 1.0);
            assert!(engine.persist().all_ok());
        }

        let (mut engine, _) = open_at(dir.path(), no_grace());
        assert_eq!(engine.table().home_set().len(), 2);

        engine.update(&[static_device(1), static_device(2), static_device(3)], 1.0);
        let snapshot = engine.snapshot(1.0);
        assert_eq!(snapshot.active_home_count, 2);
        assert_eq!(snapshot.active_non_exempt_count, 1);
        assert_eq!(engine.total_unique(), 1);
    }

    #[test]
    fn test_history_survives_restart() {
        let dir = TempDir::new().unwrap();
        let before: Vec<u16>;
        {
            let (mut engine, _) = open_at(dir.path(), no_grace());
            let crowd = [static_device(1), static_device(2)];
            let mut t = 10.0;
            while t <= 130.0 {
                engine.update(&crowd, t);
                t += 10.0;
            }
            before = engine.history().values().collect();
            assert!(before.contains(&2));
        }

        let (engine, _) = open_at(dir.path(), no_grace());
        let after: Vec<u16> = engine.history().values().collect();
        assert_eq!(after, before);
    }

    #[test]
    fn test_failed_writes_are_retried_after_recovery() {
        let store = Arc::new(InMemoryByteStore::new());
        let mut engine = DedupEngine::open(
            no_grace(),
            store.clone(),
            Box::new(MemoryEventSink::new()),
            0.0,
        )
        .unwrap();

        store.set_fail_writes(true);
        engine.update(&[static_device(1), static_device(2)], 1.0);
        assert!(!engine.persist().all_ok());
        assert_eq!(engine.total_unique(), 2, "in-memory count is unaffected");

        store.set_fail_writes(false);
        assert!(engine.persist().all_ok());
        drop(engine);

        let reopened = DedupEngine::open(
            no_grace(),
            store.clone(),
            Box::new(MemoryEventSink::new()),
            0.0,
        )
        .unwrap();
        assert_eq!(reopened.total_unique(), 2);
        assert!(reopened.filter().contains(&static_device(1).address));
    }
}
