//! # Engine Scenarios
//!
//! Multi-cycle behaviour of the dedup engine wired to real filter, table,
//! counter, history and contact-log crates over an in-memory store.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cb_05_contact_log::{LogConfig, MemoryEventSink, RotatingContactLog};
    use cb_06_dedup_engine::{DedupApi, DedupEngine, EngineConfig, InputState, Phase};
    use shared_storage::InMemoryByteStore;
    use shared_types::{ContactEvent, ObservedRecord};

    use crate::integration::{hopper_device, static_device};

    fn open(store: &Arc<InMemoryByteStore>, config: EngineConfig) -> (DedupEngine, MemoryEventSink) {
        let sink = MemoryEventSink::new();
        let engine = DedupEngine::open(config, store.clone(), Box::new(sink.clone()), 0.0)
            .expect("engine opens on an empty store");
        (engine, sink)
    }

    /// Feed `records` every `step` seconds over `[from, to)`.
    fn feed(engine: &mut DedupEngine, records: &[ObservedRecord], from: f64, to: f64, step: f64) {
        let mut t = from;
        while t < to {
            engine.update(records, t);
            t += step;
        }
    }

    #[test]
    fn test_home_devices_are_never_counted() {
        let store = Arc::new(InMemoryByteStore::new());
        let (mut engine, _sink) = open(&store, EngineConfig::default());
        let home: Vec<_> = (1..=3).map(static_device).collect();

        feed(&mut engine, &home, 1.0, 200.0, 10.0);
        assert_eq!(engine.phase(), Phase::Steady);
        assert_eq!(engine.total_unique(), 0);
        assert_eq!(engine.table().home_set().len(), 3);

        let mut visitors = home.clone();
        visitors.push(static_device(9));
        let report = engine.update(&visitors, 201.0);
        assert_eq!(report.credited, 1);

        // Home devices leave long enough to be evicted, then return.
        engine.update(&[], 900.0);
        let report = engine.update(&home, 910.0);
        assert_eq!(report.credited, 0);
        assert_eq!(engine.total_unique(), 1);
        assert_eq!(engine.snapshot(910.0).active_home_count, 3);
    }

    #[test]
    fn test_crowd_with_rotating_hopper() {
        let store = Arc::new(InMemoryByteStore::new());
        let (mut engine, sink) = open(&store, EngineConfig::default().with_home_grace(0.0));

        let mut crowd: Vec<_> = (1..=4).map(static_device).collect();
        crowd.push(hopper_device(1, 11));
        feed(&mut engine, &crowd, 1.0, 30.0, 5.0);
        assert_eq!(engine.total_unique(), 5);

        // The hopper rotates its address; same advertisement shape.
        crowd.pop();
        crowd.push(hopper_device(2, 11));
        let report = engine.update(&crowd, 31.0);
        assert_eq!(report.credited, 0);
        assert_eq!(report.table.migrated_hopper, 1);
        assert_eq!(engine.total_unique(), 5);
        assert_eq!(sink.with_tag("hop").len(), 1);

        // A different shape is a different device.
        crowd.push(hopper_device(3, 20));
        let report = engine.update(&crowd, 32.0);
        assert_eq!(report.credited, 1);
        assert_eq!(engine.total_unique(), 6);
    }

    #[test]
    fn test_dials_fill_for_long_encounters() {
        let store = Arc::new(InMemoryByteStore::new());
        let (mut engine, _sink) = open(&store, EngineConfig::default().with_home_grace(0.0));

        // One visitor stays for over five minutes, another passes by.
        let stayer = static_device(1);
        let passer = static_device(2);
        engine.update(&[stayer.clone(), passer.clone()], 1.0);
        feed(&mut engine, &[stayer.clone()], 10.0, 320.0, 10.0);

        let dials = engine.snapshot(320.0).dial_buckets;
        assert_eq!(dials[0], 1, "five-minute dial");
        assert_eq!(dials[1], 0);
        assert!(dials.iter().all(|&d| d <= engine.total_unique()));
    }

    #[test]
    fn test_reset_gesture_forgets_everything_but_history() {
        let store = Arc::new(InMemoryByteStore::new());
        let config = EngineConfig::default()
            .with_home_grace(0.0)
            .with_sample_period(10.0);
        let (mut engine, sink) = open(&store, config);

        let crowd: Vec<_> = (1..=3).map(static_device).collect();
        feed(&mut engine, &crowd, 1.0, 40.0, 5.0);
        assert_eq!(engine.total_unique(), 3);
        let history_before: Vec<u16> = engine.history().values().collect();
        assert!(history_before.iter().any(|&v| v == 3));

        let held = InputState {
            left: true,
            right: true,
            low_power: false,
        };
        let fired: Vec<bool> = (0..4).map(|i| engine.handle_input(held, 40.0 + i as f64)).collect();
        assert_eq!(fired, vec![false, false, false, true]);

        assert_eq!(engine.total_unique(), 0);
        assert!(engine.table().is_empty());
        assert!(engine.phase().is_home_grace());
        assert_eq!(engine.history().values().collect::<Vec<_>>(), history_before);

        let startups = sink
            .events()
            .iter()
            .filter(|e| matches!(e, ContactEvent::Startup { .. }))
            .count();
        assert_eq!(startups, 1, "reset does not log a restart");
    }

    #[test]
    fn test_low_power_hides_status_line_only() {
        let store = Arc::new(InMemoryByteStore::new());
        let (mut engine, _sink) = open(&store, EngineConfig::default().with_home_grace(0.0));

        engine.update(&[static_device(1)], 1.0);
        assert!(engine.status_line().is_some());

        let low = InputState {
            low_power: true,
            ..InputState::default()
        };
        engine.handle_input(low, 2.0);
        let report = engine.update(&[static_device(1), static_device(2)], 2.0);
        assert_eq!(report.credited, 1, "counting continues in low power");
        assert!(engine.status_line().is_none());
        assert!(engine.snapshot(2.0).is_low_power);
    }

    #[test]
    fn test_contact_log_lines_through_rotating_log() {
        let store = Arc::new(InMemoryByteStore::new());
        let log = RotatingContactLog::open(LogConfig::default(), store.clone())
            .expect("log opens on an empty store");
        let mut engine = DedupEngine::open(
            EngineConfig::default().with_home_grace(0.0),
            store.clone(),
            Box::new(log),
            0.0,
        )
        .expect("engine opens on an empty store");

        engine.update(&[static_device(1)], 5.0);
        engine.update(&[], 400.0);

        let reader = RotatingContactLog::open(LogConfig::default(), store)
            .expect("log reopens");
        let lines = reader.dump();
        assert_eq!(lines.len(), 3, "{lines:?}");
        assert_eq!(lines[0], "startup,0,0");
        assert!(lines[1].starts_with("add,5,1,"), "{}", lines[1]);
        assert!(lines[1].ends_with(",1,new static"), "{}", lines[1]);
        assert!(lines[2].starts_with("del,400,1,"), "{}", lines[2]);
    }
}
