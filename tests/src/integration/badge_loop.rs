//! # Badge Loop
//!
//! The runtime loop driving a real engine and contact log over a data
//! directory, with the seeded crowd simulation standing in for the radio.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use badge_runtime::adapters::{
        ScriptedInput, SimulatedScanner, SimulationSettings, TracingLedStrip, TracingPanel,
    };
    use badge_runtime::render::{LedRenderer, PanelConfig, PanelRenderer};
    use badge_runtime::{BadgeRuntime, LoopSettings};
    use cb_05_contact_log::{LogConfig, RotatingContactLog};
    use cb_06_dedup_engine::{DedupEngine, EngineConfig, InputState};
    use shared_storage::FileByteStore;
    use shared_types::{ByteStore, ManualClock, MonotonicClock};
    use tempfile::TempDir;

    const CROWD: usize = 12;

    fn build(
        store: Arc<dyn ByteStore>,
        clock: Arc<ManualClock>,
        input: ScriptedInput,
    ) -> BadgeRuntime<DedupEngine> {
        let log = RotatingContactLog::open(LogConfig::default(), store.clone()).unwrap();
        let engine = DedupEngine::open(
            EngineConfig::default().with_home_grace(0.0),
            store,
            Box::new(log),
            clock.now(),
        )
        .unwrap();
        let scanner = SimulatedScanner::new(SimulationSettings {
            crowd: CROWD,
            latency: Duration::from_millis(50),
            ..SimulationSettings::default()
        });
        BadgeRuntime::new(
            engine,
            Box::new(scanner),
            Box::new(input),
            LedRenderer::new(Box::new(TracingLedStrip::new(10))),
            PanelRenderer::new(Box::new(TracingPanel::default()), PanelConfig::default()),
            clock,
            LoopSettings {
                cycle_period: Duration::from_millis(250),
                scan_timeout: Duration::from_secs(1),
                min_rssi: -80,
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_crowd_is_counted_once() {
        let dir = TempDir::new().unwrap();
        let store: Arc<dyn ByteStore> = Arc::new(FileByteStore::open(dir.path()).unwrap());
        let clock = Arc::new(ManualClock::starting_at(0.0));
        let mut runtime = build(store.clone(), clock.clone(), ScriptedInput::idle());

        for _ in 0..200 {
            clock.advance(1.0);
            let summary = runtime.run_cycle().await;
            assert!(!summary.scan_timed_out);
            assert!(summary.persist.all_ok());
        }

        let total = runtime.engine().total_unique();
        assert!(total >= 1, "someone in range was counted");
        assert!(total <= CROWD as u64, "no device counted twice: {total}");

        let lines = RotatingContactLog::open(LogConfig::default(), store)
            .unwrap()
            .dump();
        assert_eq!(lines.first().map(String::as_str), Some("startup,0,0"));
        assert!(lines.iter().any(|l| l.starts_with("add,")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_count_resumes_after_power_cycle() {
        let dir = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::starting_at(0.0));

        let first_total = {
            let store: Arc<dyn ByteStore> = Arc::new(FileByteStore::open(dir.path()).unwrap());
            let mut runtime = build(store, clock.clone(), ScriptedInput::idle());
            for _ in 0..30 {
                clock.advance(1.0);
                runtime.run_cycle().await;
            }
            runtime.engine().total_unique()
        };

        // Same seed, same crowd: every static device is already in the filter.
        let store: Arc<dyn ByteStore> = Arc::new(FileByteStore::open(dir.path()).unwrap());
        let clock = Arc::new(ManualClock::starting_at(0.0));
        let mut runtime = build(store, clock.clone(), ScriptedInput::idle());
        assert_eq!(runtime.engine().total_unique(), first_total);

        clock.advance(1.0);
        runtime.run_cycle().await;
        assert!(runtime.engine().total_unique() >= first_total);
    }

    #[tokio::test(start_paused = true)]
    async fn test_low_power_switch_keeps_counting() {
        let dir = TempDir::new().unwrap();
        let store: Arc<dyn ByteStore> = Arc::new(FileByteStore::open(dir.path()).unwrap());
        let clock = Arc::new(ManualClock::starting_at(0.0));
        let low = InputState {
            low_power: true,
            ..InputState::default()
        };
        let mut runtime = build(store, clock.clone(), ScriptedInput::new([low]));

        for _ in 0..20 {
            clock.advance(1.0);
            runtime.run_cycle().await;
        }
        assert!(runtime.engine().is_low_power());
        assert!(runtime.engine().total_unique() >= 1);
    }
}
