//! Contact badge entry point.

use std::sync::Arc;

use anyhow::Context;
use badge_runtime::adapters::{
    ScriptedInput, SimulatedScanner, SimulationSettings, TracingLedStrip, TracingPanel,
};
use badge_runtime::render::{LedRenderer, PanelRenderer};
use badge_runtime::{BadgeConfig, BadgeRuntime, LoopSettings};
use badge_telemetry::{init_telemetry, log_event, TelemetryConfig};
use cb_05_contact_log::RotatingContactLog;
use cb_06_dedup_engine::DedupEngine;
use shared_storage::FileByteStore;
use shared_types::{ByteStore, MonotonicClock, SystemClock};
use tokio::sync::watch;

const SUBSYSTEM: &str = "runtime";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _telemetry = init_telemetry(TelemetryConfig::from_env())?;

    let config = BadgeConfig::from_env();
    config.validate().context("invalid badge configuration")?;

    let store: Arc<dyn ByteStore> = Arc::new(
        FileByteStore::open(&config.data_dir).context("cannot open data directory")?,
    );

    let contact_log = RotatingContactLog::open(config.log.clone(), store.clone())
        .context("cannot open contact log")?;
    for line in contact_log.dump() {
        log_event!(debug, SUBSYSTEM, "Previous contact log", line = %line);
    }

    let clock: Arc<dyn MonotonicClock> = Arc::new(SystemClock::new());
    let engine = DedupEngine::open(
        config.engine.clone(),
        store,
        Box::new(contact_log),
        clock.now(),
    )
    .context("cannot open dedup engine")?;

    let scanner = SimulatedScanner::new(SimulationSettings {
        seed: config.sim_seed,
        crowd: config.sim_crowd,
        ..SimulationSettings::default()
    });
    let runtime = BadgeRuntime::new(
        engine,
        Box::new(scanner),
        Box::new(ScriptedInput::idle()),
        LedRenderer::new(Box::new(TracingLedStrip::new(config.led_pixels))),
        PanelRenderer::new(Box::new(TracingPanel::default()), config.panel.clone()),
        clock,
        LoopSettings {
            cycle_period: config.cycle_period,
            scan_timeout: config.scan_timeout,
            min_rssi: config.min_rssi,
        },
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(runtime.run(shutdown_rx));

    tokio::signal::ctrl_c()
        .await
        .context("cannot listen for shutdown signal")?;
    log_event!(info, SUBSYSTEM, "Shutdown requested");
    shutdown_tx.send(true).ok();

    let cycles = handle.await.context("badge loop panicked")?;
    log_event!(info, SUBSYSTEM, "Badge stopped", cycles = cycles);
    Ok(())
}
