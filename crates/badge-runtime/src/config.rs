//! # Badge Configuration
//!
//! Runtime parameters plus the engine and contact-log configuration.
//!
//! Defaults are the device constants. Environment variables override them;
//! an unparsable value is logged and the default kept.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use badge_telemetry::log_event;
use cb_05_contact_log::{LogConfig, LogError};
use cb_06_dedup_engine::{EngineConfig, EngineError};
use thiserror::Error;

use crate::render::PanelConfig;

const SUBSYSTEM: &str = "runtime";

/// Complete badge configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeConfig {
    /// Directory holding every persisted file.
    pub data_dir: PathBuf,
    /// Target length of one scan / update / render / persist cycle.
    pub cycle_period: Duration,
    /// Hard budget for the scan step.
    pub scan_timeout: Duration,
    /// Weaker advertisements are ignored.
    pub min_rssi: i16,
    /// Seed for the simulated crowd.
    pub sim_seed: u64,
    /// Number of simulated nearby devices.
    pub sim_crowd: usize,
    /// Pixels on the LED strip.
    pub led_pixels: usize,
    pub engine: EngineConfig,
    pub log: LogConfig,
    pub panel: PanelConfig,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            cycle_period: Duration::from_millis(250),
            scan_timeout: Duration::from_millis(1000),
            min_rssi: -80,
            sim_seed: 143,
            sim_crowd: 12,
            led_pixels: 10,
            engine: EngineConfig::default(),
            log: LogConfig::default(),
            panel: PanelConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cycle period must be non-zero")]
    ZeroCyclePeriod,

    #[error("scan timeout must be non-zero")]
    ZeroScanTimeout,

    #[error("LED strip needs at least one pixel")]
    NoPixels,

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Log(#[from] LogError),
}

impl BadgeConfig {
    /// Defaults overridden from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `BADGE_DATA_DIR`: data directory (default: ./data)
    /// - `BADGE_CYCLE_MS`: cycle period in ms (default: 250)
    /// - `BADGE_SCAN_TIMEOUT_MS`: scan budget in ms (default: 1000)
    /// - `BADGE_MIN_RSSI`: minimum signal strength in dBm (default: -80)
    /// - `BADGE_SIM_SEED`: simulated crowd seed (default: 143)
    /// - `BADGE_SIM_CROWD`: simulated crowd size (default: 12)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] but reading through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("BADGE_DATA_DIR") {
            if !dir.trim().is_empty() {
                config.data_dir = PathBuf::from(dir);
            }
        }

        let mut cycle_ms = config.cycle_period.as_millis() as u64;
        override_from(&lookup, "BADGE_CYCLE_MS", &mut cycle_ms);
        config.cycle_period = Duration::from_millis(cycle_ms);

        let mut scan_ms = config.scan_timeout.as_millis() as u64;
        override_from(&lookup, "BADGE_SCAN_TIMEOUT_MS", &mut scan_ms);
        config.scan_timeout = Duration::from_millis(scan_ms);

        override_from(&lookup, "BADGE_MIN_RSSI", &mut config.min_rssi);
        override_from(&lookup, "BADGE_SIM_SEED", &mut config.sim_seed);
        override_from(&lookup, "BADGE_SIM_CROWD", &mut config.sim_crowd);

        config
    }

    /// Validate configuration before the loop starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cycle_period.is_zero() {
            return Err(ConfigError::ZeroCyclePeriod);
        }
        if self.scan_timeout.is_zero() {
            return Err(ConfigError::ZeroScanTimeout);
        }
        if self.led_pixels == 0 {
            return Err(ConfigError::NoPixels);
        }
        self.engine.validate()?;
        self.log.validate()?;
        Ok(())
    }
}

fn override_from<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => *target = value,
        Err(_) => {
            log_event!(
                warn,
                SUBSYSTEM,
                "Ignoring unparsable setting",
                key = key,
                value = %raw,
                default = %target
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = BadgeConfig::default();
        assert_eq!(config.cycle_period, Duration::from_millis(250));
        assert_eq!(config.scan_timeout, Duration::from_secs(1));
        assert_eq!(config.min_rssi, -80);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let config = BadgeConfig::from_lookup(lookup(&[
            ("BADGE_DATA_DIR", "/tmp/badge"),
            ("BADGE_CYCLE_MS", "500"),
            ("BADGE_MIN_RSSI", "-70"),
            ("BADGE_SIM_CROWD", "40"),
        ]));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/badge"));
        assert_eq!(config.cycle_period, Duration::from_millis(500));
        assert_eq!(config.min_rssi, -70);
        assert_eq!(config.sim_crowd, 40);
    }

    #[test]
    fn test_unparsable_values_keep_defaults() {
        let config = BadgeConfig::from_lookup(lookup(&[
            ("BADGE_SCAN_TIMEOUT_MS", "soon"),
            ("BADGE_MIN_RSSI", "loud"),
        ]));
        assert_eq!(config.scan_timeout, Duration::from_secs(1));
        assert_eq!(config.min_rssi, -80);
    }

    #[test]
    fn test_zero_cycle_rejected() {
        let config = BadgeConfig::from_lookup(lookup(&[("BADGE_CYCLE_MS", "0")]));
        assert!(matches!(config.validate(), Err(ConfigError::ZeroCyclePeriod)));
    }
}
