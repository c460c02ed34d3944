//! # Badge Telemetry
//!
//! Diagnostic logging for the contact badge.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use badge_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `BADGE_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `BADGE_JSON_LOGS` | `false` | JSON output instead of pretty |
//! | `BADGE_CONSOLE_OUTPUT` | `true` | Write logs to the console |
//! | `BADGE_LOG_SOURCE` | `false` | Include file/line |

mod config;
mod logging;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use logging::CONTACT_LOG_TARGET;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Global subscriber already installed: {0}")]
    AlreadyInitialized(String),
}

/// Install the global tracing subscriber.
///
/// Returns a guard that should be held for the lifetime of the program.
/// Calling this twice returns [`TelemetryError::AlreadyInitialized`].
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    tracing_setup::init_subscriber(&config)?;

    tracing::info!(
        service = %config.service_name,
        level = %config.log_level,
        json = config.json_logs,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active. Logs shutdown on drop.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry");
    }
}
