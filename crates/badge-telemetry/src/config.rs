//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for diagnostic logging.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name stamped on startup logs
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or a full
    /// `EnvFilter` directive string
    pub log_level: String,

    /// Whether to write logs to the console at all
    pub console_output: bool,

    /// Whether to emit JSON formatted logs instead of the pretty format
    pub json_logs: bool,

    /// Whether to include source file and line in each log line
    pub source_locations: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "contact-badge".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            source_locations: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `BADGE_SERVICE_NAME`: Service name (default: contact-badge)
    /// - `BADGE_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `BADGE_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `BADGE_JSON_LOGS`: Enable JSON logs (default: false)
    /// - `BADGE_LOG_SOURCE`: Include file/line in logs (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] but reading through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            service_name: lookup("BADGE_SERVICE_NAME").unwrap_or(defaults.service_name),

            log_level: lookup("BADGE_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            console_output: lookup("BADGE_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.console_output),

            json_logs: lookup("BADGE_JSON_LOGS")
                .map(|v| is_truthy(&v))
                .unwrap_or(defaults.json_logs),

            source_locations: lookup("BADGE_LOG_SOURCE")
                .map(|v| is_truthy(&v))
                .unwrap_or(defaults.source_locations),
        }
    }

    /// Override the log level.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Switch JSON output on or off.
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }
}

fn is_truthy(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}
