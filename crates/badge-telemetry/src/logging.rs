//! Structured logging helpers.
//!
//! Every diagnostic line carries a `subsystem` field (`cb-01` ... `runtime`)
//! so the JSON output can be filtered per component. Contact events are also
//! mirrored under the dedicated `contact_log` target.

/// Target used when mirroring contact-log lines into diagnostics.
pub const CONTACT_LOG_TARGET: &str = "contact_log";

/// Emit a structured log entry stamped with a subsystem.
///
/// ```rust,ignore
/// log_event!(info, "cb-01", "Filter loaded", bytes = 24576);
/// ```
#[macro_export]
macro_rules! log_event {
    (info, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    (warn, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    (error, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    (debug, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };
}

/// Mirror a contact-log line into diagnostics under the `contact_log` target.
#[macro_export]
macro_rules! log_contact_event {
    ($tag:expr, $total:expr, $line:expr) => {
        tracing::info!(
            target: "contact_log",
            event = $tag,
            total_unique = $total,
            "{}",
            $line
        )
    };
}
