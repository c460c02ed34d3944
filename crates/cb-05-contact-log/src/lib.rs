//! # CB-05 Contact Log
//!
//! Human-readable record of contact events (`startup`, `add`, `hop`, `del`).
//!
//! Lines go to `data_log0.txt` until it exceeds the size limit, then the
//! other file is truncated and written, and so on. The older file is always
//! the one overwritten. Every line is also mirrored to diagnostics under the
//! `contact_log` tracing target.
//!
//! ## Line formats
//!
//! ```text
//! startup,<t>,<total>
//! add,<t>,<total>,<addr>,<is_new>,<kind>
//! hop,<t>,<total>,<old>-><new>,<is_new>
//! del,<t>,<total>,<addr>,<is_new>,<first_seen>,<last_seen>,<duration>
//! ```
//!
//! Times and durations are whole seconds; `is_new` is `0` or `1`.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;

pub use adapters::{MemoryEventSink, RotatingContactLog};
pub use domain::{format_line, LogConfig};
pub use error::LogError;
pub use ports::EventSink;
