//! Domain layer for the contact log

mod config;
mod format;

pub use config::LogConfig;
pub use format::format_line;
