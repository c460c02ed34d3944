//! Adapters layer for the contact log

mod memory;
mod rotating;

pub use memory::MemoryEventSink;
pub use rotating::RotatingContactLog;
