//! Ports layer for the contact log

use shared_types::ContactEvent;

use crate::error::LogError;

/// Destination for contact events (Driven Port).
///
/// Production: `RotatingContactLog`
/// Testing: `MemoryEventSink`
pub trait EventSink: Send {
    /// Append one event.
    fn record(&mut self, event: &ContactEvent) -> Result<(), LogError>;
}
