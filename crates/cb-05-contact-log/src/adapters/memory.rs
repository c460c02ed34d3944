use parking_lot::Mutex;
use shared_types::ContactEvent;
use std::sync::Arc;

use crate::error::LogError;
use crate::ports::EventSink;

/// In-memory event sink for tests. Clones share the same buffer.
#[derive(Clone, Default)]
pub struct MemoryEventSink {
    events: Arc<Mutex<Vec<ContactEvent>>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    pub fn events(&self) -> Vec<ContactEvent> {
        self.events.lock().clone()
    }

    /// Recorded events with the given tag (`"add"`, `"del"`, ...).
    pub fn with_tag(&self, tag: &str) -> Vec<ContactEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.tag() == tag)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for MemoryEventSink {
    fn record(&mut self, event: &ContactEvent) -> Result<(), LogError> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}
