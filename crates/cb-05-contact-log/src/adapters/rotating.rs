use std::sync::Arc;

use badge_telemetry::{log_contact_event, log_event};
use shared_types::{ByteStore, ContactEvent};

use crate::domain::{format_line, LogConfig};
use crate::error::LogError;
use crate::ports::EventSink;

const SUBSYSTEM: &str = "cb-05";

/// Two-file rotating contact log over a [`ByteStore`].
pub struct RotatingContactLog {
    config: LogConfig,
    store: Arc<dyn ByteStore>,
    index: usize,
}

impl RotatingContactLog {
    /// Open the log. Writing resumes in the second file when the first one
    /// is already full.
    pub fn open(config: LogConfig, store: Arc<dyn ByteStore>) -> Result<Self, LogError> {
        config.validate()?;

        let first_full = store
            .size(&config.file_keys[0])
            .map(|size| size >= config.max_file_bytes)
            .unwrap_or(false);

        Ok(Self {
            index: usize::from(first_full),
            config,
            store,
        })
    }

    /// Index of the file currently appended to.
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// Append one line, rotating when the current file is over the limit.
    pub fn append_line(&mut self, line: &str) -> Result<(), LogError> {
        let key = &self.config.file_keys[self.index];
        let size = match self.store.size(key) {
            Ok(size) => size,
            Err(e) if e.is_not_found() => 0,
            Err(e) => return Err(e.into()),
        };

        let mut bytes = Vec::with_capacity(line.len() + 1);
        bytes.extend_from_slice(line.as_bytes());
        bytes.push(b'\n');

        if size <= self.config.max_file_bytes {
            self.store.append(key, &bytes)?;
        } else {
            self.index ^= 1;
            let next = &self.config.file_keys[self.index];
            log_event!(info, SUBSYSTEM, "Rotating contact log", file = %next);
            self.store.write(next, &bytes)?;
        }
        Ok(())
    }

    /// Both files, older first, as lines. Unreadable files are skipped.
    pub fn dump(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for offset in 1..=2 {
            let key = &self.config.file_keys[(self.index + offset) & 1];
            match self.store.read(key) {
                Ok(bytes) => {
                    lines.extend(
                        String::from_utf8_lossy(&bytes)
                            .lines()
                            .map(|line| line.trim().to_string())
                            .filter(|line| !line.is_empty()),
                    );
                }
                Err(e) if e.is_not_found() => {}
                Err(e) => {
                    log_event!(warn, SUBSYSTEM, "Failed to read log", file = %key, error = %e);
                }
            }
        }
        lines
    }
}

impl EventSink for RotatingContactLog {
    fn record(&mut self, event: &ContactEvent) -> Result<(), LogError> {
        let line = format_line(event);
        log_contact_event!(event.tag(), event.total_unique(), line);
        self.append_line(&line)
    }
}
