use crate::error::LogError;

/// Contact log configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogConfig {
    /// The two files written alternately
    pub file_keys: [String; 2],
    /// A file is considered full once it holds more than this many bytes
    pub max_file_bytes: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file_keys: ["data_log0.txt".to_string(), "data_log1.txt".to_string()],
            max_file_bytes: 100 * 1024,
        }
    }
}

impl LogConfig {
    pub fn validate(&self) -> Result<(), LogError> {
        if self.file_keys.iter().any(|k| k.trim().is_empty()) {
            return Err(LogError::InvalidConfig("file keys cannot be empty".into()));
        }
        if self.file_keys[0] == self.file_keys[1] {
            return Err(LogError::InvalidConfig("file keys must differ".into()));
        }
        if self.max_file_bytes == 0 {
            return Err(LogError::InvalidConfig("max_file_bytes cannot be 0".into()));
        }
        Ok(())
    }

    pub fn with_max_file_bytes(mut self, bytes: u64) -> Self {
        self.max_file_bytes = bytes;
        self
    }
}
