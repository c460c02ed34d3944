//! Membership filter configuration and validation

use crate::error::FilterError;

/// Default storage key of the filter image.
pub const DEFAULT_STORE_KEY: &str = "bloom.bin";

/// Membership filter configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterConfig {
    /// Key of the byte image in the store
    pub store_key: String,
    /// Re-read the whole image after every write and compare (diagnostic)
    pub verify_after_write: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            store_key: DEFAULT_STORE_KEY.to_string(),
            verify_after_write: false,
        }
    }
}

impl FilterConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.store_key.trim().is_empty() {
            return Err(FilterError::InvalidConfig(
                "store_key cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Builder-style method to set the storage key
    pub fn with_store_key(mut self, key: impl Into<String>) -> Self {
        self.store_key = key.into();
        self
    }

    /// Builder-style method to toggle verification
    pub fn with_verify_after_write(mut self, verify: bool) -> Self {
        self.verify_after_write = verify;
        self
    }
}
