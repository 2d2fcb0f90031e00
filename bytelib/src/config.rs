//! Engine settings shared by every part of an [`EditSession`](crate::EditSession).

use crate::error::{EditError, EditErrorKind, Result};
use serde::{Deserialize, Serialize};

/// Default depth of the undo stack
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;
/// Default size of an entropy block in bytes
pub const DEFAULT_BLOCK_SIZE: usize = 256;
/// Default number of bytes displayed per row
pub const DEFAULT_BYTES_PER_ROW: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of snapshots kept on the undo stack
    pub history_capacity: usize,
    /// Block size used for blockwise entropy
    pub block_size: usize,
    /// Row width used by cursor navigation and text row entry
    pub bytes_per_row: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            block_size: DEFAULT_BLOCK_SIZE,
            bytes_per_row: DEFAULT_BYTES_PER_ROW,
        }
    }
}

impl EngineConfig {
    /// Parse the config from a TOML document. Missing keys take their default value.
    ///
    /// # Errors
    /// Returns an error if the document is malformed or the resulting config is invalid.
    ///
    /// # Example
    /// ```
    /// use bytelib::EngineConfig;
    ///
    /// let config = EngineConfig::from_toml_str("history_capacity = 8").unwrap();
    ///
    /// assert_eq!(config.history_capacity, 8);
    /// assert_eq!(config.block_size, 256);
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|err| {
            EditError::ConfigError(EditErrorKind::MalformedConfig(err.message().to_string()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that all sizes are non-zero.
    ///
    /// # Errors
    /// Returns `InvalidCapacity` for a zero history capacity and `InvalidBlockSize`
    /// for a zero block size or row width.
    pub fn validate(&self) -> Result<()> {
        if self.history_capacity == 0 {
            return Err(EditError::ConfigError(EditErrorKind::InvalidCapacity));
        }
        if self.block_size == 0 || self.bytes_per_row == 0 {
            return Err(EditError::ConfigError(EditErrorKind::InvalidBlockSize));
        }
        Ok(())
    }
}
