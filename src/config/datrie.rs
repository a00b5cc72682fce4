//! Array sizing configuration for the double-array trie.

use super::{parse_env_var, Config, ValidationError};
use crate::containers::DEFAULT_GROWTH_CHUNK;
use crate::error::{DatrieError, Result};
use crate::fsa::MAX_STATES;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of slots allocated up front
pub const DEFAULT_INITIAL_SIZE: usize = 1024;

/// Sizing of the `base`/`check` arrays
///
/// `initial_size` slots (sentinel and root included) exist right after
/// construction. Whenever free-base selection runs out of candidates the arrays
/// grow by `growth_chunk` slots.
///
/// # Examples
///
/// ```rust
/// use datrie::{Config, DatrieConfig, DoubleArrayTrie, Utf8Mapping};
///
/// let config = DatrieConfig {
///     initial_size: 4096,
///     ..DatrieConfig::default()
/// };
/// let trie = DoubleArrayTrie::with_config(config, Utf8Mapping).unwrap();
/// assert_eq!(trie.array_len(), 4096);
/// assert!(DatrieConfig::memory_preset().validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatrieConfig {
    /// Slots allocated at construction
    pub initial_size: usize,
    /// Slots added per growth step
    pub growth_chunk: usize,
}

impl Default for DatrieConfig {
    fn default() -> Self {
        Self {
            initial_size: DEFAULT_INITIAL_SIZE,
            growth_chunk: DEFAULT_GROWTH_CHUNK,
        }
    }
}

impl DatrieConfig {
    fn validation_errors(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.initial_size < 2 || self.initial_size > MAX_STATES {
            errors.push(
                ValidationError::new(
                    "initial_size",
                    &self.initial_size.to_string(),
                    "must hold the sentinel and root slots and stay below the address ceiling",
                )
                .with_suggestion(&format!("2..={}", MAX_STATES)),
            );
        }
        if self.growth_chunk == 0 || self.growth_chunk > MAX_STATES {
            errors.push(
                ValidationError::new(
                    "growth_chunk",
                    &self.growth_chunk.to_string(),
                    "growth must add at least one slot",
                )
                .with_suggestion(&format!("1..={}", MAX_STATES)),
            );
        }
        errors
    }
}

impl Config for DatrieConfig {
    fn validate(&self) -> Result<()> {
        match self.validation_errors().into_iter().next() {
            Some(error) => Err(DatrieError::configuration(error.to_string())),
            None => Ok(()),
        }
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let mut config = Self::default();
        config.initial_size = parse_env_var(&format!("{}INITIAL_SIZE", prefix), config.initial_size);
        config.growth_chunk = parse_env_var(&format!("{}GROWTH_CHUNK", prefix), config.growth_chunk);
        config.validate()?;
        Ok(config)
    }

    fn performance_preset() -> Self {
        Self {
            initial_size: 64 * 1024,
            growth_chunk: 64 * 1024,
        }
    }

    fn memory_preset() -> Self {
        Self {
            initial_size: 256,
            growth_chunk: 1024,
        }
    }

    fn realtime_preset() -> Self {
        Self {
            initial_size: 16 * 1024,
            growth_chunk: 32 * 1024,
        }
    }

    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self).map_err(|e| {
            DatrieError::configuration(format!("Failed to serialize datrie config: {}", e))
        })?;
        std::fs::write(path, serialized).map_err(|e| {
            DatrieError::configuration(format!("Failed to write datrie config file: {}", e))
        })?;
        Ok(())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DatrieError::configuration(format!("Failed to read datrie config file: {}", e))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            DatrieError::configuration(format!("Failed to parse datrie config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }
}
