//! Configuration for datrie
//!
//! The configuration layer covers the sizing knobs of the trie arrays. Every
//! configuration type implements [`Config`], which provides validation,
//! environment initialization, presets and JSON file persistence.
//!
//! # Preset Configurations
//!
//! ```rust
//! use datrie::config::{Config, DatrieConfig};
//!
//! // Large up-front allocation, few growth steps
//! let config = DatrieConfig::performance_preset();
//!
//! // Small arrays that grow on demand
//! let config = DatrieConfig::memory_preset();
//! ```
//!
//! # Environment Initialization
//!
//! ```rust
//! use datrie::config::{Config, DatrieConfig};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Reads DATRIE_INITIAL_SIZE and DATRIE_GROWTH_CHUNK
//! let config = DatrieConfig::from_env()?;
//!
//! // Same fields under a custom prefix, e.g. MYAPP_INITIAL_SIZE
//! let config = DatrieConfig::from_env_with_prefix("MYAPP_")?;
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use std::env;
use std::fmt;
use std::path::Path;

pub mod datrie;


pub use datrie::{DatrieConfig, DEFAULT_INITIAL_SIZE};

/// Common configuration trait providing validation, environment initialization,
/// and preset management functionality.
pub trait Config: Clone + fmt::Debug {
    /// Validate the configuration for correctness and consistency.
    fn validate(&self) -> Result<()>;

    /// Initialize configuration from environment variables.
    ///
    /// Environment variables use the format `DATRIE_{FIELD}`, for example
    /// `DATRIE_GROWTH_CHUNK=65536`. Unset or unparsable variables keep their
    /// default values.
    fn from_env() -> Result<Self>
    where
        Self: Default,
    {
        Self::from_env_with_prefix("DATRIE_")
    }

    /// Initialize configuration from environment variables with a custom prefix.
    ///
    /// # Arguments
    ///
    /// * `prefix` - The environment variable prefix to use
    fn from_env_with_prefix(prefix: &str) -> Result<Self>
    where
        Self: Default;

    /// Preset that allocates generously and grows rarely.
    fn performance_preset() -> Self;

    /// Preset that keeps the arrays as small as possible.
    fn memory_preset() -> Self;

    /// Preset that avoids frequent growth pauses during inserts.
    fn realtime_preset() -> Self;

    /// Balanced preset, identical to the defaults.
    fn balanced_preset() -> Self
    where
        Self: Default,
    {
        Self::default()
    }

    /// Save configuration to a JSON file.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    /// Load and validate configuration from a JSON file.
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self>;
}

/// Configuration validation error details.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// The invalid value
    pub value: String,
    /// Description of why the value is invalid
    pub reason: String,
    /// Suggested valid values or ranges
    pub suggestion: Option<String>,
}

impl ValidationError {
    /// Create a new validation error.
    ///
    /// # Arguments
    ///
    /// * `field` - The field name that failed validation
    /// * `value` - The invalid value
    /// * `reason` - Description of why the value is invalid
    pub fn new(field: &str, value: &str, reason: &str) -> Self {
        Self {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
            suggestion: None,
        }
    }

    /// Add a suggestion for valid values.
    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid configuration for field '{}': value '{}' is invalid ({})",
            self.field, self.value, self.reason
        )?;

        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". Suggested values: {}", suggestion)?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Parse an environment variable, falling back to `default` when it is unset
/// or unparsable.
pub fn parse_env_var<T>(var_name: &str, default: T) -> T
where
    T: std::str::FromStr + Clone,
{
    env::var(var_name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Parse a boolean environment variable.
///
/// Accepts: "true", "1", "yes", "on" (case-insensitive) as true,
/// everything else as false.
pub fn parse_env_bool(var_name: &str, default: bool) -> bool {
    env::var(var_name)
        .ok()
        .map(|s| {
            let s = s.to_lowercase();
            matches!(s.as_str(), "true" | "1" | "yes" | "on")
        })
        .unwrap_or(default)
}
