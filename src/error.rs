//! Error handling for the datrie library
//!
//! Lookups that miss are not errors and surface as `None`. The variants below
//! cover rejected arguments, bounds violations on the backing arrays, the
//! address ceiling imposed by the value tag bit, and corrupt snapshots.

use thiserror::Error;

/// Main error type for the datrie library
#[derive(Error, Debug)]
pub enum DatrieError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rejected key or value; the operation performed no mutation
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message describing the rejected argument
        message: String,
    },

    /// Index out of bounds access
    #[error("Out of bounds: index {index}, size {size}")]
    OutOfBounds {
        /// The invalid index
        index: usize,
        /// The valid size/length
        size: usize,
    },

    /// The trie would need an address at or above the tag-bit ceiling
    #[error("Capacity exceeded: requested index {requested}, limit {limit}")]
    CapacityExceeded {
        /// Highest index that was requested
        requested: usize,
        /// Exclusive upper bound on addressable states
        limit: usize,
    },

    /// Invalid data format or corruption
    #[error("Invalid data: {message}")]
    InvalidData {
        /// Error message describing the issue
        message: String,
    },

    /// Configuration or parameter errors
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },
}

impl DatrieError {
    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument { message: message.into() }
    }

    /// Create an out of bounds error
    pub fn out_of_bounds(index: usize, size: usize) -> Self {
        Self::OutOfBounds { index, size }
    }

    /// Create a capacity exceeded error
    pub fn capacity_exceeded(requested: usize, limit: usize) -> Self {
        Self::CapacityExceeded { requested, limit }
    }

    /// Create an invalid data error
    pub fn invalid_data<S: Into<String>>(message: S) -> Self {
        Self::InvalidData { message: message.into() }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Check if this is a recoverable error
    ///
    /// A trie that returned `CapacityExceeded` may have grown partially and
    /// should be discarded.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::InvalidArgument { .. } => true,
            Self::OutOfBounds { .. } => false,
            Self::CapacityExceeded { .. } => false,
            Self::InvalidData { .. } => false,
            Self::Configuration { .. } => false,
        }
    }

    /// Get the error category for logging/metrics
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::InvalidArgument { .. } => "argument",
            Self::OutOfBounds { .. } => "bounds",
            Self::CapacityExceeded { .. } => "capacity",
            Self::InvalidData { .. } => "data",
            Self::Configuration { .. } => "config",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, DatrieError>;

/// Assert that an index is within bounds
#[inline]
pub fn check_bounds(index: usize, size: usize) -> Result<()> {
    if index >= size {
        Err(DatrieError::out_of_bounds(index, size))
    } else {
        Ok(())
    }
}
