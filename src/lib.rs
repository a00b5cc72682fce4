//! # datrie: Updatable Double-Array Trie
//!
//! A compact, deterministic mapping from strings to integers for
//! dictionary-based tokenizers and multi-pattern matching. The whole trie lives
//! in two flat integer arrays, so lookups touch a handful of cache lines and
//! the dictionary can keep changing after it has been built.
//!
//! ## Key Features
//!
//! - **Updatable**: insert and delete at any time, freed slots are reused
//! - **Longest-prefix scans**: [`DoubleArrayTrie::find`] and
//!   [`DoubleArrayTrie::find_all`] for maximum-match segmentation
//! - **Ordered traversal**: full and prefix iteration, plus a cursor that
//!   rewrites values in place
//! - **Pluggable id mappings**: byte-level, dense high-frequency range, and
//!   variable-length integer decompositions
//! - **Snapshots**: serde-serializable array contents with integrity checks
//!
//! ## Quick Start
//!
//! ```rust
//! use datrie::{DoubleArrayTrie, StatisticsProvider};
//!
//! let mut trie = DoubleArrayTrie::new();
//! for (word, id) in [("ba", 4), ("bad", 5), ("badd", 6), ("a", 2), ("abc", 1)] {
//!     trie.cover_insert(word, id).unwrap();
//! }
//!
//! // Maximum match from byte offset 0
//! let hit = trie.find("baddie", 0).unwrap();
//! assert_eq!((hit.len, hit.value), (4, 6));
//!
//! // Lexicographic iteration
//! let keys: Vec<String> = trie.iter().map(|(key, _)| key).collect();
//! assert_eq!(keys, ["a", "abc", "ba", "bad", "badd"]);
//!
//! // Prefix enumeration
//! assert_eq!(trie.prefix_match("bad"), ["bad", "badd"]);
//!
//! assert_eq!(trie.delete("bad"), Some(5));
//! assert_eq!(trie.stats().num_keys, 4);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod containers;
pub mod error;
pub mod fsa;
pub mod mapping;

// Re-export core types
pub use config::{Config, DatrieConfig};
pub use containers::ChunkedVec;
pub use error::{DatrieError, Result};
pub use fsa::{
    BaseEntry, CommonPrefixIter, Cursor, DoubleArrayTrie, Iter, PrefixMatch, StatisticsProvider,
    TrieSnapshot, TrieStats, Walk, MAX_STATES, MAX_VALUE,
};
pub use mapping::{DecodeIds, HighFreqRangeMapping, TransitionIds, Utf8Mapping, VarIntMapping};

/// State identifier type for trie walks
pub type StateId = u32;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library (no global state, logs the version)
pub fn init() {
    log::debug!("Initializing datrie v{}", VERSION);
}
