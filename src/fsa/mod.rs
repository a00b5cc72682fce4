//! Double-array trie and its traversal
//!
//! - [`DoubleArrayTrie`] - updatable string-to-integer trie in two flat arrays
//! - [`Iter`], [`Cursor`], [`CommonPrefixIter`] - traversal
//! - [`TrieSnapshot`] - raw array contents for persistence

mod double_array;
pub mod double_array_trie;
pub mod iterator;
pub mod snapshot;
pub mod traits;

pub use double_array::{BaseEntry, MAX_STATES, MAX_VALUE};
pub use double_array_trie::{DoubleArrayTrie, PrefixMatch, Walk};
pub use iterator::{CommonPrefixIter, Cursor, Iter};
pub use snapshot::TrieSnapshot;
pub use traits::{StatisticsProvider, TrieStats};
