//! Container types backing the trie arrays
//!
//! - **`ChunkedVec<T>`** - growable array that grows by a fixed chunk and
//!   never shrinks

mod chunked_vec;

pub use chunked_vec::{ChunkedVec, DEFAULT_GROWTH_CHUNK};
