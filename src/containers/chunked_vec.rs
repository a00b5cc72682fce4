//! ChunkedVec: growable array with fixed-chunk growth
//!
//! Backs the `base` and `check` arrays of the double-array trie. Capacity grows
//! by a constant number of elements instead of doubling, which keeps the
//! overshoot of very large tries bounded. The array never shrinks.

use crate::error::{check_bounds, Result};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Default number of elements added per growth step
pub const DEFAULT_GROWTH_CHUNK: usize = 10240;

/// Growable array that adds `growth_chunk` slots whenever it runs full
///
/// # Examples
///
/// ```rust
/// use datrie::ChunkedVec;
///
/// let mut vec = ChunkedVec::with_chunk(4);
/// for i in 0..5 {
///     vec.push(i);
/// }
/// assert_eq!(vec.len(), 5);
/// assert!(vec.capacity() >= 5);
/// assert_eq!(vec.get(4).unwrap(), 4);
/// assert!(vec.get(5).is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ChunkedVec<T> {
    data: Vec<T>,
    growth_chunk: usize,
}

impl<T: Copy> ChunkedVec<T> {
    /// Create an empty array using [`DEFAULT_GROWTH_CHUNK`]
    pub fn new() -> Self {
        Self::with_chunk(DEFAULT_GROWTH_CHUNK)
    }

    /// Create an empty array that grows by `growth_chunk` elements
    ///
    /// A chunk of zero is treated as one.
    pub fn with_chunk(growth_chunk: usize) -> Self {
        Self::with_capacity(0, growth_chunk)
    }

    /// Create an empty array with `capacity` slots preallocated
    pub fn with_capacity(capacity: usize, growth_chunk: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            growth_chunk: growth_chunk.max(1),
        }
    }

    /// Wrap existing contents, e.g. when restoring a snapshot
    pub fn from_vec(data: Vec<T>, growth_chunk: usize) -> Self {
        Self {
            data,
            growth_chunk: growth_chunk.max(1),
        }
    }

    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the array is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Allocated slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Number of slots added per growth step
    #[inline]
    pub fn growth_chunk(&self) -> usize {
        self.growth_chunk
    }

    /// Append an element, growing by one chunk when full
    #[inline]
    pub fn push(&mut self, value: T) {
        if self.data.len() == self.data.capacity() {
            self.data.reserve_exact(self.growth_chunk);
        }
        self.data.push(value);
    }

    /// Read the element at `index`
    #[inline]
    pub fn get(&self, index: usize) -> Result<T> {
        check_bounds(index, self.data.len())?;
        Ok(self.data[index])
    }

    /// Overwrite the element at `index`
    #[inline]
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        check_bounds(index, self.data.len())?;
        self.data[index] = value;
        Ok(())
    }

    /// View the contents as a slice
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Copy the contents out
    pub fn to_vec(&self) -> Vec<T> {
        self.data.clone()
    }
}

impl<T: Copy> Default for ChunkedVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for ChunkedVec<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for ChunkedVec<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl<T: fmt::Debug> fmt::Debug for ChunkedVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkedVec")
            .field("len", &self.data.len())
            .field("capacity", &self.data.capacity())
            .field("growth_chunk", &self.growth_chunk)
            .finish()
    }
}
