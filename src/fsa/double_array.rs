//! Array pair and free-slot list of the double-array trie
//!
//! # Memory Layout
//!
//! ```text
//! slot 0      free-list sentinel: check[0] = -head, base[0] = -tail
//! slot 1      root: base = offset, check = 0
//! occupied    base = offset (inner state) or value | LEAF_BIT (terminal slot)
//!             check = parent state (>= 1)
//! free        base = -prev, check = -next (circular, doubly linked through 0)
//! ```
//!
//! Free slots are recognised by `check <= 0`. Every slot appended by growth is
//! linked at the tail of the free list, so the list always holds exactly the
//! vacant slots above the root.

use crate::containers::ChunkedVec;
use crate::error::{DatrieError, Result};

/// Tag bit marking a `base` entry as a stored value
pub(crate) const LEAF_BIT: i32 = 1 << 30;

/// Largest value a key can map to
pub const MAX_VALUE: u32 = (LEAF_BIT as u32) - 1;

/// Exclusive upper bound on array addresses
pub const MAX_STATES: usize = LEAF_BIT as usize;

/// Free-list sentinel slot
pub(crate) const SENTINEL: usize = 0;

/// Root state, never freed
pub(crate) const ROOT: usize = 1;

/// Decoded content of an occupied `base` slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseEntry {
    /// Children of this state live at `offset + id`
    Offset(i32),
    /// Terminal slot holding the value of a key
    Value(u32),
}

impl BaseEntry {
    #[inline]
    pub(crate) fn decode(raw: i32) -> Self {
        if raw > 0 && raw & LEAF_BIT != 0 {
            BaseEntry::Value((raw & !LEAF_BIT) as u32)
        } else {
            BaseEntry::Offset(raw)
        }
    }

    #[inline]
    pub(crate) fn encode(self) -> i32 {
        match self {
            BaseEntry::Offset(offset) => offset,
            BaseEntry::Value(value) => (value as i32) | LEAF_BIT,
        }
    }
}

/// The `base`/`check` pair plus the free list threaded through it
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct DoubleArray {
    base: ChunkedVec<i32>,
    check: ChunkedVec<i32>,
}

impl DoubleArray {
    /// Create arrays holding the sentinel, the root and `initial_size - 2`
    /// free slots
    pub fn new(initial_size: usize, growth_chunk: usize) -> Self {
        let initial_size = initial_size.clamp(ROOT + 1, MAX_STATES);
        let mut array = Self {
            base: ChunkedVec::with_capacity(initial_size, growth_chunk),
            check: ChunkedVec::with_capacity(initial_size, growth_chunk),
        };

        array.base.push(0);
        array.check.push(0);
        array.base.push(ROOT as i32);
        array.check.push(0);
        array.extend_to(initial_size - 1);
        array
    }

    /// Wrap raw arrays restored from a snapshot; the caller validates them
    pub fn from_raw(base: Vec<i32>, check: Vec<i32>, growth_chunk: usize) -> Self {
        Self {
            base: ChunkedVec::from_vec(base, growth_chunk),
            check: ChunkedVec::from_vec(check, growth_chunk),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.base.len()
    }

    #[inline]
    pub fn growth_chunk(&self) -> usize {
        self.base.growth_chunk()
    }

    #[inline]
    pub fn base_raw(&self) -> &[i32] {
        self.base.as_slice()
    }

    #[inline]
    pub fn check_raw(&self) -> &[i32] {
        self.check.as_slice()
    }

    #[inline]
    pub fn check(&self, state: usize) -> i32 {
        self.check[state]
    }

    #[inline]
    pub fn set_check(&mut self, state: usize, parent: usize) {
        self.check[state] = parent as i32;
    }

    #[inline]
    pub fn entry(&self, state: usize) -> BaseEntry {
        BaseEntry::decode(self.base[state])
    }

    #[inline]
    pub fn set_entry(&mut self, state: usize, entry: BaseEntry) {
        self.base[state] = entry.encode();
    }

    /// Copy the raw `base` of one slot to another
    #[inline]
    pub fn copy_base(&mut self, from: usize, to: usize) {
        self.base[to] = self.base[from];
    }

    /// Child offset of an inner state, `None` for terminal slots
    #[inline]
    pub fn offset(&self, state: usize) -> Option<usize> {
        match self.entry(state) {
            BaseEntry::Offset(offset) if offset > 0 => Some(offset as usize),
            _ => None,
        }
    }

    /// Whether `state` is in the free list
    #[inline]
    pub fn is_vacant(&self, state: usize) -> bool {
        state > ROOT && self.check[state] <= 0
    }

    /// Whether `state` is the root or an allocated slot
    #[inline]
    pub fn is_occupied(&self, state: usize) -> bool {
        state == ROOT || (state > ROOT && state < self.len() && self.check[state] > 0)
    }

    /// Follow the transition for `id`, if present
    #[inline]
    pub fn child(&self, state: usize, id: u32) -> Option<usize> {
        let target = self.offset(state)? + id as usize;
        if target < self.len() && self.check[target] == state as i32 {
            Some(target)
        } else {
            None
        }
    }

    /// Ids of all transitions leaving `state`, ascending
    pub fn child_ids(&self, state: usize, alphabet_size: u32) -> Vec<u32> {
        let Some(offset) = self.offset(state) else {
            return Vec::new();
        };
        (0..alphabet_size)
            .take_while(|&id| offset + (id as usize) < self.len())
            .filter(|&id| self.check[offset + id as usize] == state as i32)
            .collect()
    }

    /// Whether any transition leaves `state`
    pub fn has_children(&self, state: usize, alphabet_size: u32) -> bool {
        let Some(offset) = self.offset(state) else {
            return false;
        };
        (0..alphabet_size)
            .map(|id| offset + id as usize)
            .take_while(|&target| target < self.len())
            .any(|target| self.check[target] == state as i32)
    }

    /// Append `state` to the tail of the free list
    pub fn link_free(&mut self, state: usize) {
        let tail = (-self.base[SENTINEL]) as usize;
        self.check[state] = self.check[tail];
        self.check[tail] = -(state as i32);
        self.base[state] = self.base[SENTINEL];
        self.base[SENTINEL] = -(state as i32);
    }

    /// Remove `state` from the free list
    pub fn unlink_free(&mut self, state: usize) {
        let next = (-self.check[state]) as usize;
        let prev = (-self.base[state]) as usize;
        self.base[next] = self.base[state];
        self.check[prev] = self.check[state];
    }

    /// Make `max_index` addressable, failing at the address ceiling
    pub fn grow_to(&mut self, max_index: usize) -> Result<()> {
        if max_index < self.len() {
            return Ok(());
        }
        if max_index >= MAX_STATES {
            log::warn!(
                "double array cannot address state {}, ceiling is {}",
                max_index,
                MAX_STATES
            );
            return Err(DatrieError::capacity_exceeded(max_index, MAX_STATES));
        }
        self.extend_to(max_index);
        Ok(())
    }

    /// Grow by one growth chunk, returning the previous length
    pub fn grow_chunk(&mut self) -> Result<usize> {
        let old_len = self.len();
        self.grow_to(old_len + self.growth_chunk() - 1)?;
        Ok(old_len)
    }

    fn extend_to(&mut self, max_index: usize) {
        let old_len = self.len();
        while self.len() <= max_index {
            let state = self.len();
            self.base.push(0);
            self.check.push(0);
            self.link_free(state);
        }
        if self.len() > old_len {
            log::debug!("double array grew from {} to {} slots", old_len, self.len());
        }
    }

    /// Iterate the free list from head to tail
    pub fn free_slots(&self) -> FreeSlots<'_> {
        FreeSlots {
            array: self,
            current: SENTINEL,
        }
    }

    /// Bytes held by the two arrays
    pub fn memory_usage(&self) -> usize {
        (self.base.len() + self.check.len()) * std::mem::size_of::<i32>()
    }
}

impl std::fmt::Debug for DoubleArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DoubleArray")
            .field("base", &self.base)
            .field("check", &self.check)
            .finish()
    }
}

/// Iterator over free slots in list order
pub(crate) struct FreeSlots<'a> {
    array: &'a DoubleArray,
    current: usize,
}

impl Iterator for FreeSlots<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let next = (-self.array.check[self.current]) as usize;
        if next == SENTINEL {
            return None;
        }
        self.current = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_list_consistent(array: &DoubleArray) {
        let slots: Vec<usize> = array.free_slots().collect();
        let vacant: Vec<usize> = (ROOT + 1..array.len()).filter(|&s| array.is_vacant(s)).collect();
        let mut sorted = slots.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vacant);

        let mut prev = SENTINEL;
        for &slot in &slots {
            assert_eq!(-array.base[slot], prev as i32);
            prev = slot;
        }
        assert_eq!(-array.base[SENTINEL], prev as i32);
    }

    #[test]
    fn test_new_layout() {
        let array = DoubleArray::new(8, 4);
        assert_eq!(array.len(), 8);
        assert_eq!(array.entry(ROOT), BaseEntry::Offset(1));
        assert_eq!(array.check(ROOT), 0);
        assert!(!array.is_vacant(ROOT));
        assert!(array.is_occupied(ROOT));
        assert_eq!(array.free_slots().collect::<Vec<_>>(), vec![2, 3, 4, 5, 6, 7]);
        assert_list_consistent(&array);
    }

    #[test]
    fn test_tiny_initial_size_is_clamped() {
        let array = DoubleArray::new(0, 4);
        assert_eq!(array.len(), 2);
        assert_eq!(array.free_slots().count(), 0);
    }

    #[test]
    fn test_unlink_and_relink() {
        let mut array = DoubleArray::new(6, 4);
        array.unlink_free(3);
        array.set_check(3, ROOT);
        assert_eq!(array.free_slots().collect::<Vec<_>>(), vec![2, 4, 5]);
        assert_list_consistent(&array);

        array.unlink_free(5);
        array.set_check(5, ROOT);
        array.unlink_free(2);
        array.set_check(2, ROOT);
        assert_eq!(array.free_slots().collect::<Vec<_>>(), vec![4]);

        array.link_free(3);
        assert_eq!(array.free_slots().collect::<Vec<_>>(), vec![4, 3]);
        assert_list_consistent(&array);
    }

    #[test]
    fn test_empty_list_then_link() {
        let mut array = DoubleArray::new(3, 4);
        array.unlink_free(2);
        array.set_check(2, ROOT);
        assert_eq!(array.free_slots().count(), 0);
        assert_eq!(array.check(SENTINEL), 0);

        array.link_free(2);
        assert_eq!(array.free_slots().collect::<Vec<_>>(), vec![2]);
        assert_list_consistent(&array);
    }

    #[test]
    fn test_growth_links_new_slots() {
        let mut array = DoubleArray::new(4, 3);
        array.grow_to(9).unwrap();
        assert_eq!(array.len(), 10);
        assert_list_consistent(&array);

        let old = array.grow_chunk().unwrap();
        assert_eq!(old, 10);
        assert_eq!(array.len(), 13);
        assert_list_consistent(&array);
    }

    #[test]
    fn test_grow_past_ceiling() {
        let mut array = DoubleArray::new(4, 3);
        match array.grow_to(MAX_STATES) {
            Err(DatrieError::CapacityExceeded { requested, limit }) => {
                assert_eq!(requested, MAX_STATES);
                assert_eq!(limit, MAX_STATES);
            }
            other => panic!("expected CapacityExceeded, got {:?}", other),
        }
        assert_eq!(array.len(), 4);
    }

    #[test]
    fn test_base_entry_encoding() {
        assert_eq!(BaseEntry::decode(BaseEntry::Value(0).encode()), BaseEntry::Value(0));
        assert_eq!(
            BaseEntry::decode(BaseEntry::Value(MAX_VALUE).encode()),
            BaseEntry::Value(MAX_VALUE)
        );
        assert_eq!(BaseEntry::decode(42), BaseEntry::Offset(42));
    }

    #[test]
    fn test_children() {
        let mut array = DoubleArray::new(16, 4);
        for id in [2u32, 5] {
            let target = ROOT + id as usize;
            array.unlink_free(target);
            array.set_check(target, ROOT);
            array.set_entry(target, BaseEntry::Value(id));
        }
        assert_eq!(array.child_ids(ROOT, 8), vec![2, 5]);
        assert!(array.has_children(ROOT, 8));
        assert_eq!(array.child(ROOT, 5), Some(6));
        assert_eq!(array.child(ROOT, 4), None);
        assert_eq!(array.offset(3), None);
        assert!(!array.has_children(3, 8));
        assert_list_consistent(&array);
    }
}
