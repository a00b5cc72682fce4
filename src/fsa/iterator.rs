//! Traversal over a [`DoubleArrayTrie`]
//!
//! [`Iter`] and [`Cursor`] share a depth-first [`Walker`] that visits
//! children in ascending id order. Since the terminator id is the smallest id,
//! a key is produced before any of its extensions. [`CommonPrefixIter`] walks a
//! single path along a query string instead.

use crate::error::{DatrieError, Result};
use crate::fsa::double_array::{BaseEntry, DoubleArray, MAX_VALUE};
use crate::fsa::double_array_trie::{DoubleArrayTrie, PrefixMatch};
use crate::mapping::{DecodeIds, TransitionIds};
use std::str::CharIndices;

#[derive(Debug, Clone, Copy)]
struct Frame {
    state: usize,
    next_id: u32,
}

/// Depth-first walk yielding terminal slots
///
/// Holds no borrow of the trie, so a cursor can keep it next to a mutable
/// reference.
#[derive(Debug, Clone)]
pub(crate) struct Walker {
    stack: Vec<Frame>,
    path: Vec<u32>,
}

impl Walker {
    /// Walk the subtree below `state`; `path` holds the ids leading to it
    pub fn new(state: usize, path: Vec<u32>) -> Self {
        Self {
            stack: vec![Frame { state, next_id: 0 }],
            path,
        }
    }

    /// A walker that yields nothing
    pub fn empty() -> Self {
        Self {
            stack: Vec::new(),
            path: Vec::new(),
        }
    }

    /// Ids from the root to the last yielded terminal slot, terminator excluded
    pub fn path(&self) -> &[u32] {
        &self.path
    }

    /// Advance to the next terminal slot
    pub fn next_terminal(&mut self, array: &DoubleArray, alphabet_size: u32, terminator: u32) -> Option<usize> {
        loop {
            let frame = self.stack.last_mut()?;
            let state = frame.state;

            let found = array.offset(state).and_then(|offset| {
                (frame.next_id..alphabet_size)
                    .map(|id| (id, offset + id as usize))
                    .take_while(|&(_, target)| target < array.len())
                    .find(|&(_, target)| array.check(target) == state as i32)
            });

            match found {
                Some((id, target)) => {
                    frame.next_id = id + 1;
                    if id == terminator {
                        return Some(target);
                    }
                    self.path.push(id);
                    self.stack.push(Frame {
                        state: target,
                        next_id: 0,
                    });
                }
                None => {
                    self.stack.pop();
                    if !self.stack.is_empty() {
                        self.path.pop();
                    }
                }
            }
        }
    }
}

fn slot_value(array: &DoubleArray, slot: usize) -> Option<u32> {
    match array.entry(slot) {
        BaseEntry::Value(value) => Some(value),
        BaseEntry::Offset(_) => None,
    }
}

/// Iterator over `(key, value)` pairs in ascending id order
///
/// Created by [`DoubleArrayTrie::iter`] and [`DoubleArrayTrie::iter_prefix`].
pub struct Iter<'a, M> {
    trie: &'a DoubleArrayTrie<M>,
    walker: Walker,
}

impl<'a, M: DecodeIds> Iter<'a, M> {
    pub(crate) fn new(trie: &'a DoubleArrayTrie<M>, walker: Walker) -> Self {
        Self { trie, walker }
    }
}

impl<M: DecodeIds> Iterator for Iter<'_, M> {
    type Item = (String, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let mapping = self.trie.mapping();
        let array = self.trie.array();
        loop {
            let slot = self.walker.next_terminal(array, mapping.alphabet_size(), mapping.terminator_id())?;
            let value = slot_value(array, slot)?;
            match mapping.decode(self.walker.path()) {
                Some(key) => return Some((key, value)),
                None => log::warn!("skipping undecodable key path {:?}", self.walker.path()),
            }
        }
    }
}

impl<M> std::fmt::Debug for Iter<'_, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Iter").field("walker", &self.walker).finish()
    }
}

/// Position-based traversal that can rewrite the value under it
///
/// The cursor starts before the first entry; call [`advance`](Self::advance)
/// to move onto it. While the cursor lives it holds the trie mutably, so keys
/// cannot be inserted or deleted underneath it.
pub struct Cursor<'a, M> {
    trie: &'a mut DoubleArrayTrie<M>,
    walker: Walker,
    current: Option<usize>,
}

impl<'a, M: DecodeIds> Cursor<'a, M> {
    pub(crate) fn new(trie: &'a mut DoubleArrayTrie<M>, walker: Walker) -> Self {
        Self {
            trie,
            walker,
            current: None,
        }
    }

    /// Move to the next entry, returning `false` once exhausted
    pub fn advance(&mut self) -> bool {
        let mapping = self.trie.mapping();
        self.current =
            self.walker
                .next_terminal(self.trie.array(), mapping.alphabet_size(), mapping.terminator_id());
        self.current.is_some()
    }

    /// Key of the current entry
    pub fn key(&self) -> Option<String> {
        self.current?;
        self.trie.mapping().decode(self.walker.path())
    }

    /// Value of the current entry
    pub fn value(&self) -> Option<u32> {
        slot_value(self.trie.array(), self.current?)
    }

    /// Replace the value of the current entry, returning the previous one
    ///
    /// Fails with `InvalidArgument` when the cursor is not on an entry or
    /// `value` exceeds [`MAX_VALUE`].
    pub fn set_value(&mut self, value: u32) -> Result<u32> {
        let slot = self
            .current
            .ok_or_else(|| DatrieError::invalid_argument("cursor is not positioned on an entry"))?;
        if value > MAX_VALUE {
            return Err(DatrieError::invalid_argument(format!(
                "value {} exceeds the maximum of {}",
                value, MAX_VALUE
            )));
        }
        let previous = slot_value(self.trie.array(), slot)
            .ok_or_else(|| DatrieError::invalid_data(format!("slot {} holds no value", slot)))?;
        self.trie.set_terminal_value(slot, value);
        Ok(previous)
    }
}

impl<M> std::fmt::Debug for Cursor<'_, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("walker", &self.walker)
            .field("current", &self.current)
            .finish()
    }
}

/// Stored keys that are prefixes of a query, shortest first
///
/// Created by [`DoubleArrayTrie::common_prefixes`]. Each match reports its
/// length in bytes from the start offset.
pub struct CommonPrefixIter<'a, M> {
    trie: &'a DoubleArrayTrie<M>,
    chars: CharIndices<'a>,
    state: Option<usize>,
    buf: Vec<u32>,
}

impl<'a, M: TransitionIds> CommonPrefixIter<'a, M> {
    pub(crate) fn new(trie: &'a DoubleArrayTrie<M>, query: &'a str) -> Self {
        Self {
            trie,
            chars: query.char_indices(),
            state: Some(trie.root() as usize),
            buf: Vec::with_capacity(4),
        }
    }
}

impl<M: TransitionIds> Iterator for CommonPrefixIter<'_, M> {
    type Item = PrefixMatch;

    fn next(&mut self) -> Option<PrefixMatch> {
        let mut state = self.state?;
        for (pos, ch) in self.chars.by_ref() {
            match self.trie.step(state, ch, &mut self.buf) {
                Some(next) => state = next,
                None => break,
            }
            self.state = Some(state);
            if let Some(value) = self.trie.terminal_value(state) {
                return Some(PrefixMatch {
                    len: pos + ch.len_utf8(),
                    value,
                });
            }
        }
        self.state = None;
        None
    }
}

impl<M> std::fmt::Debug for CommonPrefixIter<'_, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommonPrefixIter")
            .field("remaining", &self.chars.as_str())
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsa::double_array::ROOT;

    fn dictionary() -> DoubleArrayTrie {
        let mut trie = DoubleArrayTrie::new();
        for (key, value) in [("ba", 4), ("bad", 5), ("badd", 6), ("bade", 7), ("abc", 1), ("a", 2), ("abd", 3)] {
            trie.cover_insert(key, value).unwrap();
        }
        trie
    }

    #[test]
    fn test_walker_yields_terminal_slots() {
        let trie = dictionary();
        let mut walker = Walker::new(ROOT, Vec::new());
        let mut count = 0;
        while let Some(slot) = walker.next_terminal(trie.array(), 256, 0) {
            assert!(slot_value(trie.array(), slot).is_some());
            count += 1;
        }
        assert_eq!(count, 7);
        assert!(walker.next_terminal(trie.array(), 256, 0).is_none());
    }

    #[test]
    fn test_empty_walker() {
        let trie = dictionary();
        assert!(Walker::empty().next_terminal(trie.array(), 256, 0).is_none());
        assert_eq!(trie.iter_prefix("zzz").count(), 0);
    }

    #[test]
    fn test_iter_on_empty_trie() {
        let trie = DoubleArrayTrie::new();
        assert_eq!(trie.iter().count(), 0);
    }

    #[test]
    fn test_cursor_walk_and_set_value() {
        let mut trie = dictionary();
        let mut keys = Vec::new();
        {
            let mut cursor = trie.cursor();
            assert_eq!(cursor.key(), None);
            assert!(cursor.set_value(1).is_err());

            while cursor.advance() {
                let key = cursor.key().unwrap();
                let value = cursor.value().unwrap();
                assert_eq!(cursor.set_value(value + 100).unwrap(), value);
                keys.push(key);
            }
            assert!(!cursor.advance());
            assert_eq!(cursor.value(), None);
        }
        assert_eq!(keys, vec!["a", "abc", "abd", "ba", "bad", "badd", "bade"]);
        assert_eq!(trie.get("bade"), Some(107));
        assert_eq!(trie.len(), 7);
    }

    #[test]
    fn test_cursor_rejects_oversized_value() {
        let mut trie = dictionary();
        let mut cursor = trie.cursor();
        assert!(cursor.advance());
        assert!(matches!(
            cursor.set_value(MAX_VALUE + 1),
            Err(DatrieError::InvalidArgument { .. })
        ));
        assert_eq!(cursor.value(), Some(2));
    }

    #[test]
    fn test_common_prefixes_lazy() {
        let trie = dictionary();
        let mut iter = trie.common_prefixes("badde", 0);
        assert_eq!(iter.next(), Some(PrefixMatch { len: 2, value: 4 }));
        assert_eq!(iter.next(), Some(PrefixMatch { len: 3, value: 5 }));
        assert_eq!(iter.next(), Some(PrefixMatch { len: 4, value: 6 }));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }
}
