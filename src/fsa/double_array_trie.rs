//! Updatable Double Array Trie mapping strings to integers
//!
//! The whole trie lives in two flat arrays, `base` and `check`. For a state
//! `s` and transition id `c`:
//!
//! ```text
//! next_state = base[s] + c
//! if check[next_state] == s then transition is valid
//! ```
//!
//! Keys are converted to transition ids by a [`TransitionIds`] mapping and
//! terminated by the terminator id. The slot reached by the terminator edge
//! stores the value in its `base` entry, tagged with a high bit.
//!
//! # Insertion
//!
//! A new inner state gets a base chosen from the free list so that the slot of
//! its first child is vacant. Later siblings are not checked up front; when a
//! sibling's slot turns out to be taken by another parent, the existing
//! children of the inserting state are moved to a base where all of them plus
//! the new id fit, and the insertion is retried.
//!
//! # Deletion
//!
//! Deleting a key frees its terminal slot and then every ancestor that has no
//! remaining children, walking back towards the root.
//!
//! # Performance Characteristics
//!
//! - **Lookup**: O(k) for k transition ids
//! - **Insert**: O(k) plus free-list scans, alphabet-bounded relocations on collision
//! - **Delete**: O(k × alphabet) for the childless checks
//! - **Memory**: 8 bytes per array slot

use crate::config::{Config, DatrieConfig};
use crate::error::{DatrieError, Result};
use crate::fsa::double_array::{BaseEntry, DoubleArray, MAX_VALUE, ROOT};
use crate::fsa::iterator::{CommonPrefixIter, Cursor, Iter, Walker};
use crate::fsa::traits::{StatisticsProvider, TrieStats};
use crate::mapping::{DecodeIds, TransitionIds, Utf8Mapping, TERMINATOR_CHAR};
use crate::StateId;

/// A stored key that is a prefix of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixMatch {
    /// Length of the matched key in bytes
    pub len: usize,
    /// Value stored for the matched key
    pub value: u32,
}

/// Result of a single [`DoubleArrayTrie::walk_trie`] step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walk {
    /// State reached after consuming the character
    pub state: StateId,
    /// Value of the key ending at `state`, if one does
    pub value: Option<u32>,
}

/// Updatable double-array trie from strings to values in `0..=MAX_VALUE`
///
/// # Examples
///
/// ```rust
/// use datrie::DoubleArrayTrie;
///
/// let mut trie = DoubleArrayTrie::new();
/// trie.cover_insert("a", 2).unwrap();
/// trie.cover_insert("abc", 1).unwrap();
/// trie.cover_insert("abd", 3).unwrap();
///
/// let hit = trie.find("abd", 0).unwrap();
/// assert_eq!((hit.len, hit.value), (3, 3));
/// let hit = trie.find("ab", 0).unwrap();
/// assert_eq!((hit.len, hit.value), (1, 2));
///
/// assert_eq!(trie.delete("abc"), Some(1));
/// assert_eq!(trie.get("abc"), None);
/// ```
#[derive(Clone)]
pub struct DoubleArrayTrie<M = Utf8Mapping> {
    array: DoubleArray,
    num_keys: usize,
    mapping: M,
    config: DatrieConfig,
}

impl DoubleArrayTrie<Utf8Mapping> {
    /// Create an empty trie with the byte mapping and default sizing
    pub fn new() -> Self {
        Self::with_mapping(Utf8Mapping)
    }
}

impl Default for DoubleArrayTrie<Utf8Mapping> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: TransitionIds> DoubleArrayTrie<M> {
    /// Create an empty trie over a custom mapping with default sizing
    ///
    /// # Examples
    ///
    /// ```rust
    /// use datrie::{DoubleArrayTrie, HighFreqRangeMapping};
    ///
    /// let mut trie = DoubleArrayTrie::with_mapping(HighFreqRangeMapping::default());
    /// trie.cover_insert("\u{4eca}\u{5929}", 7).unwrap();
    /// assert_eq!(trie.get("\u{4eca}\u{5929}"), Some(7));
    /// ```
    pub fn with_mapping(mapping: M) -> Self {
        let config = DatrieConfig::default();
        let array = DoubleArray::new(config.initial_size, config.growth_chunk);
        Self::from_parts(array, 0, mapping, config)
    }

    /// Create an empty trie with explicit array sizing
    pub fn with_config(config: DatrieConfig, mapping: M) -> Result<Self> {
        config.validate()?;
        let array = DoubleArray::new(config.initial_size, config.growth_chunk);
        Ok(Self::from_parts(array, 0, mapping, config))
    }

    pub(crate) fn from_parts(array: DoubleArray, num_keys: usize, mapping: M, config: DatrieConfig) -> Self {
        Self {
            array,
            num_keys,
            mapping,
            config,
        }
    }

    /// Number of stored keys
    #[inline]
    pub fn len(&self) -> usize {
        self.num_keys
    }

    /// Whether no key is stored
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_keys == 0
    }

    /// The root state, starting point for [`walk_trie`](Self::walk_trie)
    #[inline]
    pub fn root(&self) -> StateId {
        ROOT as StateId
    }

    /// Length of the `base`/`check` arrays
    #[inline]
    pub fn array_len(&self) -> usize {
        self.array.len()
    }

    /// Number of slots in the free list
    pub fn free_slots(&self) -> usize {
        self.array.free_slots().count()
    }

    /// Largest storable value
    #[inline]
    pub fn max_value(&self) -> u32 {
        MAX_VALUE
    }

    /// The transition-id mapping
    #[inline]
    pub fn mapping(&self) -> &M {
        &self.mapping
    }

    /// The array sizing configuration
    #[inline]
    pub fn config(&self) -> &DatrieConfig {
        &self.config
    }

    #[inline]
    pub(crate) fn array(&self) -> &DoubleArray {
        &self.array
    }

    /// Insert `key`, replacing the value of an existing key
    pub fn cover_insert(&mut self, key: &str, value: u32) -> Result<bool> {
        self.insert(key, value, true)
    }

    /// Insert `key`, keeping the value of an existing key
    pub fn uncover_insert(&mut self, key: &str, value: u32) -> Result<bool> {
        self.insert(key, value, false)
    }

    /// Insert `key` with `value`
    ///
    /// Returns `Ok(true)` when a new entry was created. For an existing key the
    /// value is replaced only when `overwrite` is set.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` without touching the trie when the key is empty,
    /// contains `'\0'`, or `value` exceeds [`MAX_VALUE`]. `CapacityExceeded`
    /// when the arrays would outgrow the address space; the trie should then
    /// be discarded.
    pub fn insert(&mut self, key: &str, value: u32, overwrite: bool) -> Result<bool> {
        validate_key(key)?;
        if value > MAX_VALUE {
            return Err(DatrieError::invalid_argument(format!(
                "value {} exceeds the maximum of {}",
                value, MAX_VALUE
            )));
        }

        let mut ids = self.mapping.ids_for_str(key);
        ids.push(self.mapping.terminator_id());
        let last = ids.len() - 1;

        let mut from = ROOT;
        let mut created = false;
        let mut i = 0;
        while i < ids.len() {
            let id = ids[i];
            let offset = self.inner_offset(from)?;
            let to = offset + id as usize;
            self.array.grow_to(to)?;

            if self.array.is_vacant(to) {
                self.array.unlink_free(to);
                self.array.set_check(to, from);
                if i == last {
                    self.array.set_entry(to, BaseEntry::Value(value));
                    self.num_keys += 1;
                    created = true;
                } else {
                    let base = self.next_free_base(ids[i + 1])?;
                    self.array.set_entry(to, BaseEntry::Offset(base));
                }
            } else if self.array.check(to) != from as i32 {
                self.resolve_conflict(from, id)?;
                continue;
            } else if i == last && overwrite {
                self.array.set_entry(to, BaseEntry::Value(value));
            }

            from = to;
            i += 1;
        }
        Ok(created)
    }

    fn inner_offset(&self, state: usize) -> Result<usize> {
        self.array.offset(state).ok_or_else(|| {
            DatrieError::invalid_data(format!("state {} has no child offset", state))
        })
    }

    /// Base for a fresh state whose first child will use `next_id`
    fn next_free_base(&mut self, next_id: u32) -> Result<i32> {
        let next_id = next_id as usize;
        if let Some(slot) = self.array.free_slots().find(|&slot| slot > next_id + 1) {
            return Ok((slot - next_id) as i32);
        }
        let old_len = self.array.grow_chunk()?;
        Ok(old_len as i32)
    }

    /// Base at which every id in `ids` (ascending) lands on a vacant slot
    fn relocation_base(&mut self, ids: &[u32]) -> Result<usize> {
        let (Some(&min_id), Some(&max_id)) = (ids.first(), ids.last()) else {
            return Err(DatrieError::invalid_argument("no transition ids to place"));
        };
        let min_id = min_id as usize;

        let len = self.array.len();
        let found = self.array.free_slots().find_map(|slot| {
            if slot <= min_id + 1 {
                return None;
            }
            let base = slot - min_id;
            ids.iter()
                .map(|&id| base + id as usize)
                .all(|target| target < len && self.array.is_vacant(target))
                .then_some(base)
        });
        if let Some(base) = found {
            return Ok(base);
        }

        let old_len = self.array.len();
        self.array.grow_to(old_len + max_id as usize)?;
        Ok(old_len)
    }

    /// Move the children of `parent` so that `new_id` gets a vacant slot
    fn resolve_conflict(&mut self, parent: usize, new_id: u32) -> Result<()> {
        let alphabet = self.mapping.alphabet_size();
        let old_base = self.inner_offset(parent)?;
        let children = self.array.child_ids(parent, alphabet);
        log::trace!(
            "collision at state {} for id {}, relocating {} children",
            parent,
            new_id,
            children.len()
        );

        let mut ids = children.clone();
        ids.push(new_id);
        ids.sort_unstable();
        let new_base = self.relocation_base(&ids)?;

        for &id in &children {
            let old_state = old_base + id as usize;
            let new_state = new_base + id as usize;

            self.array.unlink_free(new_state);
            self.array.set_check(new_state, parent);
            self.array.copy_base(old_state, new_state);

            if let Some(grand_base) = self.array.offset(new_state) {
                for grand_id in 0..alphabet {
                    let grandchild = grand_base + grand_id as usize;
                    if grandchild >= self.array.len() {
                        break;
                    }
                    if self.array.check(grandchild) == old_state as i32 {
                        self.array.set_check(grandchild, new_state);
                    }
                }
            }
            self.array.link_free(old_state);
        }

        self.array.set_entry(parent, BaseEntry::Offset(new_base as i32));
        log::debug!(
            "relocated {} children of state {} from base {} to {}",
            children.len(),
            parent,
            old_base,
            new_base
        );
        Ok(())
    }

    /// Follow all ids of `ch` from `state`
    pub(crate) fn step(&self, state: usize, ch: char, buf: &mut Vec<u32>) -> Option<usize> {
        if ch == TERMINATOR_CHAR {
            return None;
        }
        buf.clear();
        self.mapping.ids_for_char(ch, buf);
        buf.iter().try_fold(state, |current, &id| self.array.child(current, id))
    }

    /// Value of the key ending at `state`, if any
    pub(crate) fn terminal_value(&self, state: usize) -> Option<u32> {
        let slot = self.array.child(state, self.mapping.terminator_id())?;
        match self.array.entry(slot) {
            BaseEntry::Value(value) => Some(value),
            BaseEntry::Offset(_) => None,
        }
    }

    /// State reached by consuming all of `key`, without the terminator
    fn walk_str(&self, key: &str) -> Option<usize> {
        let mut buf = Vec::with_capacity(4);
        key.chars()
            .try_fold(ROOT, |state, ch| self.step(state, ch, &mut buf))
    }

    /// Exact lookup
    pub fn get(&self, key: &str) -> Option<u32> {
        if key.is_empty() {
            return None;
        }
        self.terminal_value(self.walk_str(key)?)
    }

    /// Whether `key` is stored
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Longest stored key that is a prefix of `query[start..]`
    ///
    /// `start` and the returned length are byte offsets. Returns `None` when
    /// nothing matches or `start` is past the end or not on a char boundary.
    pub fn find(&self, query: &str, start: usize) -> Option<PrefixMatch> {
        self.common_prefixes(query, start).last()
    }

    /// Every stored key that is a prefix of `query[start..]`, shortest first
    pub fn find_all(&self, query: &str, start: usize) -> Vec<PrefixMatch> {
        self.common_prefixes(query, start).collect()
    }

    /// Lazy form of [`find_all`](Self::find_all)
    pub fn common_prefixes<'a>(&'a self, query: &'a str, start: usize) -> CommonPrefixIter<'a, M> {
        let rest = if start < query.len() {
            query.get(start..)
        } else {
            None
        };
        CommonPrefixIter::new(self, rest.unwrap_or(""))
    }

    /// Consume one character from `state`
    ///
    /// Returns `None` when `state` is not a live state, when `ch` is `'\0'`,
    /// or when no transition exists.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use datrie::DoubleArrayTrie;
    ///
    /// let mut trie = DoubleArrayTrie::new();
    /// trie.cover_insert("ab", 5).unwrap();
    ///
    /// let a = trie.walk_trie(trie.root(), 'a').unwrap();
    /// assert_eq!(a.value, None);
    /// let ab = trie.walk_trie(a.state, 'b').unwrap();
    /// assert_eq!(ab.value, Some(5));
    /// assert!(trie.walk_trie(ab.state, 'c').is_none());
    /// ```
    pub fn walk_trie(&self, state: StateId, ch: char) -> Option<Walk> {
        let state = state as usize;
        if state < ROOT || !self.array.is_occupied(state) {
            return None;
        }
        let mut buf = Vec::with_capacity(4);
        let next = self.step(state, ch, &mut buf)?;
        Some(Walk {
            state: next as StateId,
            value: self.terminal_value(next),
        })
    }

    /// Remove `key`, returning its value
    pub fn delete(&mut self, key: &str) -> Option<u32> {
        if validate_key(key).is_err() {
            return None;
        }

        let mut buf = Vec::with_capacity(4);
        let mut path = Vec::with_capacity(key.len() + 1);
        let mut state = ROOT;
        for ch in key.chars() {
            buf.clear();
            self.mapping.ids_for_char(ch, &mut buf);
            for &id in &buf {
                state = self.array.child(state, id)?;
                path.push(state);
            }
        }

        let slot = self.array.child(state, self.mapping.terminator_id())?;
        let value = match self.array.entry(slot) {
            BaseEntry::Value(value) => value,
            BaseEntry::Offset(_) => return None,
        };

        self.array.link_free(slot);
        self.num_keys -= 1;

        let alphabet = self.mapping.alphabet_size();
        for &state in path.iter().rev() {
            if self.array.has_children(state, alphabet) {
                break;
            }
            self.array.link_free(state);
        }
        Some(value)
    }

    /// Walker positioned on the subtree of `prefix`
    fn prefix_walker(&self, prefix: &str) -> Walker {
        if prefix.contains(TERMINATOR_CHAR) {
            return Walker::empty();
        }
        match self.walk_str(prefix) {
            Some(state) => Walker::new(state, self.mapping.ids_for_str(prefix)),
            None => Walker::empty(),
        }
    }
}

impl<M: DecodeIds> DoubleArrayTrie<M> {
    /// All `(key, value)` pairs in ascending id order
    ///
    /// With [`Utf8Mapping`] the order is lexicographic.
    pub fn iter(&self) -> Iter<'_, M> {
        Iter::new(self, Walker::new(ROOT, Vec::new()))
    }

    /// Pairs whose key starts with `prefix`, in ascending id order
    pub fn iter_prefix(&self, prefix: &str) -> Iter<'_, M> {
        Iter::new(self, self.prefix_walker(prefix))
    }

    /// Keys starting with `prefix`
    pub fn prefix_match(&self, prefix: &str) -> Vec<String> {
        self.iter_prefix(prefix).map(|(key, _)| key).collect()
    }

    /// Cursor over all entries that can rewrite values in place
    ///
    /// # Examples
    ///
    /// ```rust
    /// use datrie::DoubleArrayTrie;
    ///
    /// let mut trie = DoubleArrayTrie::new();
    /// trie.cover_insert("x", 1).unwrap();
    /// trie.cover_insert("y", 2).unwrap();
    ///
    /// let mut cursor = trie.cursor();
    /// while cursor.advance() {
    ///     let doubled = cursor.value().unwrap() * 2;
    ///     cursor.set_value(doubled).unwrap();
    /// }
    /// assert_eq!(trie.get("y"), Some(4));
    /// ```
    pub fn cursor(&mut self) -> Cursor<'_, M> {
        Cursor::new(self, Walker::new(ROOT, Vec::new()))
    }

    pub(crate) fn set_terminal_value(&mut self, slot: usize, value: u32) {
        self.array.set_entry(slot, BaseEntry::Value(value));
    }
}

impl<'a, M: DecodeIds> IntoIterator for &'a DoubleArrayTrie<M> {
    type Item = (String, u32);
    type IntoIter = Iter<'a, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<M: TransitionIds> StatisticsProvider for DoubleArrayTrie<M> {
    fn stats(&self) -> TrieStats {
        let array_len = self.array.len();
        let free_slots = self.free_slots();
        let num_states = array_len.saturating_sub(free_slots + 1);

        let mut stats = TrieStats {
            num_states,
            num_keys: self.num_keys,
            num_transitions: num_states.saturating_sub(1),
            free_slots,
            array_len,
            memory_usage: self.array.memory_usage(),
            bits_per_key: 0.0,
        };
        stats.calculate_bits_per_key();
        stats
    }
}

impl<M: std::fmt::Debug> std::fmt::Debug for DoubleArrayTrie<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DoubleArrayTrie")
            .field("array", &self.array)
            .field("num_keys", &self.num_keys)
            .field("mapping", &self.mapping)
            .field("config", &self.config)
            .finish()
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(DatrieError::invalid_argument("key must not be empty"));
    }
    if key.contains(TERMINATOR_CHAR) {
        return Err(DatrieError::invalid_argument(
            "key must not contain the terminator character '\\0'",
        ));
    }
    Ok(())
}
