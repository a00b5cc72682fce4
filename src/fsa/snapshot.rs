//! Snapshot and restore of the trie arrays
//!
//! A [`TrieSnapshot`] carries the raw `base`/`check` contents and the key
//! count. Restoring validates the layout before the arrays are trusted: array
//! lengths, the sentinel and root slots, the free list, every parent link and
//! the number of terminal slots.

use crate::config::{Config, DatrieConfig};
use crate::error::{DatrieError, Result};
use crate::fsa::double_array::{BaseEntry, DoubleArray, LEAF_BIT, MAX_STATES, ROOT, SENTINEL};
use crate::fsa::double_array_trie::DoubleArrayTrie;
use crate::mapping::TransitionIds;
use serde::{Deserialize, Serialize};

/// Raw array contents of a [`DoubleArrayTrie`]
///
/// # Examples
///
/// ```rust
/// use datrie::{DatrieConfig, DoubleArrayTrie, TrieSnapshot, Utf8Mapping};
///
/// let mut trie = DoubleArrayTrie::new();
/// trie.cover_insert("key", 9).unwrap();
///
/// let json = serde_json::to_string(&trie.snapshot()).unwrap();
/// let snapshot: TrieSnapshot = serde_json::from_str(&json).unwrap();
/// let restored = DoubleArrayTrie::from_snapshot(snapshot, DatrieConfig::default(), Utf8Mapping).unwrap();
/// assert_eq!(restored.get("key"), Some(9));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrieSnapshot {
    /// `base` array
    pub base: Vec<i32>,
    /// `check` array
    pub check: Vec<i32>,
    /// Number of stored keys
    pub num_keys: usize,
}

impl TrieSnapshot {
    /// Check the snapshot against a mapping's id range
    pub fn validate(&self, alphabet_size: u32, terminator_id: u32) -> Result<()> {
        let len = self.base.len();
        if len != self.check.len() {
            return Err(corrupt(format!(
                "base has {} slots but check has {}",
                len,
                self.check.len()
            )));
        }
        if len <= ROOT || len > MAX_STATES {
            return Err(corrupt(format!("array length {} out of range", len)));
        }
        if self.check[ROOT] != 0 || self.base[ROOT] <= 0 || self.base[ROOT] & LEAF_BIT != 0 {
            return Err(corrupt("root slot is not an inner state"));
        }

        let free = self.validate_free_list()?;
        let vacant = (ROOT + 1..len).filter(|&s| self.check[s] <= 0).count();
        if free != vacant {
            return Err(corrupt(format!(
                "free list holds {} slots but {} slots are vacant",
                free, vacant
            )));
        }

        let mut terminals = 0;
        for state in ROOT + 1..len {
            let parent = self.check[state];
            if parent <= 0 {
                continue;
            }
            let parent = parent as usize;
            if parent >= len || (parent != ROOT && self.check[parent] <= 0) {
                return Err(corrupt(format!("state {} has dead parent {}", state, parent)));
            }
            let offset = match BaseEntry::decode(self.base[parent]) {
                BaseEntry::Offset(offset) if offset > 0 => offset as usize,
                _ => return Err(corrupt(format!("parent {} of state {} is a terminal slot", parent, state))),
            };
            if state < offset || state - offset >= alphabet_size as usize {
                return Err(corrupt(format!(
                    "state {} is not reachable from parent {} with base {}",
                    state, parent, offset
                )));
            }
            let id = state - offset;
            match BaseEntry::decode(self.base[state]) {
                BaseEntry::Value(_) if id == terminator_id as usize => terminals += 1,
                BaseEntry::Offset(child_offset) if child_offset > 0 && id != terminator_id as usize => {}
                _ => return Err(corrupt(format!("state {} has an invalid base entry", state))),
            }
        }

        if terminals != self.num_keys {
            return Err(corrupt(format!(
                "{} terminal slots but {} keys recorded",
                terminals, self.num_keys
            )));
        }
        Ok(())
    }

    /// Walk the free list, returning its length
    fn validate_free_list(&self) -> Result<usize> {
        let len = self.base.len();
        let mut visited = vec![false; len];
        let mut prev = SENTINEL;
        let mut count = 0;
        loop {
            let next = self.check[prev];
            if next > 0 {
                return Err(corrupt(format!("free slot {} links into occupied slot {}", prev, next)));
            }
            let next = next.unsigned_abs() as usize;
            if next == SENTINEL {
                break;
            }
            if next <= ROOT || next >= len || visited[next] {
                return Err(corrupt(format!("free list revisits or escapes at slot {}", next)));
            }
            if self.base[next] != -(prev as i32) {
                return Err(corrupt(format!("free slot {} has a broken back link", next)));
            }
            visited[next] = true;
            prev = next;
            count += 1;
        }
        if self.base[SENTINEL] != -(prev as i32) {
            return Err(corrupt("free list tail does not match the sentinel"));
        }
        Ok(count)
    }
}

fn corrupt<S: Into<String>>(message: S) -> DatrieError {
    DatrieError::invalid_data(message)
}

impl<M: TransitionIds> DoubleArrayTrie<M> {
    /// Copy out the arrays and the key count
    pub fn snapshot(&self) -> TrieSnapshot {
        TrieSnapshot {
            base: self.array().base_raw().to_vec(),
            check: self.array().check_raw().to_vec(),
            num_keys: self.len(),
        }
    }

    /// Rebuild a trie from a snapshot taken with the same mapping
    ///
    /// `config.growth_chunk` applies to future growth; `initial_size` is
    /// ignored since the arrays already exist.
    pub fn from_snapshot(snapshot: TrieSnapshot, config: DatrieConfig, mapping: M) -> Result<Self> {
        config.validate()?;
        snapshot.validate(mapping.alphabet_size(), mapping.terminator_id())?;
        log::debug!(
            "restoring trie with {} keys over {} slots",
            snapshot.num_keys,
            snapshot.base.len()
        );
        let TrieSnapshot { base, check, num_keys } = snapshot;
        let array = DoubleArray::from_raw(base, check, config.growth_chunk);
        Ok(Self::from_parts(array, num_keys, mapping, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::Utf8Mapping;

    fn sample() -> DoubleArrayTrie {
        let config = DatrieConfig {
            initial_size: 32,
            growth_chunk: 16,
        };
        let mut trie = DoubleArrayTrie::with_config(config, Utf8Mapping).unwrap();
        for (i, key) in ["a", "ab", "abc", "b", "bcd"].iter().enumerate() {
            trie.cover_insert(key, i as u32).unwrap();
        }
        trie.delete("ab");
        trie
    }

    #[test]
    fn test_round_trip() {
        let trie = sample();
        let snapshot = trie.snapshot();
        assert!(snapshot.validate(256, 0).is_ok());

        let mut restored =
            DoubleArrayTrie::from_snapshot(snapshot, trie.config().clone(), Utf8Mapping).unwrap();
        assert_eq!(restored.len(), 4);
        assert_eq!(restored.get("abc"), Some(2));
        assert_eq!(restored.get("ab"), None);
        assert_eq!(restored.free_slots(), trie.free_slots());

        restored.cover_insert("ab", 9).unwrap();
        assert_eq!(restored.get("ab"), Some(9));
    }

    #[test]
    fn test_length_mismatch() {
        let mut snapshot = sample().snapshot();
        snapshot.check.pop();
        assert!(matches!(snapshot.validate(256, 0), Err(DatrieError::InvalidData { .. })));
    }

    #[test]
    fn test_key_count_mismatch() {
        let mut snapshot = sample().snapshot();
        snapshot.num_keys += 1;
        assert!(snapshot.validate(256, 0).is_err());
    }

    #[test]
    fn test_free_list_cycle() {
        let mut snapshot = sample().snapshot();
        let head = (-snapshot.check[SENTINEL]) as usize;
        snapshot.check[head] = -(head as i32);
        assert!(snapshot.validate(256, 0).is_err());
    }

    #[test]
    fn test_orphaned_free_slot() {
        let mut snapshot = sample().snapshot();
        // Unlink the tail without clearing it
        let tail = (-snapshot.base[SENTINEL]) as usize;
        let prev = (-snapshot.base[tail]) as usize;
        snapshot.check[prev] = 0;
        snapshot.base[SENTINEL] = -(prev as i32);
        assert!(snapshot.validate(256, 0).is_err());
    }

    #[test]
    fn test_broken_parent() {
        let trie = sample();
        let mut snapshot = trie.snapshot();
        let occupied = (ROOT + 1..snapshot.check.len())
            .find(|&s| snapshot.check[s] > 0)
            .unwrap();
        snapshot.check[occupied] = snapshot.check.len() as i32 + 5;
        assert!(snapshot.validate(256, 0).is_err());
    }

    #[test]
    fn test_bad_root() {
        let mut snapshot = sample().snapshot();
        snapshot.base[ROOT] = 5 | LEAF_BIT;
        assert!(snapshot.validate(256, 0).is_err());
    }
}
