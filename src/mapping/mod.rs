//! Transition-id mappings
//!
//! The trie engine never looks at characters directly. A [`TransitionIds`]
//! implementation decomposes every code point into one or more small
//! non-negative ids, and the engine adds those ids to `base` offsets. The
//! choice of decomposition trades array density against path length:
//!
//! - [`Utf8Mapping`] - one id per UTF-8 byte, alphabet of 256
//! - [`HighFreqRangeMapping`] - one dense id per character of a frequent range
//!   (CJK by default), escape + UTF-8 bytes for everything else
//! - [`VarIntMapping`] - code point split into 7-bit groups, alphabet of 257
//!
//! Every mapping reserves id 0 for the key terminator, which is the id
//! sequence of `'\0'`. Keys may therefore never contain `'\0'`.

mod high_freq;
mod utf8;
mod varint;

pub use high_freq::HighFreqRangeMapping;
pub use utf8::Utf8Mapping;
pub use varint::VarIntMapping;

/// Character appended to every key to mark its end
pub const TERMINATOR_CHAR: char = '\0';

/// Decomposition of code points into transition ids
///
/// Implementations must be deterministic and total, and must satisfy:
///
/// - `ids_for_char('\0', ..)` appends exactly `[self.terminator_id()]`
/// - no other character produces the terminator id anywhere in its sequence
/// - every produced id is below `alphabet_size()`
/// - the per-character sequences are prefix-free, so concatenations decode
///   unambiguously
pub trait TransitionIds {
    /// Append the ids of one scalar value to `out`
    fn ids_for_char(&self, ch: char, out: &mut Vec<u32>);

    /// Ids of a whole string: the concatenation of its per-character ids
    fn ids_for_str(&self, s: &str) -> Vec<u32> {
        let mut ids = Vec::with_capacity(s.len() + 1);
        for ch in s.chars() {
            self.ids_for_char(ch, &mut ids);
        }
        ids
    }

    /// Reserved id marking the end of a key
    fn terminator_id(&self) -> u32;

    /// Exclusive upper bound on every id this mapping produces
    fn alphabet_size(&self) -> u32;
}

/// Inverse of a [`TransitionIds`] mapping, used to rebuild keys during
/// iteration
pub trait DecodeIds: TransitionIds {
    /// Decode a terminator-free id sequence back into its string
    ///
    /// Returns `None` when `ids` is not a valid concatenation of character
    /// sequences.
    fn decode(&self, ids: &[u32]) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_contract<M: DecodeIds>(mapping: &M, samples: &[&str]) {
        let mut ids = Vec::new();
        mapping.ids_for_char(TERMINATOR_CHAR, &mut ids);
        assert_eq!(ids, vec![mapping.terminator_id()]);

        for sample in samples {
            let ids = mapping.ids_for_str(sample);
            assert!(ids.iter().all(|&id| id < mapping.alphabet_size()));
            assert!(!ids.contains(&mapping.terminator_id()), "{:?}", sample);
            assert_eq!(mapping.decode(&ids).as_deref(), Some(*sample));
        }
    }

    #[test]
    fn test_all_mappings_honor_contract() {
        let samples = ["a", "hello", "caf\u{e9}", "\u{4eca}\u{5929}", "\u{1f600}x", "\u{7f}\u{80}"];
        assert_contract(&Utf8Mapping, &samples);
        assert_contract(&HighFreqRangeMapping::default(), &samples);
        assert_contract(&VarIntMapping, &samples);
    }

    #[test]
    fn test_default_ids_for_str_concatenates() {
        let mapping = Utf8Mapping;
        let mut expected = Vec::new();
        mapping.ids_for_char('a', &mut expected);
        mapping.ids_for_char('\u{e9}', &mut expected);
        assert_eq!(mapping.ids_for_str("a\u{e9}"), expected);
        assert!(mapping.ids_for_str("").is_empty());
    }
}
