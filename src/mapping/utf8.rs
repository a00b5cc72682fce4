//! Byte-level mapping: one transition id per UTF-8 byte.

use super::{DecodeIds, TransitionIds};

/// Maps every character to its UTF-8 bytes, id = byte value
///
/// `'\0'` encodes to the single byte 0, which doubles as the terminator id.
/// Ascending id order equals ascending code point order, so iteration over a
/// trie using this mapping yields keys in lexicographic order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Utf8Mapping;

impl TransitionIds for Utf8Mapping {
    #[inline]
    fn ids_for_char(&self, ch: char, out: &mut Vec<u32>) {
        let mut buf = [0u8; 4];
        out.extend(ch.encode_utf8(&mut buf).bytes().map(u32::from));
    }

    fn ids_for_str(&self, s: &str) -> Vec<u32> {
        s.bytes().map(u32::from).collect()
    }

    #[inline]
    fn terminator_id(&self) -> u32 {
        0
    }

    #[inline]
    fn alphabet_size(&self) -> u32 {
        256
    }
}

impl DecodeIds for Utf8Mapping {
    fn decode(&self, ids: &[u32]) -> Option<String> {
        let bytes = ids
            .iter()
            .map(|&id| u8::try_from(id).ok())
            .collect::<Option<Vec<u8>>>()?;
        String::from_utf8(bytes).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_ids_are_bytes() {
        assert_eq!(Utf8Mapping.ids_for_str("abc"), vec![97, 98, 99]);
    }

    #[test]
    fn test_multibyte_char() {
        let mut ids = Vec::new();
        Utf8Mapping.ids_for_char('\u{4eca}', &mut ids);
        assert_eq!(ids, vec![0xE4, 0xBB, 0x8A]);
    }

    #[test]
    fn test_decode_rejects_invalid() {
        assert_eq!(Utf8Mapping.decode(&[0xE4, 0xBB]), None);
        assert_eq!(Utf8Mapping.decode(&[300]), None);
        assert_eq!(Utf8Mapping.decode(&[104, 105]).as_deref(), Some("hi"));
    }

    #[test]
    fn test_order_matches_code_points() {
        let a = Utf8Mapping.ids_for_str("\u{e9}");
        let b = Utf8Mapping.ids_for_str("\u{4e00}");
        let c = Utf8Mapping.ids_for_str("z");
        assert!(c < a);
        assert!(a < b);
    }
}
