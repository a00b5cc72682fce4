//! Contract tests for the transition-id mappings

use datrie::mapping::TERMINATOR_CHAR;
use datrie::{DecodeIds, HighFreqRangeMapping, TransitionIds, Utf8Mapping, VarIntMapping};
use proptest::prelude::*;

fn check_char_contract<M: DecodeIds>(mapping: &M, ch: char) -> Result<(), TestCaseError> {
    let mut ids = Vec::new();
    mapping.ids_for_char(ch, &mut ids);
    prop_assert!(!ids.is_empty());
    prop_assert!(ids.iter().all(|&id| id < mapping.alphabet_size()));
    if ch == TERMINATOR_CHAR {
        prop_assert_eq!(ids, vec![mapping.terminator_id()]);
    } else {
        prop_assert!(!ids.contains(&mapping.terminator_id()));
        let decoded = mapping.decode(&ids);
        prop_assert_eq!(decoded, Some(ch.to_string()));
    }
    Ok(())
}

#[test]
fn test_terminator_is_zero_everywhere() {
    assert_eq!(Utf8Mapping.terminator_id(), 0);
    assert_eq!(HighFreqRangeMapping::default().terminator_id(), 0);
    assert_eq!(VarIntMapping.terminator_id(), 0);
}

#[test]
fn test_alphabet_sizes() {
    assert_eq!(Utf8Mapping.alphabet_size(), 256);
    assert_eq!(VarIntMapping.alphabet_size(), 257);
    let cjk = HighFreqRangeMapping::default();
    assert_eq!(cjk.alphabet_size(), 0x80 + (0x9fa5 - 0x4e00 + 1) + 1 + 256);
}

#[test]
fn test_boundary_chars() {
    let high = HighFreqRangeMapping::default();
    for ch in ['\u{1}', '\u{7f}', '\u{80}', '\u{4dff}', '\u{4e00}', '\u{9fa5}', '\u{9fa6}', '\u{ffff}', '\u{10ffff}'] {
        check_char_contract(&Utf8Mapping, ch).unwrap();
        check_char_contract(&high, ch).unwrap();
        check_char_contract(&VarIntMapping, ch).unwrap();
    }
}

#[test]
fn test_id_sequence_lengths() {
    let high = HighFreqRangeMapping::default();
    assert_eq!(high.ids_for_str("\u{4e00}\u{9fa5}").len(), 2);
    assert_eq!(Utf8Mapping.ids_for_str("\u{4e00}\u{9fa5}").len(), 6);
    assert_eq!(VarIntMapping.ids_for_str("\u{4e00}\u{9fa5}").len(), 6);
    assert_eq!(VarIntMapping.ids_for_str("\u{3fff}").len(), 2);
    assert_eq!(VarIntMapping.ids_for_str("\u{4000}").len(), 3);
}

#[test]
fn test_decode_rejects_terminator() {
    assert_eq!(HighFreqRangeMapping::default().decode(&[104, 0]), None);
    assert_eq!(VarIntMapping.decode(&[105, 0]), None);
}

proptest! {
    #[test]
    fn property_test_every_char_honors_contract(ch in any::<char>()) {
        check_char_contract(&Utf8Mapping, ch)?;
        check_char_contract(&HighFreqRangeMapping::default(), ch)?;
        check_char_contract(&VarIntMapping, ch)?;
    }

    #[test]
    fn property_test_strings_decode(s in "\\PC{0,16}") {
        let high = HighFreqRangeMapping::default();
        prop_assert_eq!(Utf8Mapping.decode(&Utf8Mapping.ids_for_str(&s)), Some(s.clone()));
        prop_assert_eq!(high.decode(&high.ids_for_str(&s)), Some(s.clone()));
        prop_assert_eq!(VarIntMapping.decode(&VarIntMapping.ids_for_str(&s)), Some(s.clone()));
    }

    #[test]
    fn property_test_utf8_order_matches_string_order(a in "\\PC{0,6}", b in "\\PC{0,6}") {
        let ids_a = Utf8Mapping.ids_for_str(&a);
        let ids_b = Utf8Mapping.ids_for_str(&b);
        prop_assert_eq!(ids_a.cmp(&ids_b), a.cmp(&b));
    }
}
