//! Variable-length integer mapping.
//!
//! A code point is split into 7-bit groups, most significant first. Every
//! group but the last is emitted as `129 + group`, the last one as
//! `1 + group`, so id 0 stays free for the terminator and the end of each
//! character is visible from its final id alone.

use super::{DecodeIds, TransitionIds};

const GROUP_BITS: u32 = 7;
const GROUP_MASK: u32 = (1 << GROUP_BITS) - 1;
const FINAL_BASE: u32 = 1;
const CONTINUATION_BASE: u32 = FINAL_BASE + (1 << GROUP_BITS);

/// Maps code points to big-endian 7-bit groups
///
/// ASCII takes one id, code points below U+4000 two, the rest three.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VarIntMapping;

impl TransitionIds for VarIntMapping {
    fn ids_for_char(&self, ch: char, out: &mut Vec<u32>) {
        let cp = ch as u32;
        if cp == 0 {
            out.push(self.terminator_id());
            return;
        }

        let mut shift = 0;
        while (cp >> (shift + GROUP_BITS)) != 0 {
            shift += GROUP_BITS;
        }
        while shift > 0 {
            out.push(CONTINUATION_BASE + ((cp >> shift) & GROUP_MASK));
            shift -= GROUP_BITS;
        }
        out.push(FINAL_BASE + (cp & GROUP_MASK));
    }

    #[inline]
    fn terminator_id(&self) -> u32 {
        0
    }

    #[inline]
    fn alphabet_size(&self) -> u32 {
        CONTINUATION_BASE + (1 << GROUP_BITS)
    }
}

impl DecodeIds for VarIntMapping {
    fn decode(&self, ids: &[u32]) -> Option<String> {
        let mut out = String::with_capacity(ids.len());
        let mut acc: u32 = 0;
        let mut pending = false;

        for &id in ids {
            if id >= CONTINUATION_BASE && id < self.alphabet_size() {
                acc = (acc << GROUP_BITS) | (id - CONTINUATION_BASE);
                pending = true;
                if acc > (char::MAX as u32) >> GROUP_BITS {
                    return None;
                }
            } else if id >= FINAL_BASE && id < CONTINUATION_BASE {
                let cp = (acc << GROUP_BITS) | (id - FINAL_BASE);
                if cp == 0 {
                    return None;
                }
                out.push(char::from_u32(cp)?);
                acc = 0;
                pending = false;
            } else {
                return None;
            }
        }

        if pending {
            None
        } else {
            Some(out)
        }
    }
}
