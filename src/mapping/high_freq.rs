//! Dense mapping for a high-frequency code point range.
//!
//! Id layout for a range of `span` code points:
//!
//! ```text
//! 0x00..=0x7F                 ASCII, id = code point (0 is the terminator)
//! 0x80..0x80+span             one id per code point in the range
//! 0x80+span                   escape, followed by the UTF-8 bytes
//! 0x80+span+1 .. +256         escaped UTF-8 byte values
//! ```
//!
//! Characters of the range need a single transition instead of three UTF-8
//! bytes, which shortens paths and shrinks the arrays for dictionaries
//! dominated by that range.

use super::{DecodeIds, TransitionIds};
use crate::error::{DatrieError, Result};

const ASCII_END: u32 = 0x80;

/// First code point of the default range (CJK Unified Ideographs)
pub const DEFAULT_RANGE_START: char = '\u{4e00}';
/// Last code point of the default range
pub const DEFAULT_RANGE_END: char = '\u{9fa5}';

/// Mapping that gives every character of one code point range its own id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighFreqRangeMapping {
    start: u32,
    end: u32,
}

impl HighFreqRangeMapping {
    /// Create a mapping for the inclusive range `start..=end`
    ///
    /// The range must lie entirely above ASCII.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use datrie::{HighFreqRangeMapping, TransitionIds};
    ///
    /// let greek = HighFreqRangeMapping::new('\u{391}', '\u{3c9}').unwrap();
    /// assert_eq!(greek.ids_for_str("\u{3b1}").len(), 1);
    /// assert!(HighFreqRangeMapping::new('a', 'z').is_err());
    /// ```
    pub fn new(start: char, end: char) -> Result<Self> {
        let (start, end) = (start as u32, end as u32);
        if start < ASCII_END {
            return Err(DatrieError::invalid_argument(format!(
                "high-frequency range must start above ASCII, got U+{:04X}",
                start
            )));
        }
        if start > end {
            return Err(DatrieError::invalid_argument(format!(
                "empty high-frequency range U+{:04X}..=U+{:04X}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// The inclusive code point range that receives dense ids
    pub fn range(&self) -> (u32, u32) {
        (self.start, self.end)
    }

    #[inline]
    fn escape_id(&self) -> u32 {
        ASCII_END + (self.end - self.start + 1)
    }

    #[inline]
    fn byte_base(&self) -> u32 {
        self.escape_id() + 1
    }
}

impl Default for HighFreqRangeMapping {
    fn default() -> Self {
        Self {
            start: DEFAULT_RANGE_START as u32,
            end: DEFAULT_RANGE_END as u32,
        }
    }
}

impl TransitionIds for HighFreqRangeMapping {
    fn ids_for_char(&self, ch: char, out: &mut Vec<u32>) {
        let cp = ch as u32;
        if cp < ASCII_END {
            out.push(cp);
        } else if (self.start..=self.end).contains(&cp) {
            out.push(ASCII_END + (cp - self.start));
        } else {
            let mut buf = [0u8; 4];
            out.push(self.escape_id());
            let byte_base = self.byte_base();
            out.extend(ch.encode_utf8(&mut buf).bytes().map(|b| byte_base + u32::from(b)));
        }
    }

    #[inline]
    fn terminator_id(&self) -> u32 {
        0
    }

    #[inline]
    fn alphabet_size(&self) -> u32 {
        self.byte_base() + 256
    }
}

impl DecodeIds for HighFreqRangeMapping {
    fn decode(&self, ids: &[u32]) -> Option<String> {
        let escape = self.escape_id();
        let byte_base = self.byte_base();
        let mut out = String::with_capacity(ids.len());
        let mut iter = ids.iter().copied();

        while let Some(id) = iter.next() {
            if id == 0 {
                return None;
            } else if id < ASCII_END {
                out.push(char::from_u32(id)?);
            } else if id < escape {
                out.push(char::from_u32(self.start + (id - ASCII_END))?);
            } else if id == escape {
                let lead = iter.next()?.checked_sub(byte_base)?;
                let lead = u8::try_from(lead).ok()?;
                let width = utf8_width(lead)?;
                let mut bytes = [lead, 0, 0, 0];
                for slot in bytes.iter_mut().take(width).skip(1) {
                    let b = iter.next()?.checked_sub(byte_base)?;
                    *slot = u8::try_from(b).ok()?;
                }
                out.push_str(std::str::from_utf8(&bytes[..width]).ok()?);
            } else {
                return None;
            }
        }
        Some(out)
    }
}

fn utf8_width(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC0..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF7 => Some(4),
        _ => None,
    }
}
