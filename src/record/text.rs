//! Bounded text fields
//!
//! Each text field of a record occupies a fixed `N`-byte slot on disk: at
//! most `N - 1` bytes of content followed by at least one NUL terminator.
//! Content is kept as raw bytes so files written in any single-byte
//! encoding survive a load and save unchanged.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

/// Owned text holding at most `N - 1` bytes
///
/// Longer input is silently truncated; construction never fails.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BoundedText<const N: usize> {
    bytes: Vec<u8>,
}

/// Full name slot (128 bytes on disk)
pub type Name = BoundedText<128>;

/// Address slot (128 bytes on disk)
pub type Address = BoundedText<128>;

/// Document (CPF/CNPJ) slot (32 bytes on disk)
pub type Document = BoundedText<32>;

impl<const N: usize> BoundedText<N> {
    /// Size of the on-disk slot, terminator included
    pub const SLOT: usize = N;

    /// Maximum number of content bytes
    pub const MAX_LEN: usize = N - 1;

    /// Build from a string, cut at the last character boundary that fits
    pub fn new(text: &str) -> Self {
        Self {
            bytes: truncate(text, Self::MAX_LEN).as_bytes().to_vec(),
        }
    }

    /// Build from raw bytes, kept verbatim up to the first NUL
    ///
    /// Anything past [`Self::MAX_LEN`] bytes is dropped.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let end = bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(bytes.len())
            .min(Self::MAX_LEN);
        Self {
            bytes: bytes[..end].to_vec(),
        }
    }

    /// Build from a NUL-padded slot as stored on disk
    pub fn from_slot(slot: &[u8]) -> Self {
        Self::from_bytes(slot)
    }

    /// Write the content into a zeroed slot of exactly `N` bytes
    pub fn to_slot(&self) -> [u8; N] {
        let mut slot = [0u8; N];
        slot[..self.bytes.len()].copy_from_slice(&self.bytes);
        slot
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Text view; bytes that are not valid UTF-8 show as U+FFFD
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl<const N: usize> From<&str> for BoundedText<N> {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl<const N: usize> fmt::Display for BoundedText<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl<const N: usize> fmt::Debug for BoundedText<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.to_string_lossy(), f)
    }
}

/// Longest prefix of `text` that fits in `max` bytes without splitting a char
fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Byte-wise ASCII case-insensitive comparison (strcasecmp semantics)
///
/// Not locale aware: only `A-Z` fold to `a-z`; every other byte compares
/// by value.
pub fn cmp_ignore_ascii_case(a: &[u8], b: &[u8]) -> Ordering {
    let lhs = a.iter().map(|c| c.to_ascii_lowercase());
    let rhs = b.iter().map(|c| c.to_ascii_lowercase());
    lhs.cmp(rhs)
}
