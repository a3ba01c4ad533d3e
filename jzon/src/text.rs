// SPDX-License-Identifier: Apache-2.0

use crate::allocator::{AllocError, Allocator, Heap};
use crate::buffer::Buf;

/// Owned text: keys and string values, copied verbatim from the input.
///
/// The bytes are not validated; input that was valid UTF-8 yields valid
/// UTF-8 text because every split happens on an ASCII delimiter.
pub struct Text<A: Allocator = Heap> {
    bytes: Buf<u8, A>,
}

impl<A: Allocator> Text<A> {
    /// Copies `bytes` into storage of exactly the right size.
    pub(crate) fn copy_in(bytes: &[u8], alloc: A) -> Result<Self, AllocError> {
        let mut buf = Buf::with_capacity_in(bytes.len(), alloc)?;
        buf.extend_from_slice(bytes)?;
        Ok(Self { bytes: buf })
    }

    pub(crate) fn from_buf(bytes: Buf<u8, A>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// The text as `str`, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(self.as_bytes()).ok()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl<A: Allocator> PartialEq for Text<A> {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<A: Allocator> PartialEq<str> for Text<A> {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<A: Allocator> PartialEq<&str> for Text<A> {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<A: Allocator> PartialEq<[u8]> for Text<A> {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl<A: Allocator> core::fmt::Display for Text<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for chunk in self.as_bytes().utf8_chunks() {
            f.write_str(chunk.valid())?;
            if !chunk.invalid().is_empty() {
                f.write_str("\u{FFFD}")?;
            }
        }
        Ok(())
    }
}

impl<A: Allocator> core::fmt::Debug for Text<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.as_str() {
            Some(s) => write!(f, "{s:?}"),
            None => write!(f, "{:?}", self.as_bytes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::Counting;

    #[test]
    fn copy_in_is_exact() {
        let counter = Counting::new();
        let text = Text::copy_in(b"value", &counter).unwrap();
        assert_eq!(text, "value");
        assert_eq!(text.len(), 5);
        assert_eq!(counter.allocations(), 1);
        assert_eq!(counter.reallocations(), 0);
    }

    #[test]
    fn empty_text_owns_nothing() {
        let counter = Counting::new();
        let text = Text::copy_in(b"", &counter).unwrap();
        assert!(text.is_empty());
        assert_eq!(text.as_str(), Some(""));
        assert_eq!(counter.allocations(), 0);
    }

    #[test]
    fn invalid_utf8_is_kept_verbatim() {
        let text = Text::copy_in(&[b'a', 0xff, b'b'], Heap).unwrap();
        assert_eq!(text.as_str(), None);
        assert_eq!(text.as_bytes(), &[b'a', 0xff, b'b']);
        assert_eq!(std::format!("{text}"), "a\u{FFFD}b");
    }

    #[test]
    fn debug_quotes_text() {
        let text = Text::copy_in(b"x\ny", Heap).unwrap();
        assert_eq!(std::format!("{text:?}"), "\"x\\ny\"");
    }
}
