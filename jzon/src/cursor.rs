// SPDX-License-Identifier: Apache-2.0

/// A read-only position in the input.
///
/// The input ends at the end of the slice or at the first NUL byte, whichever
/// comes first, so NUL-terminated host buffers can be passed as they are.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        let end = input.iter().position(|&b| b == 0).unwrap_or(input.len());
        Self {
            data: &input[..end],
            pos: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// The byte under the cursor, or `None` at end of input.
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    pub fn advance(&mut self) {
        if self.pos < self.data.len() {
            self.pos += 1;
        }
    }

    pub fn advance_by(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n).min(self.data.len());
    }

    pub fn starts_with(&self, literal: &[u8]) -> bool {
        self.rest().starts_with(literal)
    }

    /// Unconsumed input.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    pub fn slice(&self, start: usize, end: usize) -> &'a [u8] {
        &self.data[start..end]
    }

    /// Skips an insignificant run: whitespace, commas and `#` line comments.
    pub fn skip_insignificant(&mut self) {
        loop {
            while matches!(self.peek(), Some(b) if b <= b' ' || b == b',') {
                self.advance();
            }
            if self.peek() != Some(b'#') {
                break;
            }
            while matches!(self.peek(), Some(b) if b != b'\n') {
                self.advance();
            }
        }
    }
}
