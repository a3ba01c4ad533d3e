// SPDX-License-Identifier: Apache-2.0

use crate::allocator::AllocError;

/// What went wrong while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrKind {
    /// A byte that cannot start or continue the current production.
    UnexpectedCharacter(u8),
    /// The input ended where a value was required.
    UnexpectedEnd,
    /// A table member did not start with a quoted or bare key.
    InvalidKey,
    /// A key was not followed by `:`.
    ExpectedColon,
    /// A string or multi-line string was still open at end of input.
    UnterminatedString,
    /// A `{` was never closed.
    UnterminatedTable,
    /// A `[` was never closed.
    UnterminatedArray,
    /// A number literal could not be converted.
    InvalidNumber,
    /// Something starting like `true`, `false` or `null` that is not one.
    InvalidLiteral,
    /// Significant input after a braced root table.
    TrailingContent,
    /// Tables and arrays nested deeper than the configured bound.
    MaxDepthReached,
    /// The allocator refused a request.
    OutOfMemory,
}

/// A parse failure and the byte offset where it was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    kind: ErrKind,
    position: usize,
}

impl ParseError {
    pub fn new(kind: ErrKind, position: usize) -> Self {
        Self { kind, position }
    }

    pub fn kind(&self) -> ErrKind {
        self.kind
    }

    /// Byte offset into the input.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl core::fmt::Display for ErrKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ErrKind::UnexpectedCharacter(b) if b.is_ascii_graphic() => {
                write!(f, "unexpected character '{}'", *b as char)
            }
            ErrKind::UnexpectedCharacter(b) => write!(f, "unexpected byte 0x{b:02x}"),
            ErrKind::UnexpectedEnd => write!(f, "unexpected end of input"),
            ErrKind::InvalidKey => write!(f, "invalid key"),
            ErrKind::ExpectedColon => write!(f, "expected ':' after key"),
            ErrKind::UnterminatedString => write!(f, "unterminated string"),
            ErrKind::UnterminatedTable => write!(f, "unterminated table"),
            ErrKind::UnterminatedArray => write!(f, "unterminated array"),
            ErrKind::InvalidNumber => write!(f, "invalid number"),
            ErrKind::InvalidLiteral => write!(f, "invalid literal"),
            ErrKind::TrailingContent => write!(f, "unexpected content after root table"),
            ErrKind::MaxDepthReached => write!(f, "nesting too deep"),
            ErrKind::OutOfMemory => write!(f, "out of memory"),
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} at byte {}", self.kind, self.position)
    }
}

impl core::error::Error for ParseError {}

/// Allocation failures carry no position of their own; the parser attaches
/// one with [`WithPosition::at`].
pub(crate) trait WithPosition<T> {
    fn at(self, position: usize) -> Result<T, ParseError>;
}

impl<T> WithPosition<T> for Result<T, AllocError> {
    fn at(self, position: usize) -> Result<T, ParseError> {
        self.map_err(|_| ParseError::new(ErrKind::OutOfMemory, position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_position() {
        let err = ParseError::new(ErrKind::ExpectedColon, 12);
        assert_eq!(std::format!("{err}"), "expected ':' after key at byte 12");
    }

    #[test]
    fn display_unexpected_bytes() {
        let printable = ParseError::new(ErrKind::UnexpectedCharacter(b'}'), 4);
        assert_eq!(std::format!("{printable}"), "unexpected character '}' at byte 4");
        let control = ParseError::new(ErrKind::UnexpectedCharacter(0x80), 0);
        assert_eq!(std::format!("{control}"), "unexpected byte 0x80 at byte 0");
    }

    #[test]
    fn alloc_error_conversion() {
        let failed: Result<(), AllocError> = Err(AllocError::Exhausted);
        let err = failed.at(7).unwrap_err();
        assert_eq!(err.kind(), ErrKind::OutOfMemory);
        assert_eq!(err.position(), 7);

        let overflow: Result<(), AllocError> = Err(AllocError::CapacityOverflow);
        assert_eq!(overflow.at(0).unwrap_err().kind(), ErrKind::OutOfMemory);
    }
}
