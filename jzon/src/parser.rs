// SPDX-License-Identifier: Apache-2.0

use log::{debug, trace};

use crate::allocator::{Allocator, Heap};
use crate::array::Array;
use crate::buffer::Buf;
use crate::config::ParserConfig;
use crate::cursor::Cursor;
use crate::parse_error::{ErrKind, ParseError, WithPosition};
use crate::table::{member_bound, TableBuilder};
use crate::text::Text;
use crate::value::Value;

const TRIPLE_QUOTE: &[u8] = b"\"\"\"";

/// Where a table's member list ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closing {
    /// A braced table, closed by `}`.
    Brace,
    /// The brace-less root table, closed by end of input.
    EndOfInput,
}

/// A recursive-descent parser producing a [`Value`] tree in one call.
///
/// Every byte of the tree is allocated through the parser's allocator. If
/// parsing fails, whatever was built so far is released before the error is
/// returned.
pub struct Parser<'a, A: Allocator + Clone = Heap> {
    cursor: Cursor<'a>,
    alloc: A,
    config: ParserConfig,
    depth: usize,
}

impl<'a> Parser<'a, Heap> {
    /// Creates a parser that allocates from the general heap.
    ///
    /// # Example
    /// ```
    /// use jzon::Parser;
    /// let root = Parser::new("name: \"jzon\"").parse().unwrap();
    /// assert_eq!(root.get("name").and_then(|v| v.as_str()), Some("jzon"));
    /// ```
    pub fn new<I: AsRef<[u8]> + ?Sized>(input: &'a I) -> Self {
        Self::new_in(input, Heap)
    }

    pub fn with_config<I: AsRef<[u8]> + ?Sized>(input: &'a I, config: ParserConfig) -> Self {
        Self::with_config_in(input, Heap, config)
    }
}

impl<'a, A: Allocator + Clone> Parser<'a, A> {
    /// Creates a parser that allocates from `alloc`.
    pub fn new_in<I: AsRef<[u8]> + ?Sized>(input: &'a I, alloc: A) -> Self {
        Self::with_config_in(input, alloc, ParserConfig::default())
    }

    /// Creates a parser with both a custom allocator and custom settings.
    /// This is the constructor every other one delegates to.
    pub fn with_config_in<I: AsRef<[u8]> + ?Sized>(
        input: &'a I,
        alloc: A,
        config: ParserConfig,
    ) -> Self {
        Self {
            cursor: Cursor::new(input.as_ref()),
            alloc,
            config,
            depth: 0,
        }
    }

    /// Parses the whole document into its root table.
    pub fn parse(mut self) -> Result<Value<A>, ParseError> {
        self.cursor.skip_insignificant();
        let root = if self.cursor.peek() == Some(b'{') {
            let root = self.parse_table(Closing::Brace)?;
            self.cursor.skip_insignificant();
            if !self.cursor.at_end() {
                return Err(self.error(ErrKind::TrailingContent));
            }
            root
        } else {
            self.parse_table(Closing::EndOfInput)?
        };
        debug!(
            "parsed document: {} root members from {} bytes",
            root.size(),
            self.cursor.position()
        );
        Ok(root)
    }

    fn error(&self, kind: ErrKind) -> ParseError {
        ParseError::new(kind, self.cursor.position())
    }

    fn parse_value(&mut self) -> Result<Value<A>, ParseError> {
        self.cursor.skip_insignificant();
        let Some(byte) = self.cursor.peek() else {
            return Err(self.error(ErrKind::UnexpectedEnd));
        };
        trace!(
            "value at {}: '{}'",
            self.cursor.position(),
            byte.escape_ascii()
        );
        match byte {
            b'{' => self.nested(|parser| parser.parse_table(Closing::Brace)),
            b'[' => self.nested(Self::parse_array),
            b'"' => self.parse_string().map(Value::String),
            b'-' | b'0'..=b'9' => self.parse_number(),
            b't' | b'f' | b'n' => self.parse_keyword(),
            other => Err(self.error(ErrKind::UnexpectedCharacter(other))),
        }
    }

    /// Runs `f` one nesting level deeper, failing past the configured bound.
    fn nested(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<Value<A>, ParseError>,
    ) -> Result<Value<A>, ParseError> {
        if self.depth >= self.config.max_depth {
            return Err(self.error(ErrKind::MaxDepthReached));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn parse_table(&mut self, closing: Closing) -> Result<Value<A>, ParseError> {
        let open = self.cursor.position();
        if closing == Closing::Brace {
            self.cursor.advance();
        }

        let bound = member_bound(self.cursor.rest(), closing == Closing::Brace);
        debug!("table at {open}: reserving {bound} slots");
        let mut builder = TableBuilder::with_capacity_in(bound, self.alloc.clone()).at(open)?;

        loop {
            self.cursor.skip_insignificant();
            match (self.cursor.peek(), closing) {
                (None, Closing::EndOfInput) => break,
                (None, Closing::Brace) => {
                    return Err(ParseError::new(ErrKind::UnterminatedTable, open))
                }
                (Some(b'}'), Closing::Brace) => {
                    self.cursor.advance();
                    break;
                }
                _ => {}
            }
            let key = self.parse_key()?;
            let value = self.parse_value()?;
            builder.insert(key, value).at(self.cursor.position())?;
        }

        let table = builder.finish().at(self.cursor.position())?;
        Ok(Value::Table(table))
    }

    fn parse_array(&mut self) -> Result<Value<A>, ParseError> {
        let open = self.cursor.position();
        self.cursor.advance();
        let mut items = Buf::new_in(self.alloc.clone());

        loop {
            self.cursor.skip_insignificant();
            match self.cursor.peek() {
                None => return Err(ParseError::new(ErrKind::UnterminatedArray, open)),
                Some(b']') => {
                    self.cursor.advance();
                    break;
                }
                Some(_) => {}
            }
            let value = self.parse_value()?;
            items.push(value).at(self.cursor.position())?;
        }

        items.shrink_to_fit().at(self.cursor.position())?;
        Ok(Value::Array(Array::from_items(items)))
    }

    /// Reads `key ':'`. Bare keys must be followed by the colon directly;
    /// quoted keys may be separated from it by an insignificant run.
    fn parse_key(&mut self) -> Result<Text<A>, ParseError> {
        let key = if self.cursor.peek() == Some(b'"') {
            let key = self.parse_quoted()?;
            self.cursor.skip_insignificant();
            key
        } else {
            self.parse_bare_key()?
        };
        if self.cursor.peek() != Some(b':') {
            return Err(self.error(ErrKind::ExpectedColon));
        }
        self.cursor.advance();
        Ok(key)
    }

    fn parse_bare_key(&mut self) -> Result<Text<A>, ParseError> {
        let start = self.cursor.position();
        let len = self
            .cursor
            .rest()
            .iter()
            .take_while(|&&b| is_bare_key_byte(b))
            .count();
        if len == 0 {
            return Err(self.error(ErrKind::InvalidKey));
        }
        self.cursor.advance_by(len);
        Text::copy_in(self.cursor.slice(start, start + len), self.alloc.clone()).at(start)
    }

    fn parse_string(&mut self) -> Result<Text<A>, ParseError> {
        if self.cursor.starts_with(TRIPLE_QUOTE) {
            self.parse_multiline()
        } else {
            self.parse_quoted()
        }
    }

    /// A plain string: bytes up to the next `"`, copied verbatim.
    fn parse_quoted(&mut self) -> Result<Text<A>, ParseError> {
        let open = self.cursor.position();
        self.cursor.advance();
        let start = self.cursor.position();
        let Some(len) = self.cursor.rest().iter().position(|&b| b == b'"') else {
            return Err(ParseError::new(ErrKind::UnterminatedString, open));
        };
        let text = Text::copy_in(self.cursor.slice(start, start + len), self.alloc.clone())
            .at(start)?;
        self.cursor.advance_by(len + 1);
        Ok(text)
    }

    /// A `"""` literal. Each line's leading insignificant run (whitespace,
    /// commas, whole `#` comment lines) is stripped, blank lines are dropped,
    /// and the remaining lines are joined with `\n`. Past the first content
    /// byte of a line, commas and `#` are content.
    fn parse_multiline(&mut self) -> Result<Text<A>, ParseError> {
        let open = self.cursor.position();
        self.cursor.advance_by(TRIPLE_QUOTE.len());
        let mut out = Buf::new_in(self.alloc.clone());

        loop {
            self.cursor.skip_insignificant();
            let rest = self.cursor.rest();
            let mut end = 0;
            let closed = loop {
                match rest.get(end) {
                    None => return Err(ParseError::new(ErrKind::UnterminatedString, open)),
                    Some(b'\n') => break false,
                    Some(b'"') if rest[end..].starts_with(TRIPLE_QUOTE) => break true,
                    Some(_) => end += 1,
                }
            };

            let line = rest[..end].strip_suffix(b"\r").unwrap_or(&rest[..end]);
            if !line.is_empty() {
                if !out.is_empty() {
                    out.push(b'\n').at(self.cursor.position())?;
                }
                out.extend_from_slice(line).at(self.cursor.position())?;
            }

            if closed {
                self.cursor.advance_by(end + TRIPLE_QUOTE.len());
                break;
            }
            self.cursor.advance_by(end + 1);
        }

        out.shrink_to_fit().at(self.cursor.position())?;
        Ok(Text::from_buf(out))
    }

    /// `-? digits (. digits)? ([eE] [+-]? digits)?`. A fraction or exponent
    /// makes it a float.
    fn parse_number(&mut self) -> Result<Value<A>, ParseError> {
        let start = self.cursor.position();
        let mut is_float = false;

        if self.cursor.peek() == Some(b'-') {
            self.cursor.advance();
        }
        self.skip_digits();
        if self.cursor.peek() == Some(b'.') {
            is_float = true;
            self.cursor.advance();
            self.skip_digits();
        }
        if matches!(self.cursor.peek(), Some(b'e' | b'E')) {
            is_float = true;
            self.cursor.advance();
            if matches!(self.cursor.peek(), Some(b'+' | b'-')) {
                self.cursor.advance();
            }
            self.skip_digits();
        }

        let invalid = || ParseError::new(ErrKind::InvalidNumber, start);
        let literal = core::str::from_utf8(self.cursor.slice(start, self.cursor.position()))
            .map_err(|_| invalid())?;
        if is_float {
            literal.parse().map(Value::Float).map_err(|_| invalid())
        } else {
            literal.parse().map(Value::Int).map_err(|_| invalid())
        }
    }

    fn skip_digits(&mut self) {
        while matches!(self.cursor.peek(), Some(b'0'..=b'9')) {
            self.cursor.advance();
        }
    }

    fn parse_keyword(&mut self) -> Result<Value<A>, ParseError> {
        let (len, value) = if self.cursor.starts_with(b"true") {
            (4, Value::Bool(true))
        } else if self.cursor.starts_with(b"false") {
            (5, Value::Bool(false))
        } else if self.cursor.starts_with(b"null") {
            (4, Value::Null)
        } else {
            return Err(self.error(ErrKind::InvalidLiteral));
        };
        self.cursor.advance_by(len);
        Ok(value)
    }
}

fn is_bare_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}
