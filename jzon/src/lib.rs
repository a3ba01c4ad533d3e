// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), no_std)]

//! A parser for jzon, a human-friendly JSON variant meant for configuration.
//!
//! ```text
//! # Comments run to the end of the line.
//! name: "example"            # the root table needs no braces
//! "quoted key": 1
//! numbers: [1 2.5 -3e2]      # commas are optional everywhere
//! nested: { enabled: true, missing: null }
//! text: """
//!     Multi-line strings drop
//!     each line's indentation.
//!     """
//! ```
//!
//! Every allocation goes through an [`Allocator`] chosen by the caller, so the
//! parser can be embedded in hosts with arena or pool allocators. The
//! convenience entry points use [`Heap`].
//!
//! ```
//! let root = jzon::parse("server: { port: 8080 }, tags: [\"a\" \"b\"]").unwrap();
//! let port = root.get("server").and_then(|s| s.get("port"));
//! assert_eq!(port.and_then(|p| p.as_int()), Some(8080));
//! assert_eq!(root.get("tags").map(|t| t.size()), Some(2));
//! jzon::free(root);
//! ```
//!
//! Tables keep their members sorted by a 64-bit key hash, which makes
//! [`Table::get`] a binary search. Parsing is a single synchronous call;
//! nesting depth is bounded by [`ParserConfig::max_depth`].

extern crate alloc;

pub mod allocator;
mod array;
mod buffer;
mod config;
mod cursor;
mod hash;
mod parse_error;
mod parser;
mod table;
mod text;
mod value;

pub use allocator::{AllocError, Allocator, Heap};
pub use array::Array;
pub use config::{ParserConfig, DEFAULT_MAX_DEPTH};
pub use hash::key_hash;
pub use parse_error::{ErrKind, ParseError};
pub use parser::Parser;
pub use table::{Pair, Table};
pub use text::Text;
pub use value::Value;

/// Outcome of a parse: the root table, or why there is none.
pub type ParseResult<A = Heap> = Result<Value<A>, ParseError>;

/// Parses a document, allocating from the general heap.
///
/// `input` ends at its last byte or at the first NUL, whichever comes first.
pub fn parse<I: AsRef<[u8]> + ?Sized>(input: &I) -> ParseResult {
    Parser::new(input).parse()
}

/// Parses a document, allocating every node from `alloc`.
///
/// Pass the allocator by reference (`&my_alloc`) to share one instance
/// between the tree and the caller.
pub fn parse_in<I, A>(input: &I, alloc: A) -> ParseResult<A>
where
    I: AsRef<[u8]> + ?Sized,
    A: Allocator + Clone,
{
    Parser::new_in(input, alloc).parse()
}

/// Parses a document with a custom allocator and settings.
pub fn parse_with_config_in<I, A>(input: &I, alloc: A, config: ParserConfig) -> ParseResult<A>
where
    I: AsRef<[u8]> + ?Sized,
    A: Allocator + Clone,
{
    Parser::with_config_in(input, alloc, config).parse()
}

/// Releases a parsed tree, children before their containers, through the
/// allocator that built it.
///
/// Dropping the value does the same; this exists for call sites that want
/// the release to be explicit.
pub fn free<A: Allocator>(value: Value<A>) {
    drop(value);
}

/// Looks `key` up in `table`. Returns `None` if `table` is not a table or has
/// no such key.
pub fn get<'v, A, K>(table: &'v Value<A>, key: &K) -> Option<&'v Value<A>>
where
    A: Allocator,
    K: AsRef<[u8]> + ?Sized,
{
    table.get(key)
}
