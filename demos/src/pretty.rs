// SPDX-License-Identifier: Apache-2.0

use std::fmt::{self, Write};

use jzon::{Allocator, Table, Text, Value};

const INDENT: &str = "  ";

/// Renders a tree back as jzon, with the root table written brace-less.
///
/// The output parses back to an equal tree, except for strings that hold
/// `"""`, or that hold `"` and also have a line a `"""` block drops or
/// trims: an empty one, one starting with whitespace, `,` or `#`, or one
/// ending with `\r`. jzon has no escapes to spell those.
pub fn render<A: Allocator>(root: &Value<A>) -> Result<String, fmt::Error> {
    let mut out = String::new();
    match root {
        Value::Table(table) => write_members(&mut out, table, 0)?,
        other => {
            write_value(&mut out, other, 0)?;
            out.push('\n');
        }
    }
    Ok(out)
}

fn write_members<A: Allocator, W: Write>(
    out: &mut W,
    table: &Table<A>,
    depth: usize,
) -> fmt::Result {
    for pair in table {
        pad(out, depth)?;
        write_key(out, pair.key())?;
        out.write_str(": ")?;
        write_value(out, pair.value(), depth)?;
        out.write_char('\n')?;
    }
    Ok(())
}

fn write_value<A: Allocator, W: Write>(
    out: &mut W,
    value: &Value<A>,
    depth: usize,
) -> fmt::Result {
    match value {
        Value::String(text) if needs_block(text) => {
            out.write_str("\"\"\"\n")?;
            for line in text.to_string().lines() {
                pad(out, depth + 1)?;
                writeln!(out, "{line}")?;
            }
            pad(out, depth + 1)?;
            out.write_str("\"\"\"")
        }
        Value::String(text) => write!(out, "\"{text}\""),
        Value::Int(n) => write!(out, "{n}"),
        // Any literal past f32::MAX reads back as infinity.
        Value::Float(n) if n.is_infinite() => {
            out.write_str(if n.is_sign_negative() { "-1e39" } else { "1e39" })
        }
        Value::Float(n) => write!(out, "{n:?}"),
        Value::Bool(b) => write!(out, "{b}"),
        Value::Null => out.write_str("null"),
        Value::Table(table) if table.is_empty() => out.write_str("{}"),
        Value::Table(table) => {
            out.write_str("{\n")?;
            write_members(out, table, depth + 1)?;
            pad(out, depth)?;
            out.write_char('}')
        }
        Value::Array(array) if array.iter().all(is_inline) => {
            out.write_char('[')?;
            for (i, item) in array.iter().enumerate() {
                if i > 0 {
                    out.write_char(' ')?;
                }
                write_value(out, item, depth)?;
            }
            out.write_char(']')
        }
        Value::Array(array) => {
            out.write_str("[\n")?;
            for item in array {
                pad(out, depth + 1)?;
                write_value(out, item, depth + 1)?;
                out.write_char('\n')?;
            }
            pad(out, depth)?;
            out.write_char(']')
        }
    }
}

fn is_inline<A: Allocator>(value: &Value<A>) -> bool {
    match value {
        Value::Table(_) | Value::Array(_) => false,
        Value::String(text) => !needs_block(text),
        _ => true,
    }
}

/// Text holding `"` needs a `"""` block. Multi-line text gets one too when
/// the block keeps every line intact; otherwise it stays a plain literal,
/// which holds newlines verbatim.
fn needs_block<A: Allocator>(text: &Text<A>) -> bool {
    let bytes = text.as_bytes();
    if bytes.windows(3).any(|w| w == b"\"\"\"") {
        return false;
    }
    bytes.contains(&b'"') || (bytes.contains(&b'\n') && block_keeps_lines(bytes))
}

fn block_keeps_lines(bytes: &[u8]) -> bool {
    bytes.split(|&b| b == b'\n').all(|line| match (line.first(), line.last()) {
        (Some(&first), Some(&last)) => {
            first > b' ' && first != b',' && first != b'#' && last != b'\r'
        }
        _ => false,
    })
}

fn write_key<A: Allocator, W: Write>(out: &mut W, key: &Text<A>) -> fmt::Result {
    let bytes = key.as_bytes();
    let bare = !bytes.is_empty()
        && bytes
            .iter()
            .all(|&b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if bare {
        write!(out, "{key}")
    } else {
        write!(out, "\"{key}\"")
    }
}

fn pad<W: Write>(out: &mut W, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        out.write_str(INDENT)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
        name: "demo"
        "with space": -3
        ratio: 0.5
        flags: [true false null]
        nested: { list: [1 { x: 2 } []] empty: {} }
        text: """
            first line
            second line
            """
    "#;

    #[test]
    fn rendered_output_parses_back() {
        let root = jzon::parse(DOC).unwrap();
        let rendered = render(&root).unwrap();
        let again = jzon::parse(&rendered).unwrap();
        assert_eq!(root, again, "rendered:\n{rendered}");
    }

    #[test]
    fn layout() {
        let root = jzon::parse("a: {b: [1 2]}").unwrap();
        assert_eq!(render(&root).unwrap(), "a: {\n  b: [1 2]\n}\n");
    }

    #[test]
    fn quotes_inside_text_use_a_block() {
        let root = jzon::parse("a: \"\"\"say \"hi\" \"\"\"").unwrap();
        assert_eq!(root.get("a").unwrap().as_str(), Some("say \"hi\" "));
        let rendered = render(&root).unwrap();
        assert_eq!(rendered, "a: \"\"\"\n  say \"hi\" \n  \"\"\"\n");
        assert_eq!(jzon::parse(&rendered).unwrap(), root);
    }

    #[test]
    fn text_a_block_would_trim_stays_plain() {
        let root = jzon::parse("a: \"one\n\n  # two\"").unwrap();
        let rendered = render(&root).unwrap();
        assert_eq!(rendered, "a: \"one\n\n  # two\"\n");
        assert_eq!(jzon::parse(&rendered).unwrap(), root);
    }

    #[test]
    fn infinite_floats_parse_back() {
        let root = jzon::parse("big: 1e99 small: -1e99 list: [1e50]").unwrap();
        assert_eq!(root.get("big").unwrap().as_float(), Some(f32::INFINITY));
        let rendered = render(&root).unwrap();
        assert!(!rendered.contains("inf"), "{rendered}");
        assert_eq!(jzon::parse(&rendered).unwrap(), root);
    }

    #[test]
    fn quotes_keys_that_are_not_bare() {
        let root = jzon::parse("\"a b\": 1.0").unwrap();
        assert_eq!(render(&root).unwrap(), "\"a b\": 1.0\n");
    }
}
