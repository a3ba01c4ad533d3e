// SPDX-License-Identifier: Apache-2.0

use crate::allocator::{Allocator, Heap};
use crate::array::Array;
use crate::table::Table;
use crate::text::Text;

/// A parsed value. Tables and arrays own their children; dropping a value
/// releases the whole subtree through the allocator that built it.
pub enum Value<A: Allocator = Heap> {
    String(Text<A>),
    Int(i32),
    Float(f32),
    Bool(bool),
    Null,
    Table(Table<A>),
    Array(Array<A>),
}

impl<A: Allocator> Value<A> {
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Value::Table(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Element count of a table or array; zero for every other value.
    pub fn size(&self) -> usize {
        match self {
            Value::Table(table) => table.len(),
            Value::Array(array) => array.len(),
            _ => 0,
        }
    }

    pub fn as_text(&self) -> Option<&Text<A>> {
        match self {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    /// The string value, if this is a string holding valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_text().and_then(Text::as_str)
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table<A>> {
        match self {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array<A>> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Looks up `key` if this is a table. Any other value has no members.
    pub fn get<K: AsRef<[u8]> + ?Sized>(&self, key: &K) -> Option<&Value<A>> {
        self.as_table().and_then(|table| table.get(key))
    }

    /// Returns element `index` if this is an array.
    pub fn index(&self, index: usize) -> Option<&Value<A>> {
        self.as_array().and_then(|array| array.get(index))
    }
}

impl<A: Allocator> PartialEq for Value<A> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Table(a), Value::Table(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl<A: Allocator> core::fmt::Debug for Value<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Value::String(text) => write!(f, "{text:?}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n:?}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "null"),
            Value::Table(table) => core::fmt::Debug::fmt(table, f),
            Value::Array(array) => core::fmt::Debug::fmt(array, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminants_are_exclusive() {
        let values: [Value; 4] = [Value::Int(1), Value::Float(1.0), Value::Bool(true), Value::Null];
        for (i, value) in values.iter().enumerate() {
            let flags = [
                value.is_string(),
                value.is_int(),
                value.is_float(),
                value.is_bool(),
                value.is_null(),
                value.is_table(),
                value.is_array(),
            ];
            assert_eq!(flags.iter().filter(|f| **f).count(), 1, "value #{i}");
        }
    }

    #[test]
    fn scalars_have_no_size_or_members() {
        let value: Value = Value::Int(3);
        assert_eq!(value.size(), 0);
        assert_eq!(value.get("a"), None);
        assert_eq!(value.index(0), None);
        assert_eq!(value.as_int(), Some(3));
        assert_eq!(value.as_float(), None);
    }

    #[test]
    fn int_and_float_are_distinct() {
        let int: Value = Value::Int(1);
        let float: Value = Value::Float(1.0);
        assert_ne!(int, float);
        assert_eq!(std::format!("{int:?} {float:?}"), "1 1.0");
    }
}
