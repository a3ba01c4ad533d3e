// SPDX-License-Identifier: Apache-2.0

use log::debug;

use crate::allocator::{AllocError, Allocator, Heap};
use crate::buffer::Buf;
use crate::hash::key_hash;
use crate::text::Text;
use crate::value::Value;

/// One table member.
pub struct Pair<A: Allocator = Heap> {
    key: Text<A>,
    key_hash: u64,
    value: Value<A>,
}

impl<A: Allocator> Pair<A> {
    pub fn key(&self) -> &Text<A> {
        &self.key
    }

    pub fn key_hash(&self) -> u64 {
        self.key_hash
    }

    pub fn value(&self) -> &Value<A> {
        &self.value
    }
}

impl<A: Allocator> PartialEq for Pair<A> {
    fn eq(&self, other: &Self) -> bool {
        self.key_hash == other.key_hash && self.key == other.key && self.value == other.value
    }
}

impl<A: Allocator> core::fmt::Debug for Pair<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}: {:?}", self.key, self.value)
    }
}

/// A table's key index: members stored in non-decreasing `key_hash` order.
///
/// Members with equal hashes keep their insertion order, so a duplicated key
/// appears once per occurrence and [`Table::get`] returns the last one.
pub struct Table<A: Allocator = Heap> {
    pairs: Buf<Pair<A>, A>,
}

impl<A: Allocator> Table<A> {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Slots held by the key index storage. Equal to `len()` once parsing
    /// finished, and zero for an empty table.
    pub fn capacity(&self) -> usize {
        self.pairs.capacity()
    }

    /// Members in key index order (by hash, not by position in the input).
    pub fn pairs(&self) -> &[Pair<A>] {
        self.pairs.as_slice()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Pair<A>> {
        self.pairs.iter()
    }

    /// Looks a key up by binary search over the key hashes, then confirms the
    /// key bytes within the run of equal hashes.
    pub fn get<K: AsRef<[u8]> + ?Sized>(&self, key: &K) -> Option<&Value<A>> {
        let key = key.as_ref();
        let hash = key_hash(key);
        let pairs = self.pairs();
        let first = pairs.partition_point(|pair| pair.key_hash < hash);
        pairs[first..]
            .iter()
            .take_while(|pair| pair.key_hash == hash)
            .filter(|pair| pair.key.as_bytes() == key)
            .last()
            .map(|pair| &pair.value)
    }
}

impl<'t, A: Allocator> IntoIterator for &'t Table<A> {
    type Item = &'t Pair<A>;
    type IntoIter = core::slice::Iter<'t, Pair<A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<A: Allocator> PartialEq for Table<A> {
    fn eq(&self, other: &Self) -> bool {
        self.pairs == other.pairs
    }
}

impl<A: Allocator> core::fmt::Debug for Table<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|pair| (&pair.key, &pair.value)))
            .finish()
    }
}

/// Builds a [`Table`] with storage reserved up front.
pub(crate) struct TableBuilder<A: Allocator> {
    pairs: Buf<Pair<A>, A>,
}

impl<A: Allocator> TableBuilder<A> {
    pub fn with_capacity_in(bound: usize, alloc: A) -> Result<Self, AllocError> {
        Ok(Self {
            pairs: Buf::with_capacity_in(bound, alloc)?,
        })
    }

    /// Inserts after every member whose hash is not greater than the new
    /// key's, keeping the index sorted.
    pub fn insert(&mut self, key: Text<A>, value: Value<A>) -> Result<(), AllocError> {
        let key_hash = key_hash(key.as_bytes());
        let index = self
            .pairs
            .iter()
            .position(|pair| pair.key_hash > key_hash)
            .unwrap_or(self.pairs.len());
        self.pairs.insert(
            index,
            Pair {
                key,
                key_hash,
                value,
            },
        )
    }

    /// Shrinks the storage to the final member count.
    pub fn finish(mut self) -> Result<Table<A>, AllocError> {
        if self.pairs.len() != self.pairs.capacity() {
            debug!(
                "shrinking key index from {} to {} slots",
                self.pairs.capacity(),
                self.pairs.len()
            );
            self.pairs.shrink_to_fit()?;
        }
        Ok(Table { pairs: self.pairs })
    }
}

const TRIPLE_QUOTE: &[u8] = b"\"\"\"";

/// Upper bound on the member count of the table whose body starts at `input`.
///
/// Counts every `:` before the brace closing the table (`braced`) or before
/// end of input (root). Colons of nested tables are counted too; colons in
/// strings and comments are not, since no member separator can appear there.
pub(crate) fn member_bound(input: &[u8], braced: bool) -> usize {
    let mut count = 0;
    let mut depth = 0usize;
    let mut i = 0;
    while let Some(&byte) = input.get(i) {
        match byte {
            b':' => count += 1,
            b'{' => depth += 1,
            b'}' if depth > 0 => depth -= 1,
            b'}' if braced => break,
            b'#' => {
                i += find(&input[i..], b"\n").unwrap_or(input.len() - i);
                continue;
            }
            b'"' if input[i..].starts_with(TRIPLE_QUOTE) => {
                let body = i + TRIPLE_QUOTE.len();
                i = match find(&input[body..], TRIPLE_QUOTE) {
                    Some(len) => body + len + TRIPLE_QUOTE.len(),
                    None => input.len(),
                };
                continue;
            }
            b'"' => {
                let body = i + 1;
                i = match find(&input[body..], b"\"") {
                    Some(len) => body + len + 1,
                    None => input.len(),
                };
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    count
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::Counting;

    fn text(s: &str) -> Text {
        Text::copy_in(s.as_bytes(), Heap).unwrap()
    }

    fn build(keys: &[&str]) -> Table {
        let mut builder = TableBuilder::with_capacity_in(keys.len(), Heap).unwrap();
        for (i, key) in keys.iter().enumerate() {
            builder.insert(text(key), Value::Int(i as i32)).unwrap();
        }
        builder.finish().unwrap()
    }

    #[test]
    fn insertion_keeps_hash_order() {
        let table = build(&["zeta", "alpha", "mid", "b", "a", "longer_key_name"]);
        assert_eq!(table.len(), 6);
        let hashes: std::vec::Vec<u64> = table.iter().map(Pair::key_hash).collect();
        assert!(hashes.windows(2).all(|w| w[0] <= w[1]), "{hashes:?}");
    }

    #[test]
    fn get_finds_every_key() {
        let keys = ["zeta", "alpha", "mid", "b", "a", "longer_key_name"];
        let table = build(&keys);
        for (i, key) in keys.iter().enumerate() {
            assert_eq!(table.get(*key), Some(&Value::Int(i as i32)));
        }
        assert_eq!(table.get("missing"), None);
        assert_eq!(table.get(""), None);
    }

    #[test]
    fn duplicate_key_last_wins() {
        let table = build(&["k", "other", "k"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("k"), Some(&Value::Int(2)));
    }

    #[test]
    fn finish_shrinks_overcounted_storage() {
        let counter = Counting::new();
        let mut builder = TableBuilder::with_capacity_in(5, &counter).unwrap();
        let key = Text::copy_in(b"k", &counter).unwrap();
        builder.insert(key, Value::Null).unwrap();
        let table = builder.finish().unwrap();
        assert_eq!(table.capacity(), 1);
        assert_eq!(counter.reallocations(), 1);
        drop(table);
        assert_eq!(counter.live(), 0);
    }

    #[test]
    fn finish_empty_releases_storage() {
        let counter = Counting::new();
        let builder = TableBuilder::with_capacity_in(2, &counter).unwrap();
        let table = builder.finish().unwrap();
        assert!(table.is_empty());
        assert_eq!(table.capacity(), 0);
        assert_eq!(counter.live(), 0);
    }

    #[test]
    fn bound_counts_until_closing_brace() {
        assert_eq!(member_bound(b"a: 1, b: 2} c: 3", true), 2);
        assert_eq!(member_bound(b"a: 1, b: 2} c: 3", false), 3);
        assert_eq!(member_bound(b"}", true), 0);
        assert_eq!(member_bound(b"", false), 0);
    }

    #[test]
    fn bound_includes_nested_tables() {
        assert_eq!(member_bound(b"a: {x: 1, y: 2}, b: [{z: 3}]} tail: 4", true), 5);
    }

    #[test]
    fn bound_skips_strings_and_comments() {
        assert_eq!(member_bound(b"a: \"x:}y\" # c: }\n b: 2}", true), 2);
        assert_eq!(
            member_bound(b"a: \"\"\"one: \"two\" }\n\"\"\" b: 1}", true),
            2
        );
    }

    #[test]
    fn bound_survives_unterminated_input() {
        assert_eq!(member_bound(b"a: \"open", true), 1);
        assert_eq!(member_bound(b"a: \"\"\"open", true), 1);
        assert_eq!(member_bound(b"a: 1 # open", false), 1);
    }
}
