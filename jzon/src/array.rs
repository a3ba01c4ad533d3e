// SPDX-License-Identifier: Apache-2.0

use crate::allocator::{Allocator, Heap};
use crate::buffer::Buf;
use crate::value::Value;

/// Array elements, densely packed in input order.
pub struct Array<A: Allocator = Heap> {
    items: Buf<Value<A>, A>,
}

impl<A: Allocator> Array<A> {
    pub(crate) fn from_items(items: Buf<Value<A>, A>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Slots held by the element storage; zero for an empty array.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    pub fn get(&self, index: usize) -> Option<&Value<A>> {
        self.items.get(index)
    }

    pub fn as_slice(&self) -> &[Value<A>] {
        self.items.as_slice()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Value<A>> {
        self.items.iter()
    }
}

impl<'t, A: Allocator> IntoIterator for &'t Array<A> {
    type Item = &'t Value<A>;
    type IntoIter = core::slice::Iter<'t, Value<A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<A: Allocator> PartialEq for Array<A> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<A: Allocator> core::fmt::Debug for Array<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
