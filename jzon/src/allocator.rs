// SPDX-License-Identifier: Apache-2.0

//! The allocation capability threaded through every parse.
//!
//! Nothing in this crate allocates through any channel other than the
//! [`Allocator`] it was handed. Hosts with arena or pool allocators implement
//! the trait themselves; [`Heap`] forwards to the global allocator for the
//! convenience entry points.

use core::alloc::Layout;
use core::cell::Cell;
use core::ptr::NonNull;

/// Errors reported by allocating operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// The allocator refused the request.
    Exhausted,
    /// The requested capacity does not fit in a `Layout`.
    CapacityOverflow,
}

impl core::fmt::Display for AllocError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AllocError::Exhausted => write!(f, "allocator exhausted"),
            AllocError::CapacityOverflow => write!(f, "capacity overflow"),
        }
    }
}

/// A three-operation allocation capability.
///
/// Callers never request zero-sized blocks.
///
/// # Safety
///
/// Implementations must return blocks that are valid for reads and writes of
/// `layout.size()` bytes and aligned to `layout.align()`, and must keep them
/// valid until they are passed back to `deallocate` or `reallocate`.
pub unsafe trait Allocator {
    /// Allocates a block described by `layout`, or returns `None`.
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Releases a block previously returned by this allocator.
    ///
    /// # Safety
    ///
    /// `ptr` must denote a live block of this allocator, allocated with
    /// `layout`.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Resizes a block to `new_size` bytes, preserving the common prefix.
    ///
    /// On `None` the original block is left untouched and still owned by the
    /// caller.
    ///
    /// # Safety
    ///
    /// `ptr` must denote a live block of this allocator, allocated with
    /// `layout`, and `new_size` must be non-zero.
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        layout: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>>;
}

unsafe impl<A: Allocator + ?Sized> Allocator for &A {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        (**self).allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).deallocate(ptr, layout)
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        layout: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        (**self).reallocate(ptr, layout, new_size)
    }
}

/// The general-purpose heap, backing the convenience entry points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Heap;

unsafe impl Allocator for Heap {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.size() == 0 {
            return None;
        }
        // SAFETY: the layout has a non-zero size.
        NonNull::new(unsafe { alloc::alloc::alloc(layout) })
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        alloc::alloc::dealloc(ptr.as_ptr(), layout)
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        layout: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        NonNull::new(alloc::alloc::realloc(ptr.as_ptr(), layout, new_size))
    }
}

/// Wraps another allocator and keeps count of the blocks it hands out.
///
/// Useful for asserting that a parse followed by a free is net-zero:
///
/// ```
/// use jzon::allocator::Counting;
///
/// let counter = Counting::new();
/// let value = jzon::parse_in("a: [1, 2, 3]", &counter).unwrap();
/// assert!(counter.live() > 0);
/// jzon::free(value);
/// assert_eq!(counter.live(), 0);
/// ```
#[derive(Debug)]
pub struct Counting<A: Allocator = Heap> {
    inner: A,
    live: Cell<usize>,
    allocations: Cell<usize>,
    reallocations: Cell<usize>,
}

impl Counting<Heap> {
    /// Counts blocks taken from [`Heap`].
    pub fn new() -> Self {
        Self::wrapping(Heap)
    }
}

impl Default for Counting<Heap> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Allocator> Counting<A> {
    pub fn wrapping(inner: A) -> Self {
        Self {
            inner,
            live: Cell::new(0),
            allocations: Cell::new(0),
            reallocations: Cell::new(0),
        }
    }

    /// Blocks currently allocated and not yet released.
    pub fn live(&self) -> usize {
        self.live.get()
    }

    /// Total successful `allocate` calls.
    pub fn allocations(&self) -> usize {
        self.allocations.get()
    }

    /// Total successful `reallocate` calls.
    pub fn reallocations(&self) -> usize {
        self.reallocations.get()
    }
}

unsafe impl<A: Allocator> Allocator for Counting<A> {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        let ptr = self.inner.allocate(layout)?;
        self.live.set(self.live.get() + 1);
        self.allocations.set(self.allocations.get() + 1);
        Some(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.inner.deallocate(ptr, layout);
        self.live.set(self.live.get() - 1);
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        layout: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        let ptr = self.inner.reallocate(ptr, layout, new_size)?;
        self.reallocations.set(self.reallocations.get() + 1);
        Some(ptr)
    }
}
