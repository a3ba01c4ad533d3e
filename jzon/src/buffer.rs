// SPDX-License-Identifier: Apache-2.0

use core::alloc::Layout;
use core::marker::PhantomData;
use core::ops::Deref;
use core::ptr::{self, NonNull};

use crate::allocator::{AllocError, Allocator};

/// A contiguous, growable buffer whose storage comes from an [`Allocator`].
///
/// This is the single storage primitive behind strings, arrays and table key
/// indexes. It owns its elements: dropping the buffer drops every element and
/// then returns the storage to the allocator that produced it.
///
/// `T` must not be zero-sized.
pub struct Buf<T, A: Allocator> {
    ptr: NonNull<T>,
    cap: usize,
    len: usize,
    alloc: A,
    _owns: PhantomData<T>,
}

// SAFETY: `Buf` owns its elements exactly like `Vec` does.
unsafe impl<T: Send, A: Allocator + Send> Send for Buf<T, A> {}
unsafe impl<T: Sync, A: Allocator + Sync> Sync for Buf<T, A> {}

impl<T, A: Allocator> Buf<T, A> {
    /// An empty buffer. Does not allocate.
    pub fn new_in(alloc: A) -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            len: 0,
            alloc,
            _owns: PhantomData,
        }
    }

    /// A buffer with room for exactly `capacity` elements.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Result<Self, AllocError> {
        let mut buf = Self::new_in(alloc);
        buf.resize_storage(capacity)?;
        Ok(buf)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the current storage can hold.
    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are initialised; a dangling pointer is
        // valid for an empty slice.
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Appends an element, doubling the storage when it is full.
    pub fn push(&mut self, value: T) -> Result<(), AllocError> {
        self.reserve_one()?;
        // SAFETY: reserve_one guarantees `len < cap`.
        unsafe { self.ptr.as_ptr().add(self.len).write(value) };
        self.len += 1;
        Ok(())
    }

    /// Inserts an element at `index`, shifting everything after it one slot
    /// to the right with a single block move.
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), AllocError> {
        assert!(index <= self.len, "insert index out of bounds");
        self.reserve_one()?;
        // SAFETY: `len < cap`, so the tail fits one slot further right.
        unsafe {
            let slot = self.ptr.as_ptr().add(index);
            ptr::copy(slot, slot.add(1), self.len - index);
            slot.write(value);
        }
        self.len += 1;
        Ok(())
    }

    /// Releases unused capacity. An empty buffer ends up with no storage.
    pub fn shrink_to_fit(&mut self) -> Result<(), AllocError> {
        self.resize_storage(self.len)
    }

    fn reserve_one(&mut self) -> Result<(), AllocError> {
        if self.len < self.cap {
            return Ok(());
        }
        let new_cap = if self.cap == 0 {
            1
        } else {
            self.cap.checked_mul(2).ok_or(AllocError::CapacityOverflow)?
        };
        self.resize_storage(new_cap)
    }

    fn layout(cap: usize) -> Result<Layout, AllocError> {
        Layout::array::<T>(cap).map_err(|_| AllocError::CapacityOverflow)
    }

    /// Moves the storage to exactly `new_cap` slots; `new_cap >= len`.
    fn resize_storage(&mut self, new_cap: usize) -> Result<(), AllocError> {
        debug_assert!(new_cap >= self.len);
        if new_cap == self.cap {
            return Ok(());
        }
        if new_cap == 0 {
            self.release();
            return Ok(());
        }

        let new_layout = Self::layout(new_cap)?;
        let raw = if self.cap == 0 {
            self.alloc.allocate(new_layout)
        } else {
            let old_layout = Self::layout(self.cap)?;
            // SAFETY: `ptr` is live and was allocated with `old_layout`.
            unsafe {
                self.alloc
                    .reallocate(self.ptr.cast(), old_layout, new_layout.size())
            }
        };
        self.ptr = raw.ok_or(AllocError::Exhausted)?.cast();
        self.cap = new_cap;
        Ok(())
    }

    fn release(&mut self) {
        if self.cap == 0 {
            return;
        }
        if let Ok(layout) = Self::layout(self.cap) {
            // SAFETY: `ptr` is live and was allocated with this layout.
            unsafe { self.alloc.deallocate(self.ptr.cast(), layout) };
        }
        self.ptr = NonNull::dangling();
        self.cap = 0;
    }
}

impl<T: Copy, A: Allocator> Buf<T, A> {
    /// Appends a copy of every element of `items`.
    pub fn extend_from_slice(&mut self, items: &[T]) -> Result<(), AllocError> {
        let needed = self
            .len
            .checked_add(items.len())
            .ok_or(AllocError::CapacityOverflow)?;
        if needed > self.cap {
            let doubled = self.cap.saturating_mul(2);
            self.resize_storage(needed.max(doubled))?;
        }
        // SAFETY: capacity covers `needed`; `items` cannot alias our storage
        // because we hold `&mut self`.
        unsafe {
            ptr::copy_nonoverlapping(
                items.as_ptr(),
                self.ptr.as_ptr().add(self.len),
                items.len(),
            )
        };
        self.len = needed;
        Ok(())
    }
}

impl<T, A: Allocator> Drop for Buf<T, A> {
    fn drop(&mut self) {
        // SAFETY: the first `len` slots are initialised and owned by us.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.ptr.as_ptr(),
                self.len,
            ))
        };
        self.release();
    }
}

impl<T, A: Allocator> Deref for Buf<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: core::fmt::Debug, A: Allocator> core::fmt::Debug for Buf<T, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, A: Allocator> PartialEq for Buf<T, A> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}
