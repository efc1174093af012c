//! Typed view over a raw allocator.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use vessel_core::AllocError;

use crate::raw::{MallocAlloc, RawAllocator};

/// Allocates storage for values of `T` from a [`RawAllocator`].
///
/// Storage only: nothing here constructs or destroys a `T`. Requests that
/// need no bytes (`n == 0` or a zero-sized `T`) never reach the raw
/// allocator and yield a dangling, well-aligned pointer.
pub struct TypedAlloc<T, A: RawAllocator = MallocAlloc> {
    raw: A,
    _marker: PhantomData<fn() -> T>,
}

impl<T, A: RawAllocator> TypedAlloc<T, A> {
    /// Wrap a raw allocator.
    pub fn new(raw: A) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    /// The underlying raw allocator.
    pub fn raw(&self) -> &A {
        &self.raw
    }

    /// Layout of `n` contiguous values.
    pub fn layout_for(n: usize) -> Result<Layout, AllocError> {
        Layout::array::<T>(n).map_err(|_| AllocError::CapacityOverflow {
            count: n,
            elem_size: mem::size_of::<T>(),
        })
    }

    /// Storage for `n` contiguous values.
    pub fn allocate(&self, n: usize) -> Result<NonNull<T>, AllocError> {
        let layout = Self::layout_for(n)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        Ok(self.raw.allocate(layout).cast())
    }

    /// Storage for exactly one value.
    pub fn allocate_one(&self) -> NonNull<T> {
        let layout = Layout::new::<T>();
        if layout.size() == 0 {
            return NonNull::dangling();
        }
        self.raw.allocate(layout).cast()
    }

    /// Release storage for `n` values. Does nothing when `n == 0`.
    ///
    /// # Safety
    ///
    /// `ptr` must come from [`allocate`](Self::allocate)`(n)` (or a
    /// reallocation to `n`) on this adapter or a clone of its allocator.
    ///
    /// # Panics
    ///
    /// Panics if `n` values have no valid layout. No allocation of that
    /// count can exist, so the caller passed the wrong count.
    pub unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        let layout = match Self::layout_for(n) {
            Ok(layout) => layout,
            Err(err) => panic!("deallocate of {n} values: {err}"),
        };
        if layout.size() != 0 {
            // SAFETY: caller guarantees `ptr` was allocated with `layout`.
            unsafe { self.raw.deallocate(ptr.cast(), layout) }
        }
    }

    /// Release storage for one value.
    ///
    /// # Safety
    ///
    /// `ptr` must come from [`allocate_one`](Self::allocate_one).
    pub unsafe fn deallocate_one(&self, ptr: NonNull<T>) {
        // SAFETY: one value has the same layout as an array of one.
        unsafe { self.deallocate(ptr, 1) }
    }

    /// Resize storage from `old_n` to `new_n` values. The first
    /// `min(old_n, new_n)` slots keep their bytes.
    ///
    /// # Safety
    ///
    /// `ptr` must be live storage for `old_n` values from this adapter. On
    /// success the old pointer is no longer valid; on error it is untouched.
    pub unsafe fn reallocate(
        &self,
        ptr: NonNull<T>,
        old_n: usize,
        new_n: usize,
    ) -> Result<NonNull<T>, AllocError> {
        let new_layout = Self::layout_for(new_n)?;
        let old_layout = Self::layout_for(old_n)?;
        if old_layout.size() == 0 {
            return self.allocate(new_n);
        }
        if new_layout.size() == 0 {
            // SAFETY: forwarded caller contract.
            unsafe { self.deallocate(ptr, old_n) };
            return Ok(NonNull::dangling());
        }
        // SAFETY: forwarded caller contract; both sizes are non-zero.
        let new_ptr = unsafe { self.raw.reallocate(ptr.cast(), old_layout, new_layout.size()) };
        Ok(new_ptr.cast())
    }
}

impl<T, A: RawAllocator + Default> Default for TypedAlloc<T, A> {
    fn default() -> Self {
        Self::new(A::default())
    }
}

impl<T, A: RawAllocator> Clone for TypedAlloc<T, A> {
    fn clone(&self) -> Self {
        Self::new(self.raw.clone())
    }
}

impl<T, A: RawAllocator + fmt::Debug> fmt::Debug for TypedAlloc<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedAlloc")
            .field("elem", &std::any::type_name::<T>())
            .field("raw", &self.raw)
            .finish()
    }
}
