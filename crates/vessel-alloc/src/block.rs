//! Owned regions of uninitialized slots.

#![allow(unsafe_code)]

use std::fmt;
use std::mem::{self, MaybeUninit};
use std::ops::Range;
use std::ptr::NonNull;
use std::slice;

use vessel_core::AllocError;

use crate::raw::{MallocAlloc, RawAllocator};
use crate::typed::TypedAlloc;

/// One allocator-produced region with room for `capacity` values of `T`.
///
/// The block tracks storage, not values: it never reads, drops or
/// initializes a slot. Dropping the block releases the region without
/// touching its contents, so the owner must destroy live values first.
///
/// Blocks of a zero-sized `T` report a capacity of `usize::MAX` and never
/// allocate.
pub struct StorageBlock<T, A: RawAllocator = MallocAlloc> {
    ptr: NonNull<T>,
    cap: usize,
    alloc: TypedAlloc<T, A>,
}

// SAFETY: the block uniquely owns its region, like `Box<[MaybeUninit<T>]>`.
unsafe impl<T: Send, A: RawAllocator + Send> Send for StorageBlock<T, A> {}
// SAFETY: shared access only hands out `*const T`.
unsafe impl<T: Sync, A: RawAllocator + Sync> Sync for StorageBlock<T, A> {}

impl<T, A: RawAllocator> StorageBlock<T, A> {
    /// An empty block that has not allocated.
    pub fn new_in(alloc: A) -> Self {
        let cap = if mem::size_of::<T>() == 0 { usize::MAX } else { 0 };
        Self {
            ptr: NonNull::dangling(),
            cap,
            alloc: TypedAlloc::new(alloc),
        }
    }

    /// A block with room for exactly `capacity` values.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Result<Self, AllocError> {
        let mut block = Self::new_in(alloc);
        if mem::size_of::<T>() != 0 && capacity != 0 {
            block.ptr = block.alloc.allocate(capacity)?;
            block.cap = capacity;
        }
        Ok(block)
    }

    /// An empty block sharing this block's allocator.
    pub fn sibling(&self, capacity: usize) -> Result<Self, AllocError> {
        Self::with_capacity_in(capacity, self.alloc.raw().clone())
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// The allocator this block draws from.
    pub fn allocator(&self) -> &A {
        self.alloc.raw()
    }

    /// Pointer to slot 0.
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Mutable pointer to slot 0.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Mutable view of the slots in `range`.
    ///
    /// # Panics
    ///
    /// Panics if `range` is reversed or extends past the capacity.
    pub fn slots(&mut self, range: Range<usize>) -> &mut [MaybeUninit<T>] {
        assert!(
            range.start <= range.end && range.end <= self.cap,
            "slot range {}..{} out of bounds for capacity {}",
            range.start,
            range.end,
            self.cap
        );
        // SAFETY: the range lies inside the owned region, `MaybeUninit`
        // makes any bit pattern valid, and `&mut self` makes it unique.
        unsafe {
            slice::from_raw_parts_mut(
                self.ptr.as_ptr().add(range.start).cast::<MaybeUninit<T>>(),
                range.end - range.start,
            )
        }
    }

    /// Mutable view of slot `index`.
    pub fn slot(&mut self, index: usize) -> &mut MaybeUninit<T> {
        &mut self.slots(index..index + 1)[0]
    }

    /// Shared view of slots `range`, which the caller asserts are live.
    ///
    /// # Safety
    ///
    /// Every slot in `range` must hold an initialized `T`.
    pub unsafe fn assume_init(&self, range: Range<usize>) -> &[T] {
        debug_assert!(range.start <= range.end && range.end <= self.cap);
        // SAFETY: in bounds, and initialized per the caller's contract.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr().add(range.start), range.end - range.start) }
    }

    /// Mutable view of slots `range`, which the caller asserts are live.
    ///
    /// # Safety
    ///
    /// Every slot in `range` must hold an initialized `T`.
    pub unsafe fn assume_init_mut(&mut self, range: Range<usize>) -> &mut [T] {
        debug_assert!(range.start <= range.end && range.end <= self.cap);
        // SAFETY: in bounds, initialized per the caller's contract, unique
        // through `&mut self`.
        unsafe {
            slice::from_raw_parts_mut(self.ptr.as_ptr().add(range.start), range.end - range.start)
        }
    }

    /// Resize the region to `new_capacity` slots through the allocator's
    /// reallocation path. Slot bytes below `min(old, new)` move with the
    /// region; values beyond a shrunk capacity are not dropped.
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), AllocError> {
        if mem::size_of::<T>() == 0 || new_capacity == self.cap {
            return Ok(());
        }
        // SAFETY: `ptr`/`cap` describe this block's live storage.
        self.ptr = unsafe { self.alloc.reallocate(self.ptr, self.cap, new_capacity)? };
        self.cap = new_capacity;
        Ok(())
    }
}

impl<T, A: RawAllocator + Default> Default for StorageBlock<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T, A: RawAllocator> Drop for StorageBlock<T, A> {
    fn drop(&mut self) {
        if mem::size_of::<T>() != 0 {
            // SAFETY: `ptr` came from `alloc` with exactly `cap` slots; an
            // empty block is ignored by `deallocate`.
            unsafe { self.alloc.deallocate(self.ptr, self.cap) }
        }
    }
}

impl<T, A: RawAllocator> fmt::Debug for StorageBlock<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageBlock")
            .field("ptr", &self.ptr)
            .field("capacity", &self.cap)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_block_does_not_allocate() {
        let block = StorageBlock::<u32>::default();
        assert_eq!(block.capacity(), 0);
        assert_eq!(block.as_ptr(), NonNull::<u32>::dangling().as_ptr());
    }

    #[test]
    fn zst_block_is_unbounded() {
        let block = StorageBlock::<()>::with_capacity_in(10, MallocAlloc::new()).unwrap();
        assert_eq!(block.capacity(), usize::MAX);
    }

    #[test]
    fn slots_write_then_read() {
        let mut block = StorageBlock::<u64>::with_capacity_in(4, MallocAlloc::new()).unwrap();
        for (i, slot) in block.slots(0..4).iter_mut().enumerate() {
            slot.write(i as u64 + 1);
        }
        let live = unsafe { block.assume_init(1..3) };
        assert_eq!(live, &[2, 3]);
    }

    #[test]
    fn resize_keeps_prefix() {
        let mut block = StorageBlock::<u8>::with_capacity_in(2, MallocAlloc::new()).unwrap();
        block.slot(0).write(b'a');
        block.slot(1).write(b'b');
        block.resize(16).unwrap();
        assert_eq!(block.capacity(), 16);
        assert_eq!(unsafe { block.assume_init(0..2) }, b"ab");
        block.resize(1).unwrap();
        assert_eq!(unsafe { block.assume_init(0..1) }, b"a");
    }

    #[test]
    fn sibling_shares_allocator_config() {
        let alloc = MallocAlloc::with_config(crate::AllocConfig::new().with_max_recovery_attempts(2));
        let block = StorageBlock::<u8>::new_in(alloc);
        let sibling = block.sibling(8).unwrap();
        assert_eq!(sibling.capacity(), 8);
        assert_eq!(sibling.allocator().config().max_recovery_attempts, Some(2));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn slot_range_past_capacity_panics() {
        let mut block = StorageBlock::<u8>::with_capacity_in(2, MallocAlloc::new()).unwrap();
        let _ = block.slots(1..3);
    }
}
