//! Contiguous dynamic array.

#![allow(unsafe_code)]

use std::convert::Infallible;
use std::fmt;
use std::mem::{self, MaybeUninit};
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::ptr;
use std::slice::{self, SliceIndex};

use vessel_alloc::lifecycle::destroy_range;
use vessel_alloc::uninit::{try_uninitialized_fill_with, uninitialized_copy, uninitialized_fill_n};
use vessel_alloc::{MallocAlloc, RawAllocator, StorageBlock};
use vessel_core::{AllocError, SliceCursor, TypeTraits};

use crate::growth;

/// A growable array stored in one [`StorageBlock`].
///
/// Slots `[0, len)` hold live values and `[len, capacity)` are reserved.
/// Positions are indices: `0` is the beginning and `len()` the end.
///
/// Growth allocates a fresh block, builds any new elements in their final
/// slots, then moves the old elements across. A failure while building
/// leaves the array untouched. Relocation never fails: it is a bitwise
/// move, not a copy.
///
/// ```
/// use vessel_containers::Array;
///
/// let mut a = Array::new();
/// a.push_back(1);
/// a.push_back(2);
/// a.push_back(3);
/// assert_eq!(a.capacity(), 4);
///
/// a.erase(1);
/// assert_eq!(a, [1, 3]);
///
/// a.insert_n(1, 2, &9);
/// assert_eq!(a, [1, 9, 9, 3]);
/// ```
pub struct Array<T: TypeTraits, A: RawAllocator = MallocAlloc> {
    buf: StorageBlock<T, A>,
    len: usize,
}

#[cold]
fn capacity_overflow() -> ! {
    panic!("capacity overflow")
}

fn expect_block<T, A: RawAllocator>(
    block: Result<StorageBlock<T, A>, AllocError>,
) -> StorageBlock<T, A> {
    match block {
        Ok(block) => block,
        Err(e) => panic!("{e}"),
    }
}

impl<T: TypeTraits> Array<T> {
    /// An empty array on the global heap. Does not allocate.
    pub fn new() -> Self {
        Self::new_in(MallocAlloc::new())
    }

    /// `n` clones of `value`.
    pub fn from_elem(n: usize, value: &T) -> Self
    where
        T: Clone,
    {
        Self::from_elem_in(n, value, MallocAlloc::new())
    }

    /// `n` default values.
    pub fn with_len(n: usize) -> Self
    where
        T: Default,
    {
        Self::with_len_in(n, MallocAlloc::new())
    }
}

impl<T: TypeTraits, A: RawAllocator> Array<T, A> {
    /// An empty array drawing from `alloc`. Does not allocate.
    pub fn new_in(alloc: A) -> Self {
        Self {
            buf: StorageBlock::new_in(alloc),
            len: 0,
        }
    }

    /// An empty array with room for `capacity` values.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        Self {
            buf: expect_block(StorageBlock::with_capacity_in(capacity, alloc)),
            len: 0,
        }
    }

    /// `n` clones of `value`, drawing from `alloc`.
    pub fn from_elem_in(n: usize, value: &T, alloc: A) -> Self
    where
        T: Clone,
    {
        let mut array = Self::with_capacity_in(n, alloc);
        let built = uninitialized_fill_n(array.buf.slots(0..n), n, value).len();
        array.len = built;
        array
    }

    /// `n` default values, drawing from `alloc`.
    pub fn with_len_in(n: usize, alloc: A) -> Self
    where
        T: Default,
    {
        let mut array = Self::with_capacity_in(n, alloc);
        let Ok(built) = try_uninitialized_fill_with(array.buf.slots(0..n), |_| {
            Ok::<T, Infallible>(T::default())
        });
        array.len = built.len();
        array
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of slots in the current block.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Whether the array holds no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The allocator backing this array.
    pub fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    /// The live values.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `[0, len)` are initialized.
        unsafe { self.buf.assume_init(0..self.len) }
    }

    /// The live values, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: `[0, len)` are initialized.
        unsafe { self.buf.assume_init_mut(0..self.len) }
    }

    /// Cursor at the first value.
    pub fn begin(&self) -> SliceCursor<'_, T> {
        SliceCursor::begin(self.as_slice())
    }

    /// Cursor one past the last value.
    pub fn end(&self) -> SliceCursor<'_, T> {
        SliceCursor::end(self.as_slice())
    }

    /// The first value.
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// The first value, mutably.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().first_mut()
    }

    /// The last value.
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// The last value, mutably.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    /// Append `value`. Grows to `max(1, 2 * len)` when full.
    pub fn push_back(&mut self, value: T) {
        self.insert(self.len, value);
    }

    /// Remove and return the last value.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: slot `len` was live and is now outside `[0, len)`, so it
        // is read exactly once.
        Some(unsafe { ptr::read(self.buf.as_ptr().add(self.len)) })
    }

    /// Insert `value` before position `pos`; returns `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos > len`.
    pub fn insert(&mut self, pos: usize, value: T) -> usize {
        self.check_insert_position(pos);
        if self.len == self.capacity() {
            let new_cap = growth::grow_one(self.len).unwrap_or_else(|| capacity_overflow());
            let mut fresh = expect_block(self.buf.sibling(new_cap));
            fresh.slot(pos).write(value);
            self.relocate_around(fresh, pos, 1);
        } else {
            let base = self.buf.as_mut_ptr();
            // SAFETY: `len < capacity`, so the shifted tail stays in bounds;
            // the gap at `pos` is refilled before anything can observe it.
            unsafe {
                ptr::copy(base.add(pos), base.add(pos + 1), self.len - pos);
                base.add(pos).write(value);
            }
        }
        self.len += 1;
        pos
    }

    /// Insert `n` clones of `value` before `pos`; returns `pos`.
    ///
    /// Grows to `len + max(len, n)` when there is too little slack. A
    /// panicking `clone` leaves the array unchanged.
    pub fn insert_n(&mut self, pos: usize, n: usize, value: &T) -> usize
    where
        T: Clone,
    {
        let Ok(pos) = self.insert_gap(pos, n, |gap| {
            uninitialized_fill_n(gap, n, value);
            Ok::<(), Infallible>(())
        });
        pos
    }

    /// Insert `n` values produced by `make(i)` before `pos`; returns `pos`.
    ///
    /// If `make` fails, every value built so far is dropped and the array
    /// is left unchanged.
    pub fn try_insert_with<E, F>(&mut self, pos: usize, n: usize, make: F) -> Result<usize, E>
    where
        F: FnMut(usize) -> Result<T, E>,
    {
        self.insert_gap(pos, n, |gap| try_uninitialized_fill_with(gap, make).map(|_| ()))
    }

    /// Remove the value at `pos`, shifting the tail left. Erasing at
    /// `len()` is a no-op. Returns `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos > len`.
    pub fn erase(&mut self, pos: usize) -> usize {
        self.check_insert_position(pos);
        if pos == self.len {
            return pos;
        }
        let base = self.buf.as_mut_ptr();
        // SAFETY: `pos < len`. The value is read out once, the tail closes
        // the hole, and `len` shrinks before the value is dropped.
        let removed = unsafe {
            let removed = ptr::read(base.add(pos));
            ptr::copy(base.add(pos + 1), base.add(pos), self.len - pos - 1);
            removed
        };
        self.len -= 1;
        drop(removed);
        pos
    }

    /// Remove `[first, last)`, shifting the suffix into the hole. Returns
    /// `first`.
    ///
    /// # Panics
    ///
    /// Panics unless `first <= last <= len`.
    pub fn erase_range(&mut self, first: usize, last: usize) -> usize {
        assert!(
            first <= last && last <= self.len,
            "erase range {first}..{last} out of bounds for length {}",
            self.len
        );
        if first == last {
            return first;
        }
        let old_len = self.len;
        // A panicking destructor leaks the suffix instead of exposing
        // dropped slots.
        self.len = first;
        // SAFETY: `[first, last)` are live and no longer covered by `len`.
        unsafe { destroy_range(self.buf.slots(first..last)) };
        let base = self.buf.as_mut_ptr();
        // SAFETY: the suffix `[last, old_len)` is live; the destination
        // starts inside the block.
        unsafe { ptr::copy(base.add(last), base.add(first), old_len - last) };
        self.len = old_len - (last - first);
        first
    }

    /// Drop every value. Capacity is kept.
    pub fn clear(&mut self) {
        self.erase_range(0, self.len);
    }

    /// Truncate or extend to `n` values, filling with clones of `value`.
    pub fn resize(&mut self, n: usize, value: &T)
    where
        T: Clone,
    {
        if n < self.len {
            self.erase_range(n, self.len);
        } else {
            self.insert_n(self.len, n - self.len, value);
        }
    }

    /// Truncate or extend to `n` values, filling with defaults.
    pub fn resize_default(&mut self, n: usize)
    where
        T: Default,
    {
        if n < self.len {
            self.erase_range(n, self.len);
        } else {
            let Ok(_) = self.try_insert_with(self.len, n - self.len, |_| {
                Ok::<T, Infallible>(T::default())
            });
        }
    }

    /// Ensure room for at least `capacity` values in total.
    ///
    /// # Panics
    ///
    /// Panics if the byte size overflows.
    pub fn reserve(&mut self, capacity: usize) {
        if let Err(e) = self.try_reserve(capacity) {
            panic!("{e}");
        }
    }

    /// Ensure room for at least `capacity` values in total, reporting a
    /// size overflow instead of panicking.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), AllocError> {
        if capacity <= self.capacity() {
            return Ok(());
        }
        let fresh = self.buf.sibling(capacity)?;
        let len = self.len;
        self.relocate_around(fresh, len, 0);
        Ok(())
    }

    fn check_insert_position(&self, pos: usize) {
        assert!(
            pos <= self.len,
            "position {pos} out of range for length {}",
            self.len
        );
    }

    /// Move the live values into `fresh`, leaving a gap of `gap` slots at
    /// `pos`, and release the old block. Does not touch `len`.
    fn relocate_around(&mut self, mut fresh: StorageBlock<T, A>, pos: usize, gap: usize) {
        debug_assert!(fresh.capacity() >= self.len + gap);
        let src = self.buf.as_ptr();
        let dst = fresh.as_mut_ptr();
        // SAFETY: both blocks are distinct and large enough; prefix and
        // suffix are live in the source and land outside the gap.
        unsafe {
            ptr::copy_nonoverlapping(src, dst, pos);
            ptr::copy_nonoverlapping(src.add(pos), dst.add(pos + gap), self.len - pos);
        }
        log::debug!(
            "array of {} reallocated: {} -> {} slots",
            std::any::type_name::<T>(),
            self.buf.capacity(),
            fresh.capacity()
        );
        // The old block now holds only moved-from bytes; dropping it frees
        // the region without running destructors.
        mem::swap(&mut self.buf, &mut fresh);
    }

    /// Open a gap of `n` slots at `pos` and let `fill` construct all of
    /// them. `fill` must either construct every slot or leave all raw.
    fn insert_gap<E, F>(&mut self, pos: usize, n: usize, fill: F) -> Result<usize, E>
    where
        F: FnOnce(&mut [MaybeUninit<T>]) -> Result<(), E>,
    {
        self.check_insert_position(pos);
        if n == 0 {
            return Ok(pos);
        }
        let needed = self.len.checked_add(n).unwrap_or_else(|| capacity_overflow());
        if needed > self.capacity() {
            let new_cap = growth::grow_n(self.len, n).unwrap_or_else(|| capacity_overflow());
            let mut fresh = expect_block(self.buf.sibling(new_cap));
            // On failure `fresh` is freed here and `self` was never touched.
            fill(fresh.slots(pos..pos + n))?;
            self.relocate_around(fresh, pos, n);
            self.len = needed;
            return Ok(pos);
        }

        let tail = self.len - pos;
        let base = self.buf.as_mut_ptr();
        // SAFETY: `len + n <= capacity`, so the shifted tail stays in bounds.
        unsafe { ptr::copy(base.add(pos), base.add(pos + n), tail) };
        let guard = TailGuard {
            array: self,
            pos,
            n,
            tail,
        };
        // Until the guard commits, `len == pos` and the tail sits past the
        // gap, so no slot is double-counted.
        guard.array.len = pos;
        fill(guard.array.buf.slots(pos..pos + n))?;
        guard.commit();
        Ok(pos)
    }
}

/// Restores a shifted tail if filling the gap in front of it fails.
struct TailGuard<'a, T: TypeTraits, A: RawAllocator> {
    array: &'a mut Array<T, A>,
    pos: usize,
    n: usize,
    tail: usize,
}

impl<T: TypeTraits, A: RawAllocator> TailGuard<'_, T, A> {
    fn commit(self) {
        self.array.len = self.pos + self.n + self.tail;
        mem::forget(self);
    }
}

impl<T: TypeTraits, A: RawAllocator> Drop for TailGuard<'_, T, A> {
    fn drop(&mut self) {
        let base = self.array.buf.as_mut_ptr();
        // SAFETY: the gap is raw again (the fill rolled itself back), so
        // the tail can slide back over it.
        unsafe { ptr::copy(base.add(self.pos + self.n), base.add(self.pos), self.tail) };
        self.array.len = self.pos + self.tail;
    }
}

impl<T: TypeTraits> Default for Array<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TypeTraits, A: RawAllocator> Drop for Array<T, A> {
    fn drop(&mut self) {
        let len = self.len;
        // SAFETY: `[0, len)` are live; the block frees itself afterwards.
        unsafe { destroy_range(self.buf.slots(0..len)) }
    }
}

impl<T: TypeTraits + Clone, A: RawAllocator> Clone for Array<T, A> {
    fn clone(&self) -> Self {
        let mut buf = expect_block(self.buf.sibling(self.len));
        let len = uninitialized_copy(self.as_slice(), buf.slots(0..self.len)).len();
        Self { buf, len }
    }
}

impl<T: TypeTraits, A: RawAllocator> Deref for Array<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: TypeTraits, A: RawAllocator> DerefMut for Array<T, A> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: TypeTraits, A: RawAllocator, I: SliceIndex<[T]>> Index<I> for Array<T, A> {
    type Output = I::Output;

    fn index(&self, index: I) -> &I::Output {
        &self.as_slice()[index]
    }
}

impl<T: TypeTraits, A: RawAllocator, I: SliceIndex<[T]>> IndexMut<I> for Array<T, A> {
    fn index_mut(&mut self, index: I) -> &mut I::Output {
        &mut self.as_mut_slice()[index]
    }
}

impl<T: TypeTraits + fmt::Debug, A: RawAllocator> fmt::Debug for Array<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: TypeTraits + PartialEq, A: RawAllocator, B: RawAllocator> PartialEq<Array<T, B>>
    for Array<T, A>
{
    fn eq(&self, other: &Array<T, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: TypeTraits + Eq, A: RawAllocator> Eq for Array<T, A> {}

impl<T: TypeTraits + PartialEq, A: RawAllocator, const N: usize> PartialEq<[T; N]> for Array<T, A> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T: TypeTraits + PartialEq, A: RawAllocator> PartialEq<[T]> for Array<T, A> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: TypeTraits, A: RawAllocator> Extend<T> for Array<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        if let Some(wanted) = self.len.checked_add(lower) {
            if wanted > self.capacity() {
                self.reserve(wanted);
            }
        }
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T: TypeTraits, A: RawAllocator + Default> FromIterator<T> for Array<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new_in(A::default());
        array.extend(iter);
        array
    }
}

impl<'a, T: TypeTraits, A: RawAllocator> IntoIterator for &'a Array<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> slice::Iter<'a, T> {
        self.as_slice().iter()
    }
}

impl<'a, T: TypeTraits, A: RawAllocator> IntoIterator for &'a mut Array<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> slice::IterMut<'a, T> {
        self.as_mut_slice().iter_mut()
    }
}
