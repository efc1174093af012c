//! Basic sequence algorithms: copying, filling, comparison.
//!
//! The copy functions take slices. When the element type's record claims
//! `trivial_assignment`, they move bytes in bulk; otherwise each target is
//! overwritten with `clone_from`.

#![allow(unsafe_code)]

use std::ops::Range;
use std::ptr;

use vessel_core::iter::Cursor;
use vessel_core::type_traits::traits_of;
use vessel_core::TypeTraits;

/// Whether `[first1, last1)` and `[first2, last2)` have the same length
/// and pairwise-equal elements.
pub fn equal<C1, C2>(first1: C1, last1: C1, first2: C2, last2: C2) -> bool
where
    C1: Cursor,
    C2: Cursor,
    C1::Value: PartialEq<C2::Value>,
{
    equal_by(first1, last1, first2, last2, |a, b| a == b)
}

/// [`equal`] with a custom predicate.
pub fn equal_by<C1, C2, F>(mut first1: C1, last1: C1, mut first2: C2, last2: C2, mut eq: F) -> bool
where
    C1: Cursor,
    C2: Cursor,
    F: FnMut(&C1::Value, &C2::Value) -> bool,
{
    loop {
        match (first1 == last1, first2 == last2) {
            (true, true) => return true,
            (true, false) | (false, true) => return false,
            (false, false) => {}
        }
        if !eq(first1.get(), first2.get()) {
            return false;
        }
        first1.step();
        first2.step();
    }
}

/// Overwrite `dst[..src.len()]` with `src`, front to back. Returns
/// `src.len()`, the index one past the last element written.
///
/// # Panics
///
/// Panics if `dst` is shorter than `src`.
pub fn copy<T: TypeTraits + Clone>(src: &[T], dst: &mut [T]) -> usize {
    let n = src.len();
    assert!(dst.len() >= n, "copy of {n} values into {} slots", dst.len());
    if traits_of::<T>().trivial_assignment {
        // SAFETY: a bitwise overwrite is equivalent to `clone_from` and the
        // old values need no drop (record contract); the borrows are
        // disjoint.
        unsafe { ptr::copy_nonoverlapping(src.as_ptr(), dst.as_mut_ptr(), n) };
    } else {
        for (d, s) in dst.iter_mut().zip(src) {
            d.clone_from(s);
        }
    }
    n
}

/// Overwrite the last `src.len()` slots of `dst` with `src`, back to
/// front. Returns the index in `dst` of the first element written.
///
/// # Panics
///
/// Panics if `dst` is shorter than `src`.
pub fn copy_backward<T: TypeTraits + Clone>(src: &[T], dst: &mut [T]) -> usize {
    let n = src.len();
    assert!(dst.len() >= n, "copy of {n} values into {} slots", dst.len());
    let start = dst.len() - n;
    if traits_of::<T>().trivial_assignment {
        // SAFETY: as in `copy`.
        unsafe { ptr::copy_nonoverlapping(src.as_ptr(), dst.as_mut_ptr().add(start), n) };
    } else {
        for (d, s) in dst[start..].iter_mut().rev().zip(src.iter().rev()) {
            d.clone_from(s);
        }
    }
    start
}

/// Copy `slice[src]` to `slice[dest..]` within one slice. Overlapping
/// ranges are handled by copying forward when moving left and backward
/// when moving right.
///
/// # Panics
///
/// Panics if either range is out of bounds.
pub fn copy_within<T: TypeTraits + Clone>(slice: &mut [T], src: Range<usize>, dest: usize) {
    assert!(
        src.start <= src.end && src.end <= slice.len(),
        "source range {}..{} out of bounds for length {}",
        src.start,
        src.end,
        slice.len()
    );
    let n = src.end - src.start;
    assert!(
        dest <= slice.len() - n,
        "destination {dest} cannot hold {n} values in length {}",
        slice.len()
    );
    if n == 0 || dest == src.start {
        return;
    }
    if traits_of::<T>().trivial_assignment {
        let base = slice.as_mut_ptr();
        // SAFETY: both ranges are in bounds; `ptr::copy` handles overlap.
        unsafe { ptr::copy(base.add(src.start), base.add(dest), n) };
        return;
    }
    if dest < src.start {
        for i in 0..n {
            clone_between(slice, src.start + i, dest + i);
        }
    } else {
        for i in (0..n).rev() {
            clone_between(slice, src.start + i, dest + i);
        }
    }
}

fn clone_between<T: Clone>(slice: &mut [T], from: usize, to: usize) {
    if from < to {
        let (head, tail) = slice.split_at_mut(to);
        tail[0].clone_from(&head[from]);
    } else {
        let (head, tail) = slice.split_at_mut(from);
        head[to].clone_from(&tail[0]);
    }
}

/// Overwrite every element of `dst` with a clone of `value`.
pub fn fill<T: Clone>(dst: &mut [T], value: &T) {
    for slot in dst {
        slot.clone_from(value);
    }
}

/// Overwrite the first `n` elements of `dst`; returns `n`.
///
/// # Panics
///
/// Panics if `n > dst.len()`.
pub fn fill_n<T: Clone>(dst: &mut [T], n: usize, value: &T) -> usize {
    fill(&mut dst[..n], value);
    n
}

/// The larger of `a` and `b`; `a` when they are equivalent.
pub fn max<'a, T: PartialOrd>(a: &'a T, b: &'a T) -> &'a T {
    max_by(a, b, |x, y| x < y)
}

/// The larger of `a` and `b` under the strict ordering `less`.
pub fn max_by<'a, T, F>(a: &'a T, b: &'a T, mut less: F) -> &'a T
where
    F: FnMut(&T, &T) -> bool,
{
    if less(a, b) {
        b
    } else {
        a
    }
}

/// The smaller of `a` and `b`; `b` when they are equivalent.
pub fn min<'a, T: PartialOrd>(a: &'a T, b: &'a T) -> &'a T {
    min_by(a, b, |x, y| x < y)
}

/// The smaller of `a` and `b` under the strict ordering `less`.
pub fn min_by<'a, T, F>(a: &'a T, b: &'a T, mut less: F) -> &'a T
where
    F: FnMut(&T, &T) -> bool,
{
    if less(a, b) {
        a
    } else {
        b
    }
}

/// Greatest common divisor. Always non-negative; `gcd(x, 0) == |x|` and
/// `gcd(0, 0) == 0`.
pub fn gcd(x: i64, y: i64) -> u64 {
    let (mut a, mut b) = (x.unsigned_abs(), y.unsigned_abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
