//! Bulk construction into raw slots.
//!
//! Each function constructs a prefix of the destination and returns it as
//! an initialized slice; the slice's length marks one past the last
//! constructed slot. Construction is all-or-nothing: if building any slot
//! fails, whether through an `Err` from a producer or a panic from `clone`,
//! every slot already built by that call is dropped before the failure
//! propagates, and the destination is raw again.
//!
//! POD types skip per-element construction and are copied bitwise.

#![allow(unsafe_code)]

use std::convert::Infallible;
use std::marker::PhantomData;
use std::mem::{self, MaybeUninit};
use std::ptr;
use std::slice;

use vessel_core::type_traits::traits_of;
use vessel_core::TypeTraits;

/// Tracks the constructed prefix of a destination and drops it unless
/// [`finish`](PartialInit::finish) is reached.
struct PartialInit<'a, T> {
    base: *mut T,
    cap: usize,
    init: usize,
    _slots: PhantomData<&'a mut [MaybeUninit<T>]>,
}

impl<'a, T> PartialInit<'a, T> {
    fn new(slots: &'a mut [MaybeUninit<T>]) -> Self {
        Self {
            base: slots.as_mut_ptr().cast(),
            cap: slots.len(),
            init: 0,
            _slots: PhantomData,
        }
    }

    fn push(&mut self, value: T) {
        assert!(self.init < self.cap, "destination range is full");
        // SAFETY: `init < cap`, so the slot is inside the borrowed range and
        // has not been constructed yet.
        unsafe { self.base.add(self.init).write(value) };
        self.init += 1;
    }

    fn finish(self) -> &'a mut [T] {
        let (base, init) = (self.base, self.init);
        mem::forget(self);
        // SAFETY: the first `init` slots were constructed by `push`, and the
        // borrow of the destination lasts for `'a`.
        unsafe { slice::from_raw_parts_mut(base, init) }
    }
}

impl<T> Drop for PartialInit<'_, T> {
    fn drop(&mut self) {
        // SAFETY: exactly the first `init` slots are constructed.
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.base, self.init)) }
    }
}

/// Bitwise-copy `count` duplicates of `*value` into `dst`.
///
/// # Safety
///
/// `T` must be POD and `dst.len() >= count`.
unsafe fn pod_fill<'a, T>(dst: &'a mut [MaybeUninit<T>], count: usize, value: &T) -> &'a mut [T] {
    let base = dst.as_mut_ptr().cast::<T>();
    for i in 0..count {
        // SAFETY: `i < count <= dst.len()`; a bitwise read of a POD value
        // is an independent copy.
        unsafe { base.add(i).write(ptr::read(value)) };
    }
    // SAFETY: the first `count` slots were just written.
    unsafe { slice::from_raw_parts_mut(base, count) }
}

/// Construct `dst[..src.len()]` as clones of `src`.
///
/// # Panics
///
/// Panics if `dst` is shorter than `src`. A panicking `clone` propagates
/// after the already-built clones are dropped.
pub fn uninitialized_copy<'a, T>(src: &[T], dst: &'a mut [MaybeUninit<T>]) -> &'a mut [T]
where
    T: TypeTraits + Clone,
{
    assert!(
        dst.len() >= src.len(),
        "destination of {} slots is too short for {} values",
        dst.len(),
        src.len()
    );
    let dst = &mut dst[..src.len()];
    if traits_of::<T>().is_pod {
        let base = dst.as_mut_ptr().cast::<T>();
        // SAFETY: POD values may be duplicated bitwise; `src` and `dst` are
        // disjoint borrows of equal length.
        unsafe {
            ptr::copy_nonoverlapping(src.as_ptr(), base, src.len());
            return slice::from_raw_parts_mut(base, src.len());
        }
    }
    let Ok(out) = try_uninitialized_fill_with(dst, |i| Ok::<T, Infallible>(src[i].clone()));
    out
}

/// Construct every slot of `dst` as a clone of `value`.
pub fn uninitialized_fill<'a, T>(dst: &'a mut [MaybeUninit<T>], value: &T) -> &'a mut [T]
where
    T: TypeTraits + Clone,
{
    let n = dst.len();
    uninitialized_fill_n(dst, n, value)
}

/// Construct the first `n` slots of `dst` as clones of `value`.
///
/// # Panics
///
/// Panics if `n > dst.len()`.
pub fn uninitialized_fill_n<'a, T>(dst: &'a mut [MaybeUninit<T>], n: usize, value: &T) -> &'a mut [T]
where
    T: TypeTraits + Clone,
{
    assert!(
        n <= dst.len(),
        "cannot fill {n} values into {} slots",
        dst.len()
    );
    if traits_of::<T>().is_pod {
        // SAFETY: `T` is POD and `n <= dst.len()`.
        return unsafe { pod_fill(dst, n, value) };
    }
    let Ok(out) = try_uninitialized_fill_with(&mut dst[..n], |_| Ok::<T, Infallible>(value.clone()));
    out
}

/// Construct every slot of `dst` from `make(index)`.
///
/// On the first `Err`, the slots built so far are dropped and the error is
/// returned.
pub fn try_uninitialized_fill_with<'a, T, E, F>(
    dst: &'a mut [MaybeUninit<T>],
    mut make: F,
) -> Result<&'a mut [T], E>
where
    F: FnMut(usize) -> Result<T, E>,
{
    let n = dst.len();
    let mut guard = PartialInit::new(dst);
    for i in 0..n {
        guard.push(make(i)?);
    }
    Ok(guard.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::destroy_range;
    use std::cell::Cell;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::rc::Rc;

    /// Clone panics once the shared budget runs out; live instances are
    /// counted.
    struct Fragile {
        budget: Rc<Cell<u32>>,
        live: Rc<Cell<i32>>,
    }

    impl Fragile {
        fn new(budget: u32) -> Self {
            let live = Rc::new(Cell::new(1));
            Self {
                budget: Rc::new(Cell::new(budget)),
                live,
            }
        }
    }

    impl Clone for Fragile {
        fn clone(&self) -> Self {
            if self.budget.get() == 0 {
                panic!("clone budget exhausted");
            }
            self.budget.set(self.budget.get() - 1);
            self.live.set(self.live.get() + 1);
            Self {
                budget: self.budget.clone(),
                live: self.live.clone(),
            }
        }
    }

    impl Drop for Fragile {
        fn drop(&mut self) {
            self.live.set(self.live.get() - 1);
        }
    }

    unsafe impl TypeTraits for Fragile {}

    fn raw<T>(n: usize) -> Vec<MaybeUninit<T>> {
        (0..n).map(|_| MaybeUninit::uninit()).collect()
    }

    #[test]
    fn pod_copy_is_bitwise() {
        let src = [1u32, 2, 3];
        let mut dst = raw::<u32>(5);
        let out = uninitialized_copy(&src, &mut dst);
        assert_eq!(out, &[1, 2, 3]);
    }

    #[test]
    fn non_pod_copy_clones() {
        let src = vec![String::from("a"), String::from("b")];
        let mut dst = raw::<String>(2);
        let out = uninitialized_copy(&src, &mut dst);
        assert_eq!(out, &["a", "b"]);
        unsafe { destroy_range(&mut dst) };
    }

    #[test]
    fn fill_and_fill_n() {
        let mut dst = raw::<u16>(4);
        assert_eq!(uninitialized_fill(&mut dst, &7), &[7, 7, 7, 7]);

        let mut dst = raw::<String>(4);
        let out = uninitialized_fill_n(&mut dst, 2, &String::from("x"));
        assert_eq!(out.len(), 2);
        unsafe { destroy_range(&mut dst[..2]) };
    }

    #[test]
    fn fill_n_of_zero_builds_nothing() {
        let mut dst = raw::<String>(3);
        assert!(uninitialized_fill_n(&mut dst, 0, &String::new()).is_empty());
    }

    #[test]
    fn panicking_clone_rolls_back() {
        let proto = Fragile::new(2);
        let live = proto.live.clone();
        let mut dst = raw::<Fragile>(5);
        let result = catch_unwind(AssertUnwindSafe(|| {
            uninitialized_fill(&mut dst, &proto);
        }));
        assert!(result.is_err());
        assert_eq!(live.get(), 1, "only the prototype survives");
    }

    #[test]
    fn producer_error_rolls_back() {
        let proto = Fragile::new(u32::MAX);
        let live = proto.live.clone();
        let mut dst = raw::<Fragile>(4);
        let result = try_uninitialized_fill_with(&mut dst, |i| {
            if i == 3 {
                Err("fourth slot")
            } else {
                Ok(proto.clone())
            }
        });
        assert_eq!(result.err(), Some("fourth slot"));
        assert_eq!(live.get(), 1);
    }

    #[test]
    #[should_panic(expected = "too short")]
    fn copy_into_short_destination_panics() {
        let mut dst = raw::<u8>(1);
        uninitialized_copy(&[1u8, 2], &mut dst);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn failure_at_k_leaves_no_survivors(n in 1usize..24, k in 0u32..24) {
                let proto = Fragile::new(k);
                let live = proto.live.clone();
                let mut dst = raw::<Fragile>(n);
                let outcome = catch_unwind(AssertUnwindSafe(|| {
                    let built = uninitialized_fill(&mut dst, &proto).len();
                    unsafe { destroy_range(&mut dst[..built]) };
                }));
                prop_assert_eq!(outcome.is_err(), (k as usize) < n);
                prop_assert_eq!(live.get(), 1);
            }

            #[test]
            fn copy_matches_source(src in proptest::collection::vec(any::<i64>(), 0..64)) {
                let mut dst = raw::<i64>(src.len());
                let out = uninitialized_copy(&src, &mut dst);
                prop_assert_eq!(&out[..], &src[..]);
            }
        }
    }
}
