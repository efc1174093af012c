//! Constructing and destroying values in raw slots.
//!
//! These functions never allocate; they operate on slots handed out by a
//! [`StorageBlock`](crate::StorageBlock).

#![allow(unsafe_code)]

use std::mem::MaybeUninit;
use std::ptr;

use vessel_core::type_traits::traits_of;
use vessel_core::TypeTraits;

/// Move `value` into `slot`. Previous slot contents are overwritten
/// without being dropped.
pub fn construct<T>(slot: &mut MaybeUninit<T>, value: T) -> &mut T {
    slot.write(value)
}

/// Write a clone of `value` into `slot`.
pub fn construct_from<'a, T: Clone>(slot: &'a mut MaybeUninit<T>, value: &T) -> &'a mut T {
    slot.write(value.clone())
}

/// Drop the value in `slot`, leaving it raw.
///
/// # Safety
///
/// `slot` must hold an initialized value, and must not be read as `T`
/// afterwards until it is constructed again.
pub unsafe fn destroy<T>(slot: &mut MaybeUninit<T>) {
    // SAFETY: forwarded caller contract.
    unsafe { slot.assume_init_drop() }
}

/// Drop every value in `slots`, front to back.
///
/// A no-op for types whose record claims a trivial destructor and for
/// character-like types.
///
/// # Safety
///
/// Every slot must hold an initialized value; afterwards all are raw.
pub unsafe fn destroy_range<T: TypeTraits>(slots: &mut [MaybeUninit<T>]) {
    let traits = traits_of::<T>();
    if traits.trivial_destructor || traits.char_like {
        return;
    }
    // SAFETY: every slot is initialized (caller contract), and
    // `MaybeUninit<T>` has the layout of `T`.
    unsafe { ptr::drop_in_place(slots as *mut [MaybeUninit<T>] as *mut [T]) }
}
