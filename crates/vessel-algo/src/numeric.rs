//! Numeric folds.

use std::ops::AddAssign;

use vessel_core::iter::Cursor;

/// Add every element of `[first, last)` onto `init` with `+=`.
///
/// The accumulator only needs `AddAssign<&Value>`; it may differ from the
/// element type.
pub fn accumulate<C, T>(mut first: C, last: C, mut init: T) -> T
where
    C: Cursor,
    T: for<'v> AddAssign<&'v C::Value>,
{
    while first != last {
        init += first.get();
        first.step();
    }
    init
}

/// Fold `[first, last)` into `init` with `init = op(init, element)`.
pub fn accumulate_with<C, T, F>(mut first: C, last: C, mut init: T, mut op: F) -> T
where
    C: Cursor,
    F: FnMut(T, &C::Value) -> T,
{
    while first != last {
        init = op(init, first.get());
        first.step();
    }
    init
}
