//! Capacity growth policies.
//!
//! Two formulas, used for different requests:
//!
//! | Request | New capacity |
//! |---------|--------------|
//! | one element, no slack | `max(1, 2 * len)` |
//! | `n` elements, too little slack | `len + max(len, n)` |
//!
//! Starting from empty, repeated single appends give capacities
//! 1, 2, 4, 8, ... . Both return `None` on arithmetic overflow.

/// Capacity after a single-element append or insert into a full array.
pub fn grow_one(len: usize) -> Option<usize> {
    len.checked_mul(2).map(|doubled| doubled.max(1))
}

/// Capacity after inserting `n` elements into an array without room.
pub fn grow_n(len: usize, n: usize) -> Option<usize> {
    len.checked_add(len.max(n))
}
