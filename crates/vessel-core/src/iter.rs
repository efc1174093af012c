//! Category-tagged cursor protocol.
//!
//! A [`Cursor`] is a position in a sequence: it can be dereferenced,
//! compared for equality and stepped forward. Stronger capabilities are
//! layered as sub-traits:
//!
//! ```text
//! Cursor (input) ⊂ ForwardCursor ⊂ BidirectionalCursor ⊂ RandomAccessCursor
//! ```
//!
//! Every cursor type also declares a zero-size capability tag through
//! [`Cursor::Category`]. Generic algorithms never inspect a cursor at
//! runtime; they call through the tag's [`Dispatch`] impl, which is chosen
//! per monomorphized call site. Each tag's impl is bounded by the cursor
//! trait of its level, so a cursor that declares a tag it cannot honour
//! fails to compile.
//!
//! ```
//! use vessel_core::iter::{distance, ForwardOnly, SliceCursor};
//!
//! let data = [1, 2, 3, 4, 5];
//! let first = SliceCursor::begin(&data);
//! let last = SliceCursor::end(&data);
//!
//! // Random-access: O(1) subtraction.
//! assert_eq!(distance(&first, &last), 5);
//!
//! // Same positions viewed as forward-only: linear walk, same answer.
//! assert_eq!(distance(&ForwardOnly::new(first), &ForwardOnly::new(last)), 5);
//! ```

use std::fmt;

// ── Capability tags ─────────────────────────────────────────────────

/// A capability tag. `LEVEL` orders the tags: a tag supports every
/// operation required at all lower levels.
pub trait Category: Copy + Default + fmt::Debug + 'static {
    /// Position in the refinement order (input = 0).
    const LEVEL: u8;
    /// Human-readable tag name.
    const NAME: &'static str;
}

/// Single-pass read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct InputTag;

/// Multi-pass read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ForwardTag;

/// Multi-pass read plus reverse step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BidirectionalTag;

/// Bidirectional plus O(1) offset and subtraction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RandomAccessTag;

impl Category for InputTag {
    const LEVEL: u8 = 0;
    const NAME: &'static str = "input";
}

impl Category for ForwardTag {
    const LEVEL: u8 = 1;
    const NAME: &'static str = "forward";
}

impl Category for BidirectionalTag {
    const LEVEL: u8 = 2;
    const NAME: &'static str = "bidirectional";
}

impl Category for RandomAccessTag {
    const LEVEL: u8 = 3;
    const NAME: &'static str = "random-access";
}

// ── Cursor traits ───────────────────────────────────────────────────

/// A position in a sequence (the input tier).
///
/// Dereferencing the end position is a contract violation; the cursors
/// in this workspace panic on it.
pub trait Cursor: Clone + PartialEq {
    /// The element type.
    type Value: ?Sized;
    /// The capability tag. Its [`Dispatch`] impl must exist for `Self`.
    type Category: Dispatch<Self>;

    /// The element at this position.
    fn get(&self) -> &Self::Value;

    /// Move to the next position (prefix increment).
    fn step(&mut self);

    /// Move to the next position and return the old one (postfix increment).
    fn post_step(&mut self) -> Self {
        let old = self.clone();
        self.step();
        old
    }
}

/// A cursor over a sequence that may be traversed more than once.
pub trait ForwardCursor: Cursor {}

/// A forward cursor that can also step backwards.
pub trait BidirectionalCursor: ForwardCursor {
    /// Move to the previous position (prefix decrement).
    fn step_back(&mut self);

    /// Move to the previous position and return the old one.
    fn post_step_back(&mut self) -> Self {
        let old = self.clone();
        self.step_back();
        old
    }
}

/// A bidirectional cursor with O(1) offset arithmetic.
pub trait RandomAccessCursor: BidirectionalCursor {
    /// Move by `n` positions (negative moves backwards).
    fn jump(&mut self, n: isize);

    /// Signed number of steps from `self` to `last`.
    fn distance_to(&self, last: &Self) -> isize;

    /// A copy of this cursor moved by `n` positions.
    fn offset(&self, n: isize) -> Self {
        let mut moved = self.clone();
        moved.jump(n);
        moved
    }
}

// ── Tag dispatch ────────────────────────────────────────────────────

/// Per-tier implementations of the operations whose cost depends on the
/// cursor category.
///
/// Callers go through the free functions ([`distance`], [`advance`]) or
/// the algorithms crate, never through this trait directly.
pub trait Dispatch<C: Cursor>: Category {
    /// Steps from `first` to `last`.
    fn distance(first: &C, last: &C) -> isize;

    /// Move `cursor` by `n` positions. Negative `n` requires a
    /// bidirectional cursor.
    fn advance(cursor: &mut C, n: isize);
}

/// Per-tier subsequence search.
///
/// Searching revisits positions, so only the multi-pass tags implement
/// this trait. Asking for it on an input-tier cursor fails to compile:
///
/// ```compile_fail
/// use vessel_core::iter::{Cursor, InputTag, SliceCursor, SubsequenceSearch};
///
/// #[derive(Clone, PartialEq)]
/// struct OnePass<'a>(SliceCursor<'a, u8>);
///
/// impl<'a> Cursor for OnePass<'a> {
///     type Value = u8;
///     type Category = InputTag;
///     fn get(&self) -> &u8 { self.0.get() }
///     fn step(&mut self) { self.0.step() }
/// }
///
/// let text = [1u8, 2];
/// let _ = <InputTag as SubsequenceSearch<OnePass<'_>>>::find_end(
///     OnePass(SliceCursor::begin(&text)),
///     OnePass(SliceCursor::end(&text)),
///     SliceCursor::begin(&text),
///     SliceCursor::end(&text),
///     |a: &u8, b: &u8| a == b,
/// );
/// ```
pub trait SubsequenceSearch<C: ForwardCursor>: Dispatch<C> {
    /// Start of the last occurrence of `[first2, last2)` inside
    /// `[first1, last1)`, or `last1` if there is none (or the pattern is
    /// empty).
    fn find_end<P, F>(first1: C, last1: C, first2: P, last2: P, eq: F) -> C
    where
        P: ForwardCursor,
        F: FnMut(&C::Value, &P::Value) -> bool;
}

impl<C: Cursor> Dispatch<C> for InputTag {
    fn distance(first: &C, last: &C) -> isize {
        linear_distance(first, last)
    }

    fn advance(cursor: &mut C, n: isize) {
        forward_advance(cursor, n);
    }
}

impl<C: ForwardCursor> Dispatch<C> for ForwardTag {
    fn distance(first: &C, last: &C) -> isize {
        linear_distance(first, last)
    }

    fn advance(cursor: &mut C, n: isize) {
        forward_advance(cursor, n);
    }
}

impl<C: ForwardCursor> SubsequenceSearch<C> for ForwardTag {
    fn find_end<P, F>(first1: C, last1: C, first2: P, last2: P, eq: F) -> C
    where
        P: ForwardCursor,
        F: FnMut(&C::Value, &P::Value) -> bool,
    {
        forward_find_end(first1, last1, first2, last2, eq)
    }
}

impl<C: BidirectionalCursor> Dispatch<C> for BidirectionalTag {
    fn distance(first: &C, last: &C) -> isize {
        linear_distance(first, last)
    }

    fn advance(cursor: &mut C, n: isize) {
        if n >= 0 {
            forward_advance(cursor, n);
        } else {
            for _ in 0..n.unsigned_abs() {
                cursor.step_back();
            }
        }
    }
}

impl<C: BidirectionalCursor> SubsequenceSearch<C> for BidirectionalTag {
    fn find_end<P, F>(first1: C, last1: C, first2: P, last2: P, eq: F) -> C
    where
        P: ForwardCursor,
        F: FnMut(&C::Value, &P::Value) -> bool,
    {
        reverse_find_end(first1, last1.clone(), last1, first2, last2, eq)
    }
}

impl<C: RandomAccessCursor> Dispatch<C> for RandomAccessTag {
    fn distance(first: &C, last: &C) -> isize {
        first.distance_to(last)
    }

    fn advance(cursor: &mut C, n: isize) {
        cursor.jump(n);
    }
}

impl<C: RandomAccessCursor> SubsequenceSearch<C> for RandomAccessTag {
    fn find_end<P, F>(first1: C, last1: C, first2: P, last2: P, eq: F) -> C
    where
        P: ForwardCursor,
        F: FnMut(&C::Value, &P::Value) -> bool,
    {
        // A match cannot start in the last `m - 1` positions, so the
        // reverse scan begins at `last1 - m`.
        let m = distance(&first2, &last2);
        if m == 0 || m > first1.distance_to(&last1) {
            return last1;
        }
        let start = last1.offset(-m);
        reverse_find_end(first1, start.offset(1), last1, first2, last2, eq)
    }
}

fn linear_distance<C: Cursor>(first: &C, last: &C) -> isize {
    let mut cur = first.clone();
    let mut n = 0isize;
    while cur != *last {
        cur.step();
        n += 1;
    }
    n
}

fn forward_advance<C: Cursor>(cursor: &mut C, n: isize) {
    assert!(
        n >= 0,
        "cannot advance a {} cursor backwards",
        <C::Category as Category>::NAME
    );
    for _ in 0..n {
        cursor.step();
    }
}

/// Whether `[first2, last2)` matches the text starting at `start`.
fn matches_at<C, P, F>(start: &C, last1: &C, first2: &P, last2: &P, eq: &mut F) -> bool
where
    C: Cursor,
    P: Cursor,
    F: FnMut(&C::Value, &P::Value) -> bool,
{
    let mut it1 = start.clone();
    let mut it2 = first2.clone();
    loop {
        if it2 == *last2 {
            return true;
        }
        if it1 == *last1 || !eq(it1.get(), it2.get()) {
            return false;
        }
        it1.step();
        it2.step();
    }
}

/// Scan every start position front to back, remembering the last match.
fn forward_find_end<C, P, F>(first1: C, last1: C, first2: P, last2: P, mut eq: F) -> C
where
    C: ForwardCursor,
    P: ForwardCursor,
    F: FnMut(&C::Value, &P::Value) -> bool,
{
    if first2 == last2 {
        return last1;
    }
    let mut result = last1.clone();
    let mut start = first1;
    while start != last1 {
        if matches_at(&start, &last1, &first2, &last2, &mut eq) {
            result = start.clone();
        }
        start.step();
    }
    result
}

/// Scan start positions back to front from `scan_end` (exclusive) and
/// stop at the first match.
fn reverse_find_end<C, P, F>(
    first1: C,
    scan_end: C,
    last1: C,
    first2: P,
    last2: P,
    mut eq: F,
) -> C
where
    C: BidirectionalCursor,
    P: ForwardCursor,
    F: FnMut(&C::Value, &P::Value) -> bool,
{
    if first2 == last2 {
        return last1;
    }
    let mut start = scan_end;
    while start != first1 {
        start.step_back();
        if matches_at(&start, &last1, &first2, &last2, &mut eq) {
            return start;
        }
    }
    last1
}

// ── Free functions ──────────────────────────────────────────────────

/// Number of steps from `first` to `last`, using the cheapest method the
/// cursor's category allows.
pub fn distance<C: Cursor>(first: &C, last: &C) -> isize {
    <C::Category as Dispatch<C>>::distance(first, last)
}

/// Move `cursor` by `n` positions.
///
/// # Panics
///
/// Panics if `n` is negative and the cursor is not bidirectional.
pub fn advance<C: Cursor>(cursor: &mut C, n: isize) {
    <C::Category as Dispatch<C>>::advance(cursor, n);
}

/// Name of the category declared by `C`.
pub fn category_name<C: Cursor>() -> &'static str {
    <C::Category as Category>::NAME
}

/// Refinement level of the category declared by `C`.
pub fn category_level<C: Cursor>() -> u8 {
    <C::Category as Category>::LEVEL
}

// ── Slice cursor ────────────────────────────────────────────────────

/// Random-access cursor over a borrowed slice.
///
/// This is the cursor type of `Array`. Two cursors are equal when they
/// point into the same slice at the same index.
pub struct SliceCursor<'a, T> {
    slice: &'a [T],
    pos: usize,
}

impl<'a, T> SliceCursor<'a, T> {
    /// A cursor at index `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos > slice.len()`.
    pub fn new(slice: &'a [T], pos: usize) -> Self {
        assert!(
            pos <= slice.len(),
            "cursor position {pos} out of range for length {}",
            slice.len()
        );
        Self { slice, pos }
    }

    /// A cursor at the first element.
    pub fn begin(slice: &'a [T]) -> Self {
        Self { slice, pos: 0 }
    }

    /// A cursor one past the last element.
    pub fn end(slice: &'a [T]) -> Self {
        Self {
            slice,
            pos: slice.len(),
        }
    }

    /// The index this cursor points at.
    pub fn index(&self) -> usize {
        self.pos
    }

    /// Whether this cursor is one past the last element.
    pub fn is_end(&self) -> bool {
        self.pos == self.slice.len()
    }
}

impl<T> Clone for SliceCursor<'_, T> {
    fn clone(&self) -> Self {
        Self {
            slice: self.slice,
            pos: self.pos,
        }
    }
}

impl<T> PartialEq for SliceCursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.slice, other.slice) && self.pos == other.pos
    }
}

impl<T> Eq for SliceCursor<'_, T> {}

impl<T> fmt::Debug for SliceCursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliceCursor")
            .field("pos", &self.pos)
            .field("len", &self.slice.len())
            .finish()
    }
}

impl<T> Cursor for SliceCursor<'_, T> {
    type Value = T;
    type Category = RandomAccessTag;

    fn get(&self) -> &T {
        match self.slice.get(self.pos) {
            Some(value) => value,
            None => panic!("dereferenced the end position of a slice cursor"),
        }
    }

    fn step(&mut self) {
        debug_assert!(self.pos < self.slice.len(), "stepped past the end");
        self.pos += 1;
    }
}

impl<T> ForwardCursor for SliceCursor<'_, T> {}

impl<T> BidirectionalCursor for SliceCursor<'_, T> {
    fn step_back(&mut self) {
        assert!(self.pos > 0, "stepped before the beginning");
        self.pos -= 1;
    }
}

impl<T> RandomAccessCursor for SliceCursor<'_, T> {
    fn jump(&mut self, n: isize) {
        let target = self.pos as isize + n;
        assert!(
            target >= 0 && target as usize <= self.slice.len(),
            "jump by {n} from {} leaves a slice of length {}",
            self.pos,
            self.slice.len()
        );
        self.pos = target as usize;
    }

    fn distance_to(&self, last: &Self) -> isize {
        last.pos as isize - self.pos as isize
    }
}

// ── Forward-only adapter ────────────────────────────────────────────

/// Views any forward-or-better cursor as a plain forward cursor.
///
/// Algorithms called through this adapter take their forward-tier path,
/// which makes it useful for comparing tiers against each other.
#[derive(Clone, Debug, PartialEq)]
pub struct ForwardOnly<C>(C);

impl<C: ForwardCursor> ForwardOnly<C> {
    /// Wrap `cursor`.
    pub fn new(cursor: C) -> Self {
        Self(cursor)
    }

    /// Unwrap the underlying cursor.
    pub fn into_inner(self) -> C {
        self.0
    }
}

impl<C: ForwardCursor> Cursor for ForwardOnly<C> {
    type Value = C::Value;
    type Category = ForwardTag;

    fn get(&self) -> &C::Value {
        self.0.get()
    }

    fn step(&mut self) {
        self.0.step();
    }
}

impl<C: ForwardCursor> ForwardCursor for ForwardOnly<C> {}
