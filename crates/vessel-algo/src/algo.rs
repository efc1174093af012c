//! Searching and visiting algorithms.

use vessel_core::iter::{Cursor, ForwardCursor, SubsequenceSearch};

/// Call `f` on every element of `[first, last)` in order and hand `f`
/// back, so stateful closures can be inspected afterwards.
pub fn for_each<C, F>(mut first: C, last: C, mut f: F) -> F
where
    C: Cursor,
    F: FnMut(&C::Value),
{
    while first != last {
        f(first.get());
        first.step();
    }
    f
}

/// First position in `[first, last)` whose element equals `value`, or
/// `last`.
pub fn find<C, V>(first: C, last: C, value: &V) -> C
where
    C: Cursor,
    C::Value: PartialEq<V>,
    V: ?Sized,
{
    find_if(first, last, |x| x == value)
}

/// First position in `[first, last)` whose element satisfies `pred`, or
/// `last`.
pub fn find_if<C, P>(mut first: C, last: C, mut pred: P) -> C
where
    C: Cursor,
    P: FnMut(&C::Value) -> bool,
{
    while first != last && !pred(first.get()) {
        first.step();
    }
    first
}

/// First position in `[first, last)` whose element fails `pred`, or
/// `last`.
pub fn find_if_not<C, P>(first: C, last: C, mut pred: P) -> C
where
    C: Cursor,
    P: FnMut(&C::Value) -> bool,
{
    find_if(first, last, |x| !pred(x))
}

/// Start of the last occurrence of `[first2, last2)` in `[first1, last1)`.
///
/// Returns `last1` if the pattern is empty or does not occur. Forward
/// cursors are scanned front to back, remembering the latest hit.
/// Bidirectional and random-access cursors are scanned from the back and
/// stop at the first hit; random-access cursors additionally skip the
/// tail positions too short to hold a match.
pub fn find_end<C, P>(first1: C, last1: C, first2: P, last2: P) -> C
where
    C: ForwardCursor,
    C::Category: SubsequenceSearch<C>,
    P: ForwardCursor,
    C::Value: PartialEq<P::Value>,
{
    find_end_by(first1, last1, first2, last2, |a, b| a == b)
}

/// [`find_end`] with a custom equality predicate.
pub fn find_end_by<C, P, F>(first1: C, last1: C, first2: P, last2: P, eq: F) -> C
where
    C: ForwardCursor,
    C::Category: SubsequenceSearch<C>,
    P: ForwardCursor,
    F: FnMut(&C::Value, &P::Value) -> bool,
{
    <C::Category as SubsequenceSearch<C>>::find_end(first1, last1, first2, last2, eq)
}

/// First position in `[first1, last1)` whose element equals any element
/// of `[first2, last2)`, or `last1`.
pub fn find_first_of<C, P>(first1: C, last1: C, first2: P, last2: P) -> C
where
    C: Cursor,
    P: ForwardCursor,
    C::Value: PartialEq<P::Value>,
{
    find_first_of_by(first1, last1, first2, last2, |a, b| a == b)
}

/// [`find_first_of`] with a custom equality predicate.
pub fn find_first_of_by<C, P, F>(mut first1: C, last1: C, first2: P, last2: P, mut eq: F) -> C
where
    C: Cursor,
    P: ForwardCursor,
    F: FnMut(&C::Value, &P::Value) -> bool,
{
    while first1 != last1 {
        let mut probe = first2.clone();
        while probe != last2 {
            if eq(first1.get(), probe.get()) {
                return first1;
            }
            probe.step();
        }
        first1.step();
    }
    last1
}

#[cfg(test)]
mod tests {
    use super::*;
    use vessel_containers::{Array, List};
    use vessel_core::iter::{ForwardOnly, SliceCursor};

    fn slice_ends<T>(s: &[T]) -> (SliceCursor<'_, T>, SliceCursor<'_, T>) {
        (SliceCursor::begin(s), SliceCursor::end(s))
    }

    #[test]
    fn for_each_returns_the_visitor() {
        let a: Array<i32> = (1..=4).collect();
        let mut sum = 0;
        let visitor = for_each(a.begin(), a.end(), |x| sum += *x);
        drop(visitor);
        assert_eq!(sum, 10);

        let list: List<i32> = (1..=4).collect();
        let mut seen = Vec::new();
        let f = for_each(list.begin(), list.end(), |x| seen.push(*x));
        drop(f);
        assert_eq!(seen, [1, 2, 3, 4]);
    }

    #[test]
    fn find_family_on_a_list() {
        let list: List<i32> = [4, 8, 15, 16, 23, 42].into_iter().collect();
        let hit = find(list.begin(), list.end(), &15);
        assert_eq!(*hit.get(), 15);
        assert!(find(list.begin(), list.end(), &7) == list.end());

        let odd = find_if(list.begin(), list.end(), |x| x % 2 == 1);
        assert_eq!(*odd.get(), 15);
        let not_small = find_if_not(list.begin(), list.end(), |x| *x < 16);
        assert_eq!(*not_small.get(), 16);
    }

    #[test]
    fn find_with_borrowed_value() {
        let words = [String::from("a"), String::from("b")];
        let (first, last) = slice_ends(&words);
        assert_eq!(find(first, last, "b").index(), 1);
    }

    #[test]
    fn find_end_agrees_across_tiers() {
        let text = [1, 2, 3, 1, 2, 3, 1, 2];
        let pattern = [1, 2, 3];
        let (p1, p2) = slice_ends(&pattern);

        let (f, l) = slice_ends(&text);
        assert_eq!(find_end(f.clone(), l.clone(), p1.clone(), p2.clone()).index(), 3);

        let fwd = find_end(
            ForwardOnly::new(f),
            ForwardOnly::new(l),
            p1.clone(),
            p2.clone(),
        );
        assert_eq!(fwd.into_inner().index(), 3);

        let list: List<i32> = text.into_iter().collect();
        let hit = find_end(list.begin(), list.end(), p1, p2);
        let mut expected = list.begin();
        vessel_core::advance(&mut expected, 3);
        assert!(hit == expected);
    }

    #[test]
    fn find_end_without_match_or_pattern_returns_last() {
        let list: List<i32> = (0..5).collect();
        let empty: [i32; 0] = [];
        let (e1, e2) = slice_ends(&empty);
        assert!(find_end(list.begin(), list.end(), e1, e2) == list.end());
        let (m1, m2) = slice_ends(&[9, 9]);
        assert!(find_end(list.begin(), list.end(), m1, m2) == list.end());
    }

    #[test]
    fn find_end_by_custom_predicate() {
        let text = ["x", "AB", "y", "ab"];
        let pattern = [String::from("ab")];
        let (f, l) = slice_ends(&text);
        let (p1, p2) = slice_ends(&pattern);
        let hit = find_end_by(f.clone(), l.clone(), p1.clone(), p2.clone(), |a, b| {
            a.eq_ignore_ascii_case(b)
        });
        assert_eq!(hit.index(), 3);
        let exact_upper = find_end_by(f, l, p1, p2, |a, b| *a == b.to_uppercase());
        assert_eq!(exact_upper.index(), 1);
    }

    #[test]
    fn find_first_of_reports_position_in_first_range() {
        let text = [5, 3, 9, 1];
        let set = [1, 9];
        let (f, l) = slice_ends(&text);
        let (s1, s2) = slice_ends(&set);
        assert_eq!(find_first_of(f.clone(), l.clone(), s1, s2).index(), 2);

        let none = [7];
        let (n1, n2) = slice_ends(&none);
        assert!(find_first_of(f.clone(), l.clone(), n1, n2) == l);

        let (s1, s2) = slice_ends(&set);
        let shifted = find_first_of_by(f, l, s1, s2, |a, b| a + 8 == *b);
        assert_eq!(shifted.index(), 3);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn brute_find_end(text: &[u8], pat: &[u8]) -> usize {
            if pat.is_empty() || pat.len() > text.len() {
                return text.len();
            }
            (0..=text.len() - pat.len())
                .rev()
                .find(|&i| &text[i..i + pat.len()] == pat)
                .unwrap_or(text.len())
        }

        proptest! {
            #[test]
            fn find_end_on_list_matches_brute_force(
                text in proptest::collection::vec(0u8..3, 0..24),
                pat in proptest::collection::vec(0u8..3, 0..4),
            ) {
                let list: List<u8> = text.iter().copied().collect();
                let (p1, p2) = slice_ends(&pat);
                let hit = find_end(list.begin(), list.end(), p1, p2);
                let mut expected = list.begin();
                vessel_core::advance(&mut expected, brute_find_end(&text, &pat) as isize);
                prop_assert!(hit == expected);
            }

            #[test]
            fn find_first_of_matches_iterator(
                text in proptest::collection::vec(0u8..8, 0..16),
                set in proptest::collection::vec(0u8..8, 0..4),
            ) {
                let (f, l) = slice_ends(&text);
                let (s1, s2) = slice_ends(&set);
                let expected = text.iter().position(|x| set.contains(x)).unwrap_or(text.len());
                prop_assert_eq!(find_first_of(f, l, s1, s2).index(), expected);
            }
        }
    }
}
