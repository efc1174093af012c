//! Circular doubly-linked list.
//!
//! The list owns a [`NodeSlab`]; slot 0 is a sentinel that marks the end
//! position and closes the ring. An empty list is the sentinel linked to
//! itself. Positions are [`NodeId`]s: an id stays valid until the node it
//! names is erased, regardless of other inserts and erases.
//!
//! ```text
//!   ┌──────────────────────────────────────────┐
//!   ▼                                          │
//! [0: sentinel] ⇄ [3: "z"] ⇄ [1: "a"] ⇄ [2: "b"]
//! ```

use std::fmt;
use std::iter::FusedIterator;

use vessel_alloc::{MallocAlloc, RawAllocator};
use vessel_core::iter::{distance, BidirectionalCursor, BidirectionalTag, Cursor, ForwardCursor};
use vessel_core::NodeId;

use crate::slab::NodeSlab;

/// A circular doubly-linked list with O(1) insert and erase at any
/// position.
///
/// ```
/// use vessel_containers::List;
///
/// let mut list = List::new();
/// list.push_back("a");
/// list.push_back("b");
/// list.push_front("z");
/// assert_eq!(list.iter().copied().collect::<Vec<_>>(), ["z", "a", "b"]);
///
/// list.erase(list.front_node());
/// assert_eq!(list.iter().copied().collect::<Vec<_>>(), ["a", "b"]);
/// ```
pub struct List<T, A: RawAllocator = MallocAlloc> {
    slab: NodeSlab<T, A>,
}

impl<T> List<T> {
    /// An empty list on the global heap.
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

impl<T, A: RawAllocator> List<T, A> {
    /// An empty list drawing nodes from `alloc`.
    pub fn new_in(alloc: A) -> Self {
        Self {
            slab: NodeSlab::new_in(alloc),
        }
    }

    /// `n` clones of `value`, drawing from `alloc`.
    pub fn from_elem_in(n: usize, value: &T, alloc: A) -> Self
    where
        T: Clone,
    {
        let mut list = Self::new_in(alloc);
        for _ in 0..n {
            list.push_back(value.clone());
        }
        list
    }

    /// `n` default values, drawing from `alloc`.
    pub fn with_len_in(n: usize, alloc: A) -> Self
    where
        T: Default,
    {
        let mut list = Self::new_in(alloc);
        for _ in 0..n {
            list.push_back(T::default());
        }
        list
    }

    /// The allocator backing the node slab.
    pub fn allocator(&self) -> &A {
        self.slab.allocator()
    }

    /// Cursor at the first element.
    pub fn begin(&self) -> ListCursor<'_, T, A> {
        ListCursor {
            list: self,
            id: self.front_node(),
        }
    }

    /// Cursor at the sentinel (one past the last element).
    pub fn end(&self) -> ListCursor<'_, T, A> {
        ListCursor {
            list: self,
            id: NodeId::SENTINEL,
        }
    }

    /// Id of the first node, or the sentinel when empty.
    pub fn front_node(&self) -> NodeId {
        self.slab.node(NodeId::SENTINEL).next
    }

    /// Id of the last node, or the sentinel when empty.
    pub fn back_node(&self) -> NodeId {
        self.slab.node(NodeId::SENTINEL).prev
    }

    /// The sentinel id, i.e. the end position.
    pub fn end_node(&self) -> NodeId {
        NodeId::SENTINEL
    }

    /// Successor of `id` in the ring. The successor of the last node is
    /// the sentinel, and that of the sentinel is the first node.
    pub fn next_node(&self, id: NodeId) -> NodeId {
        self.check_position(id);
        self.slab.node(id).next
    }

    /// Predecessor of `id` in the ring.
    pub fn prev_node(&self, id: NodeId) -> NodeId {
        self.check_position(id);
        self.slab.node(id).prev
    }

    /// Whether the list holds no elements.
    pub fn is_empty(&self) -> bool {
        self.front_node().is_sentinel()
    }

    /// Number of elements. Walks the ring: O(n).
    pub fn len(&self) -> usize {
        distance(&self.begin(), &self.end()) as usize
    }

    /// The first element.
    pub fn front(&self) -> Option<&T> {
        self.slab.node(self.front_node()).value.as_ref()
    }

    /// The first element, mutably.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        let id = self.front_node();
        self.slab.node_mut(id).value.as_mut()
    }

    /// The last element.
    pub fn back(&self) -> Option<&T> {
        self.slab.node(self.back_node()).value.as_ref()
    }

    /// The last element, mutably.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        let id = self.back_node();
        self.slab.node_mut(id).value.as_mut()
    }

    /// The element at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is the sentinel or an erased node.
    pub fn get(&self, id: NodeId) -> &T {
        assert!(!id.is_sentinel(), "dereferenced the end position of a list");
        match self.slab.node(id).value.as_ref() {
            Some(value) => value,
            None => panic!("node {id} has been erased"),
        }
    }

    /// The element at `id`, mutably.
    pub fn get_mut(&mut self, id: NodeId) -> &mut T {
        assert!(!id.is_sentinel(), "dereferenced the end position of a list");
        match self.slab.node_mut(id).value.as_mut() {
            Some(value) => value,
            None => panic!("node {id} has been erased"),
        }
    }

    /// Insert `value` before `pos` and return the new node's id.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is an erased node.
    pub fn insert(&mut self, pos: NodeId, value: T) -> NodeId {
        self.check_position(pos);
        let id = self.slab.create_node(value);
        let prev = self.slab.node(pos).prev;
        {
            let node = self.slab.node_mut(id);
            node.prev = prev;
            node.next = pos;
        }
        self.slab.node_mut(prev).next = id;
        self.slab.node_mut(pos).prev = id;
        id
    }

    /// Insert at the front.
    pub fn push_front(&mut self, value: T) -> NodeId {
        let front = self.front_node();
        self.insert(front, value)
    }

    /// Insert at the back.
    pub fn push_back(&mut self, value: T) -> NodeId {
        self.insert(NodeId::SENTINEL, value)
    }

    /// Remove the node at `pos` and return its successor. Erasing the
    /// sentinel does nothing and returns the sentinel.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is an erased node.
    pub fn erase(&mut self, pos: NodeId) -> NodeId {
        if pos.is_sentinel() {
            return pos;
        }
        let (next, value) = self.unlink(pos);
        drop(value);
        next
    }

    /// Remove and return the first element.
    pub fn pop_front(&mut self) -> Option<T> {
        let front = self.front_node();
        if front.is_sentinel() {
            return None;
        }
        Some(self.unlink(front).1)
    }

    /// Remove and return the last element.
    pub fn pop_back(&mut self) -> Option<T> {
        let back = self.back_node();
        if back.is_sentinel() {
            return None;
        }
        Some(self.unlink(back).1)
    }

    /// Drop every element. The node slab keeps its capacity.
    pub fn clear(&mut self) {
        self.slab.reset();
    }

    /// Front-to-back iterator over the elements.
    pub fn iter(&self) -> Iter<'_, T, A> {
        Iter {
            list: self,
            front: self.front_node(),
            back: self.back_node(),
            done: self.is_empty(),
        }
    }

    fn check_position(&self, id: NodeId) {
        let node = self.slab.node(id);
        assert!(
            id.is_sentinel() || node.value.is_some(),
            "node {id} has been erased"
        );
    }

    fn unlink(&mut self, id: NodeId) -> (NodeId, T) {
        self.check_position(id);
        let (prev, next) = {
            let node = self.slab.node(id);
            (node.prev, node.next)
        };
        self.slab.node_mut(prev).next = next;
        self.slab.node_mut(next).prev = prev;
        (next, self.slab.destroy_node(id))
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, A: RawAllocator> Clone for List<T, A> {
    fn clone(&self) -> Self {
        let mut list = Self::new_in(self.allocator().clone());
        for value in self {
            list.push_back(value.clone());
        }
        list
    }
}

impl<T: fmt::Debug, A: RawAllocator> fmt::Debug for List<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, A: RawAllocator, B: RawAllocator> PartialEq<List<T, B>> for List<T, A> {
    fn eq(&self, other: &List<T, B>) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<T: Eq, A: RawAllocator> Eq for List<T, A> {}

impl<T, A: RawAllocator> Extend<T> for List<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T, A: RawAllocator + Default> FromIterator<T> for List<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new_in(A::default());
        list.extend(iter);
        list
    }
}

impl<'a, T, A: RawAllocator> IntoIterator for &'a List<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, A>;

    fn into_iter(self) -> Iter<'a, T, A> {
        self.iter()
    }
}

/// Iterator returned by [`List::iter`].
pub struct Iter<'a, T, A: RawAllocator> {
    list: &'a List<T, A>,
    front: NodeId,
    back: NodeId,
    done: bool,
}

impl<'a, T, A: RawAllocator> Iterator for Iter<'a, T, A> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.done {
            return None;
        }
        let id = self.front;
        self.done = id == self.back;
        self.front = self.list.slab.node(id).next;
        Some(self.list.get(id))
    }
}

impl<'a, T, A: RawAllocator> DoubleEndedIterator for Iter<'a, T, A> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.done {
            return None;
        }
        let id = self.back;
        self.done = id == self.front;
        self.back = self.list.slab.node(id).prev;
        Some(self.list.get(id))
    }
}

impl<T, A: RawAllocator> FusedIterator for Iter<'_, T, A> {}

/// Bidirectional cursor into a [`List`].
///
/// Stepping past the last element lands on the sentinel (the end
/// position); stepping again wraps to the first element.
pub struct ListCursor<'a, T, A: RawAllocator = MallocAlloc> {
    list: &'a List<T, A>,
    id: NodeId,
}

impl<T, A: RawAllocator> ListCursor<'_, T, A> {
    /// The node this cursor points at.
    pub fn node(&self) -> NodeId {
        self.id
    }
}

impl<T, A: RawAllocator> Clone for ListCursor<'_, T, A> {
    fn clone(&self) -> Self {
        Self {
            list: self.list,
            id: self.id,
        }
    }
}

impl<T, A: RawAllocator> PartialEq for ListCursor<'_, T, A> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.list, other.list) && self.id == other.id
    }
}

impl<T, A: RawAllocator> Eq for ListCursor<'_, T, A> {}

impl<T, A: RawAllocator> fmt::Debug for ListCursor<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ListCursor").field(&self.id).finish()
    }
}

impl<T, A: RawAllocator> Cursor for ListCursor<'_, T, A> {
    type Value = T;
    type Category = BidirectionalTag;

    fn get(&self) -> &T {
        self.list.get(self.id)
    }

    fn step(&mut self) {
        self.id = self.list.next_node(self.id);
    }
}

impl<T, A: RawAllocator> ForwardCursor for ListCursor<'_, T, A> {}

impl<T, A: RawAllocator> BidirectionalCursor for ListCursor<'_, T, A> {
    fn step_back(&mut self) {
        self.id = self.list.prev_node(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vessel_core::iter::{advance, category_name};

    fn collect<T: Clone, A: RawAllocator>(list: &List<T, A>) -> Vec<T> {
        list.iter().cloned().collect()
    }

    /// Walk `next` from the sentinel and check `prev` mirrors it.
    fn assert_ring<T, A: RawAllocator>(list: &List<T, A>) {
        let mut id = NodeId::SENTINEL;
        let mut steps = 0;
        loop {
            let next = list.next_node(id);
            assert_eq!(list.prev_node(next), id, "prev does not mirror next");
            id = next;
            if id.is_sentinel() {
                break;
            }
            steps += 1;
        }
        assert_eq!(steps, list.len());
    }

    #[test]
    fn push_and_erase_scenario() {
        let mut list = List::new();
        list.push_back("a");
        list.push_back("b");
        list.push_front("z");
        assert_eq!(collect(&list), ["z", "a", "b"]);
        assert_ring(&list);

        let next = list.erase(list.front_node());
        assert_eq!(list.get(next), &"a");
        assert_eq!(collect(&list), ["a", "b"]);

        let next = list.erase(next);
        list.erase(next);
        assert!(list.is_empty());
        assert_eq!(list.begin(), list.end());
        assert_ring(&list);
    }

    #[test]
    fn empty_list_is_self_linked() {
        let list: List<i32> = List::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert_eq!(list.front_node(), list.end_node());
        assert_eq!(list.back_node(), list.end_node());
        assert_eq!(list.front(), None);
    }

    #[test]
    fn erase_sentinel_is_noop() {
        let mut list = List::from_elem(2, &1u8);
        assert_eq!(list.erase(list.end_node()), NodeId::SENTINEL);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn insert_before_position() {
        let mut list: List<i32> = [1, 3].into_iter().collect();
        let three = list.back_node();
        let two = list.insert(three, 2);
        assert_eq!(collect(&list), [1, 2, 3]);
        assert_eq!(list.prev_node(three), two);
        assert_ring(&list);
    }

    #[test]
    fn ids_survive_other_mutations() {
        let mut list = List::new();
        let a = list.push_back(10);
        let b = list.push_back(20);
        for i in 0..50 {
            let id = list.push_front(i);
            list.erase(id);
        }
        *list.get_mut(b) += 1;
        assert_eq!(*list.get(a), 10);
        assert_eq!(*list.get(b), 21);
    }

    #[test]
    fn pops_from_both_ends() {
        let mut list: List<String> = ["x", "y", "z"].iter().map(|s| s.to_string()).collect();
        assert_eq!(list.pop_front().as_deref(), Some("x"));
        assert_eq!(list.pop_back().as_deref(), Some("z"));
        *list.front_mut().unwrap() += "!";
        assert_eq!(list.back().map(String::as_str), Some("y!"));
        assert_eq!(list.pop_back().as_deref(), Some("y!"));
        assert_eq!(list.pop_front(), None);
    }

    #[test]
    fn iter_is_double_ended() {
        let list: List<u32> = (1..=5).collect();
        assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), [5, 4, 3, 2, 1]);
        let mut it = list.iter();
        assert_eq!(it.next(), Some(&1));
        assert_eq!(it.next_back(), Some(&5));
        assert_eq!(it.copied().collect::<Vec<_>>(), [2, 3, 4]);
    }

    #[test]
    fn cursor_is_bidirectional() {
        let list: List<u32> = (0..4).collect();
        assert_eq!(category_name::<ListCursor<'_, u32>>(), "bidirectional");
        let mut c = list.begin();
        advance(&mut c, 3);
        assert_eq!(*c.get(), 3);
        advance(&mut c, -2);
        assert_eq!(*c.get(), 1);
        c.step();
        c.step();
        c.step();
        assert_eq!(c, list.end());
        c.step_back();
        assert_eq!(*c.get(), 3);
    }

    #[test]
    #[should_panic(expected = "end position")]
    fn deref_end_panics() {
        let list: List<u8> = List::new();
        let _ = list.end().get();
    }

    #[test]
    #[should_panic(expected = "has been erased")]
    fn stale_id_panics() {
        let mut list = List::new();
        let id = list.push_back(1);
        list.erase(id);
        list.get(id);
    }

    #[test]
    fn clone_and_compare() {
        let list: List<String> = ["p", "q"].iter().map(|s| s.to_string()).collect();
        let mut copy = list.clone();
        assert_eq!(copy, list);
        copy.push_back("r".into());
        assert_ne!(copy, list);
        assert_eq!(format!("{list:?}"), r#"["p", "q"]"#);
    }

    #[test]
    fn clear_then_reuse() {
        let mut list = List::with_len(6);
        *list.front_mut().unwrap() = 9u64;
        list.clear();
        assert!(list.is_empty());
        list.push_back(1);
        assert_eq!(collect(&list), [1]);
        assert_ring(&list);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;
        use std::collections::VecDeque;

        #[derive(Clone, Debug)]
        enum Op {
            PushFront(i32),
            PushBack(i32),
            PopFront,
            PopBack,
            InsertAt(usize, i32),
            EraseAt(usize),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                any::<i32>().prop_map(Op::PushFront),
                any::<i32>().prop_map(Op::PushBack),
                Just(Op::PopFront),
                Just(Op::PopBack),
                (any::<usize>(), any::<i32>()).prop_map(|(i, v)| Op::InsertAt(i, v)),
                any::<usize>().prop_map(Op::EraseAt),
            ]
        }

        fn nth_node(list: &List<i32>, n: usize) -> NodeId {
            let mut id = list.front_node();
            for _ in 0..n {
                id = list.next_node(id);
            }
            id
        }

        proptest! {
            #[test]
            fn matches_deque_model(ops in proptest::collection::vec(op(), 0..80)) {
                let mut list: List<i32> = List::new();
                let mut model: VecDeque<i32> = VecDeque::new();
                for op in ops {
                    match op {
                        Op::PushFront(v) => {
                            list.push_front(v);
                            model.push_front(v);
                        }
                        Op::PushBack(v) => {
                            list.push_back(v);
                            model.push_back(v);
                        }
                        Op::PopFront => prop_assert_eq!(list.pop_front(), model.pop_front()),
                        Op::PopBack => prop_assert_eq!(list.pop_back(), model.pop_back()),
                        Op::InsertAt(i, v) => {
                            let i = i % (model.len() + 1);
                            let pos = nth_node(&list, i);
                            list.insert(pos, v);
                            model.insert(i, v);
                        }
                        Op::EraseAt(i) => {
                            let i = i % (model.len() + 1);
                            let pos = nth_node(&list, i);
                            list.erase(pos);
                            if i < model.len() {
                                model.remove(i);
                            }
                        }
                    }
                    prop_assert_eq!(list.len(), model.len());
                    prop_assert!(list.iter().eq(model.iter()));
                }
                assert_ring(&list);
            }
        }
    }
}
