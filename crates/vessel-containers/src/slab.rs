//! Node storage for [`List`](crate::List).
//!
//! Nodes live in one [`StorageBlock`] and link to each other by
//! [`NodeId`] index, so growing the block with a reallocation moves every
//! node without rewriting a single link. Slot 0 is the sentinel. Erased
//! slots are chained through their `next` field into a free list and are
//! reused before the block grows.

#![allow(unsafe_code)]

use vessel_alloc::lifecycle::destroy_range;
use vessel_alloc::{RawAllocator, StorageBlock};
use vessel_core::{NodeId, TypeTraits};

/// A list node. Vacant slots and the sentinel hold `None`.
#[derive(Debug)]
pub struct Node<T> {
    /// Previous node in the ring (unused while vacant).
    pub prev: NodeId,
    /// Next node in the ring, or next free slot while vacant.
    pub next: NodeId,
    /// The element.
    pub value: Option<T>,
}

// SAFETY: conservative record; nodes are always dropped individually.
unsafe impl<T> TypeTraits for Node<T> {}

/// Slab of [`Node`]s with a free list.
pub struct NodeSlab<T, A: RawAllocator> {
    block: StorageBlock<Node<T>, A>,
    /// Slots `[0, initialized)` hold constructed nodes.
    initialized: usize,
    /// Head of the free list; the sentinel id means empty.
    free: NodeId,
}

impl<T, A: RawAllocator> NodeSlab<T, A> {
    const INITIAL_CAPACITY: usize = 4;

    /// A slab holding only the sentinel, linked to itself.
    pub fn new_in(alloc: A) -> Self {
        let block = match StorageBlock::with_capacity_in(Self::INITIAL_CAPACITY, alloc) {
            Ok(block) => block,
            Err(e) => panic!("{e}"),
        };
        let mut slab = Self {
            block,
            initialized: 0,
            free: NodeId::SENTINEL,
        };
        slab.block.slot(0).write(Node {
            prev: NodeId::SENTINEL,
            next: NodeId::SENTINEL,
            value: None,
        });
        slab.initialized = 1;
        slab
    }

    /// The allocator backing the slab.
    pub fn allocator(&self) -> &A {
        self.block.allocator()
    }

    /// Slots currently reserved.
    pub fn capacity(&self) -> usize {
        self.block.capacity()
    }

    fn nodes(&self) -> &[Node<T>] {
        // SAFETY: `[0, initialized)` are constructed.
        unsafe { self.block.assume_init(0..self.initialized) }
    }

    fn nodes_mut(&mut self) -> &mut [Node<T>] {
        let initialized = self.initialized;
        // SAFETY: `[0, initialized)` are constructed.
        unsafe { self.block.assume_init_mut(0..initialized) }
    }

    /// The node at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was never handed out by this slab.
    pub fn node(&self, id: NodeId) -> &Node<T> {
        match self.nodes().get(id.index()) {
            Some(node) => node,
            None => panic!("node {id} does not belong to this list"),
        }
    }

    /// The node at `id`, mutably.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        match self.nodes_mut().get_mut(id.index()) {
            Some(node) => node,
            None => panic!("node {id} does not belong to this list"),
        }
    }

    /// Take a vacant slot: from the free list if possible, otherwise by
    /// constructing a fresh node at the end (doubling the block when full).
    pub fn get_node(&mut self) -> NodeId {
        if !self.free.is_sentinel() {
            let id = self.free;
            self.free = self.node(id).next;
            return id;
        }
        if self.initialized == self.block.capacity() {
            self.grow();
        }
        let index = self.initialized;
        let raw = match u32::try_from(index) {
            Ok(raw) => raw,
            Err(_) => panic!("list exceeds {} nodes", u32::MAX),
        };
        self.block.slot(index).write(Node {
            prev: NodeId::SENTINEL,
            next: NodeId::SENTINEL,
            value: None,
        });
        self.initialized += 1;
        NodeId(raw)
    }

    /// Return a vacant slot to the free list.
    pub fn put_node(&mut self, id: NodeId) {
        assert!(!id.is_sentinel(), "the sentinel cannot be freed");
        let free = self.free;
        let node = self.node_mut(id);
        debug_assert!(node.value.is_none(), "freeing an occupied node");
        node.next = free;
        self.free = id;
    }

    /// Take a slot and store `value` in it. Links are left to the caller.
    pub fn create_node(&mut self, value: T) -> NodeId {
        let id = self.get_node();
        self.node_mut(id).value = Some(value);
        id
    }

    /// Move the value out of `id` and return the slot to the free list.
    ///
    /// # Panics
    ///
    /// Panics if `id` is the sentinel or already vacant.
    pub fn destroy_node(&mut self, id: NodeId) -> T {
        assert!(!id.is_sentinel(), "the sentinel holds no value");
        let value = match self.node_mut(id).value.take() {
            Some(value) => value,
            None => panic!("node {id} has already been erased"),
        };
        self.put_node(id);
        value
    }

    /// Drop every value and forget every slot except the sentinel, which
    /// is relinked to itself. Capacity is kept.
    pub fn reset(&mut self) {
        let initialized = self.initialized;
        self.initialized = 1;
        self.free = NodeId::SENTINEL;
        let sentinel = self.node_mut(NodeId::SENTINEL);
        sentinel.prev = NodeId::SENTINEL;
        sentinel.next = NodeId::SENTINEL;
        // SAFETY: `[1, initialized)` were constructed and are no longer
        // covered by `initialized`.
        unsafe { destroy_range(self.block.slots(1..initialized)) };
    }

    fn grow(&mut self) {
        let old = self.block.capacity();
        let new = old.checked_mul(2).unwrap_or_else(|| panic!("capacity overflow"));
        if let Err(e) = self.block.resize(new) {
            panic!("{e}");
        }
        log::trace!("node slab grew from {old} to {new} slots");
    }
}

impl<T, A: RawAllocator> Drop for NodeSlab<T, A> {
    fn drop(&mut self) {
        let initialized = self.initialized;
        // SAFETY: `[0, initialized)` are constructed nodes.
        unsafe { destroy_range(self.block.slots(0..initialized)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vessel_alloc::MallocAlloc;

    fn slab() -> NodeSlab<String, MallocAlloc> {
        NodeSlab::new_in(MallocAlloc::new())
    }

    #[test]
    fn new_slab_has_self_linked_sentinel() {
        let s = slab();
        let sentinel = s.node(NodeId::SENTINEL);
        assert_eq!(sentinel.next, NodeId::SENTINEL);
        assert_eq!(sentinel.prev, NodeId::SENTINEL);
        assert!(sentinel.value.is_none());
    }

    #[test]
    fn erased_slots_are_reused() {
        let mut s = slab();
        let a = s.create_node("a".into());
        let b = s.create_node("b".into());
        assert_eq!((a, b), (NodeId(1), NodeId(2)));
        assert_eq!(s.destroy_node(a), "a");
        let c = s.create_node("c".into());
        assert_eq!(c, a);
        assert_eq!(s.node(c).value.as_deref(), Some("c"));
    }

    #[test]
    fn growth_doubles_and_keeps_values() {
        let mut s = slab();
        let ids: Vec<_> = (0..20).map(|i| s.create_node(i.to_string())).collect();
        assert_eq!(s.capacity(), 32);
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(s.node(*id).value.as_deref(), Some(i.to_string().as_str()));
        }
    }

    #[test]
    fn reset_keeps_capacity() {
        let mut s = slab();
        for i in 0..10 {
            s.create_node(i.to_string());
        }
        let cap = s.capacity();
        s.reset();
        assert_eq!(s.capacity(), cap);
        assert_eq!(s.get_node(), NodeId(1));
    }

    #[test]
    #[should_panic(expected = "already been erased")]
    fn double_destroy_panics() {
        let mut s = slab();
        let a = s.create_node("a".into());
        s.destroy_node(a);
        s.destroy_node(a);
    }

    #[test]
    #[should_panic(expected = "does not belong")]
    fn foreign_id_panics() {
        slab().node(NodeId(7));
    }
}
