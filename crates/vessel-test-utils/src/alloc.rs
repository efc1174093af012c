//! Instrumented allocator.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::ptr::NonNull;
use std::rc::Rc;

use indexmap::IndexMap;
use vessel_alloc::{MallocAlloc, RawAllocator};

/// Counter snapshot taken by [`CountingAlloc::stats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocStats {
    pub allocations: usize,
    pub deallocations: usize,
    pub reallocations: usize,
    pub live_blocks: usize,
    pub live_bytes: usize,
}

#[derive(Default)]
struct Ledger {
    allocations: Cell<usize>,
    deallocations: Cell<usize>,
    reallocations: Cell<usize>,
    /// Live blocks keyed by address, in allocation order.
    live: RefCell<IndexMap<usize, Layout>>,
}

impl Ledger {
    fn record(&self, ptr: NonNull<u8>, layout: Layout) {
        let previous = self.live.borrow_mut().insert(ptr.as_ptr() as usize, layout);
        assert!(previous.is_none(), "heap returned live block {ptr:?} twice");
    }

    fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        let recorded = self.live.borrow_mut().shift_remove(&(ptr.as_ptr() as usize));
        match recorded {
            Some(recorded) => assert_eq!(
                recorded, layout,
                "block {ptr:?} released with a different layout than it was allocated with"
            ),
            None => panic!("released unknown or already-freed block {ptr:?}"),
        }
    }
}

/// Malloc-backed allocator that counts requests.
///
/// Clones share one ledger, so a container and a test can hold the same
/// allocator and the test sees every request the container makes. Single
/// threaded by construction (`Rc`).
#[derive(Clone, Default)]
pub struct CountingAlloc {
    ledger: Rc<Ledger>,
}

impl CountingAlloc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> AllocStats {
        let live = self.ledger.live.borrow();
        AllocStats {
            allocations: self.ledger.allocations.get(),
            deallocations: self.ledger.deallocations.get(),
            reallocations: self.ledger.reallocations.get(),
            live_blocks: live.len(),
            live_bytes: live.values().map(Layout::size).sum(),
        }
    }

    pub fn live_blocks(&self) -> usize {
        self.ledger.live.borrow().len()
    }

    pub fn live_bytes(&self) -> usize {
        self.stats().live_bytes
    }

    /// Every block handed out has been released.
    pub fn is_balanced(&self) -> bool {
        self.live_blocks() == 0
    }

    /// Layouts of the live blocks, oldest first.
    pub fn live_layouts(&self) -> Vec<Layout> {
        self.ledger.live.borrow().values().copied().collect()
    }
}

impl RawAllocator for CountingAlloc {
    fn allocate(&self, layout: Layout) -> NonNull<u8> {
        let ptr = MallocAlloc::new().allocate(layout);
        self.ledger.allocations.set(self.ledger.allocations.get() + 1);
        self.ledger.record(ptr, layout);
        ptr
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.ledger.release(ptr, layout);
        self.ledger.deallocations.set(self.ledger.deallocations.get() + 1);
        // SAFETY: the ledger confirmed `ptr` is live with this layout.
        unsafe { MallocAlloc::new().deallocate(ptr, layout) }
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_size: usize,
    ) -> NonNull<u8> {
        self.ledger.release(ptr, old_layout);
        // SAFETY: the ledger confirmed `ptr` is live with `old_layout`.
        let new_ptr = unsafe { MallocAlloc::new().reallocate(ptr, old_layout, new_size) };
        self.ledger.reallocations.set(self.ledger.reallocations.get() + 1);
        let new_layout = Layout::from_size_align(new_size, old_layout.align())
            .unwrap_or_else(|e| panic!("reallocation produced an invalid layout: {e}"));
        self.ledger.record(new_ptr, new_layout);
        new_ptr
    }
}

impl fmt::Debug for CountingAlloc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountingAlloc")
            .field("stats", &self.stats())
            .finish()
    }
}
