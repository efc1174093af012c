//! Fault-injecting and drop-tracking value types.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;


/// Shared trigger for a family of [`CloneBomb`]s.
///
/// Counts clones across every bomb made from it; the clone that would be
/// the `k`-th (1-based) panics instead. Also tracks how many bombs are
/// alive, so a test can check that a rolled-back operation leaked or
/// double-dropped nothing.
#[derive(Clone, Default)]
pub struct Fuse {
    inner: Rc<FuseState>,
}

#[derive(Default)]
struct FuseState {
    clones: Cell<usize>,
    trigger: Cell<Option<usize>>,
    live: Cell<usize>,
}

impl Fuse {
    /// A fuse that never triggers.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fuse whose `k`-th clone from now panics.
    pub fn armed(k: usize) -> Self {
        let fuse = Self::new();
        fuse.arm(k);
        fuse
    }

    /// Make the `k`-th clone from now panic. Resets the clone count.
    pub fn arm(&self, k: usize) {
        self.inner.clones.set(0);
        self.inner.trigger.set(Some(k));
    }

    pub fn disarm(&self) {
        self.inner.trigger.set(None);
    }

    /// Successful clones since the fuse was last armed.
    pub fn clones(&self) -> usize {
        self.inner.clones.get()
    }

    /// Bombs currently alive.
    pub fn live(&self) -> usize {
        self.inner.live.get()
    }

    pub fn make(&self, value: u32) -> CloneBomb {
        self.inner.live.set(self.inner.live.get() + 1);
        CloneBomb {
            value,
            fuse: self.clone(),
        }
    }
}

impl fmt::Debug for Fuse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fuse")
            .field("clones", &self.clones())
            .field("trigger", &self.inner.trigger.get())
            .field("live", &self.live())
            .finish()
    }
}

/// A value whose `clone` panics when its [`Fuse`] triggers.
pub struct CloneBomb {
    value: u32,
    fuse: Fuse,
}

impl CloneBomb {
    pub fn value(&self) -> u32 {
        self.value
    }
}

impl Clone for CloneBomb {
    fn clone(&self) -> Self {
        let state = &self.fuse.inner;
        let next = state.clones.get() + 1;
        if state.trigger.get() == Some(next) {
            panic!("CloneBomb detonated on clone #{next}");
        }
        state.clones.set(next);
        self.fuse.make(self.value)
    }
}

impl Drop for CloneBomb {
    fn drop(&mut self) {
        let live = &self.fuse.inner.live;
        assert!(live.get() > 0, "CloneBomb dropped twice");
        live.set(live.get() - 1);
    }
}

impl PartialEq for CloneBomb {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl fmt::Debug for CloneBomb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CloneBomb({})", self.value)
    }
}

vessel_core::conservative_traits!(CloneBomb);

/// Shared record of [`DropCounter`] drops, in drop order.
#[derive(Clone, Default)]
pub struct DropLog {
    dropped: Rc<RefCell<Vec<u32>>>,
}

impl DropLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self, id: u32) -> DropCounter {
        DropCounter {
            id,
            log: self.clone(),
        }
    }

    /// Number of drops recorded.
    pub fn count(&self) -> usize {
        self.dropped.borrow().len()
    }

    /// Ids in the order they were dropped.
    pub fn order(&self) -> Vec<u32> {
        self.dropped.borrow().clone()
    }

    pub fn clear(&self) {
        self.dropped.borrow_mut().clear();
    }
}

/// A value that appends its id to a [`DropLog`] when dropped.
///
/// Clones carry the same id.
pub struct DropCounter {
    id: u32,
    log: DropLog,
}

impl DropCounter {
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl Clone for DropCounter {
    fn clone(&self) -> Self {
        self.log.counter(self.id)
    }
}

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.log.dropped.borrow_mut().push(self.id);
    }
}

impl PartialEq for DropCounter {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for DropCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DropCounter({})", self.id)
    }
}

vessel_core::conservative_traits!(DropCounter);
