//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a node slot inside a linked list's node slab.
///
/// `NodeId(0)` is always the list's sentinel, which never holds a value
/// and denotes the end position. Ids are stable until the node they name
/// is erased; afterwards the slot may be recycled for a later insert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The sentinel slot of every list.
    pub const SENTINEL: NodeId = NodeId(0);

    /// Whether this id names the sentinel (the end position).
    pub fn is_sentinel(self) -> bool {
        self == Self::SENTINEL
    }

    /// The slot index as a `usize`.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_slot_zero() {
        assert!(NodeId::SENTINEL.is_sentinel());
        assert_eq!(NodeId::SENTINEL.index(), 0);
        assert!(!NodeId(7).is_sentinel());
    }

    #[test]
    fn display_and_from() {
        let id: NodeId = 42u32.into();
        assert_eq!(id.to_string(), "42");
        assert_eq!(id.index(), 42);
    }
}
