//! Containers for the Vessel library.
//!
//! - [`Array`]: contiguous dynamic array with amortized growth.
//! - [`List`]: circular doubly-linked list whose nodes live in a slab
//!   owned by the list, addressed by [`NodeId`](vessel_core::NodeId).
//!
//! Both are generic over a [`RawAllocator`](vessel_alloc::RawAllocator)
//! and default to the global heap. Every operation that constructs values
//! gives the strong guarantee: if a `clone` panics or a producer returns
//! `Err`, the container is left exactly as it was.
//!
//! Positions are plain indices (`usize`) for [`Array`] and node ids for
//! [`List`]. Cursors borrow the container and implement the protocol in
//! [`vessel_core::iter`], so generic algorithms accept them directly.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod array;
pub mod growth;
pub mod list;
pub mod slab;

pub use array::Array;
pub use list::{List, ListCursor};
