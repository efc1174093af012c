//! Core types and traits for the Vessel container library.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the abstractions shared by the allocator layer, the containers and
//! the generic algorithms:
//!
//! - [`type_traits`]: the per-type capability registry ([`TypeTraits`]).
//! - [`iter`]: the category-tagged cursor protocol ([`Cursor`] and friends).
//! - [`id`]: strongly-typed node identifiers.
//! - [`error`]: allocation error types.
//!
//! The registry trait is `unsafe` to implement, so [`type_traits`] is the
//! one module that opts out of the crate-wide `unsafe_code` denial.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod error;
pub mod id;
pub mod iter;
pub mod type_traits;

pub use error::AllocError;
pub use id::NodeId;
pub use iter::{
    advance, category_level, category_name, distance, BidirectionalCursor, BidirectionalTag,
    Category, Cursor, Dispatch, ForwardCursor, ForwardOnly, ForwardTag, InputTag,
    RandomAccessCursor, RandomAccessTag, SliceCursor, SubsequenceSearch,
};
pub use type_traits::{TraitRecord, TypeTraits};
