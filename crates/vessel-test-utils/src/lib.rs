//! Test utilities for Vessel development.
//!
//! - [`CountingAlloc`]: a [`RawAllocator`](vessel_alloc::RawAllocator)
//!   that records every request and keeps a map of live blocks, so tests
//!   can assert on allocation balance and on how many blocks a container
//!   holds after growth.
//! - [`CloneBomb`] / [`Fuse`]: a value type whose `clone` panics on a
//!   chosen invocation, for exercising rollback paths.
//! - [`DropCounter`] / [`DropLog`]: a value type that records when, and in
//!   what order, instances are dropped.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod alloc;
pub mod fixtures;

pub use alloc::{AllocStats, CountingAlloc};
pub use fixtures::{CloneBomb, DropCounter, DropLog, Fuse};
