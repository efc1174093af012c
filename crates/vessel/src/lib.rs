//! Vessel: generic containers with manual memory control.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Vessel sub-crates. For most users, adding `vessel` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use vessel::prelude::*;
//!
//! let mut a: Array<i32> = Array::new();
//! a.push_back(1);
//! a.push_back(2);
//! a.push_back(3);
//! assert_eq!(a.capacity(), 4);
//! a.erase(1);
//! a.insert_n(1, 2, &9);
//! assert_eq!(a, [1, 9, 9, 3]);
//!
//! let mut l: List<&str> = List::new();
//! l.push_back("a");
//! l.push_back("b");
//! l.push_front("z");
//! let hit = find(l.begin(), l.end(), &"a");
//! assert_eq!(*hit.get(), "a");
//! assert_eq!(accumulate(a.begin(), a.end(), 0), 22);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for items not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `vessel-core` | Type-trait registry, cursor protocol, node ids, errors |
//! | [`alloc`] | `vessel-alloc` | Raw and typed allocators, recovery hook, lifecycle and uninitialized-range ops |
//! | [`containers`] | `vessel-containers` | `Array`, `List`, growth policies |
//! | [`algo`] | `vessel-algo` | Copy/fill/compare, searching, numeric folds |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core traits and types (`vessel-core`).
///
/// Contains the [`types::TypeTraits`] registry, the cursor traits with their
/// category tags, and [`types::distance`] / [`types::advance`].
pub use vessel_core as types;

/// Allocation layer (`vessel-alloc`).
///
/// [`alloc::MallocAlloc`] is the default allocator; install an
/// out-of-memory recovery hook with [`alloc::set_recovery_hook`] or per
/// allocator through [`alloc::AllocConfig`].
pub use vessel_alloc as alloc;

/// Containers (`vessel-containers`).
pub use vessel_containers as containers;

/// Generic algorithms (`vessel-algo`).
pub use vessel_algo as algo;

/// Common imports for typical Vessel usage.
///
/// ```rust
/// use vessel::prelude::*;
/// ```
pub mod prelude {
    // Containers
    pub use vessel_containers::{Array, List, ListCursor};

    // Cursor protocol
    pub use vessel_core::{
        advance, distance, BidirectionalCursor, Cursor, ForwardCursor, NodeId,
        RandomAccessCursor, SliceCursor,
    };

    // Type traits
    pub use vessel_core::{TraitRecord, TypeTraits};

    // Allocation
    pub use vessel_alloc::{AllocConfig, MallocAlloc, RawAllocator};

    // Algorithms
    pub use vessel_algo::{
        accumulate, accumulate_with, copy, copy_backward, equal, fill, fill_n, find, find_end,
        find_first_of, find_if, find_if_not, for_each, gcd,
    };
}
