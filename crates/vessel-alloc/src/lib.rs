//! Allocation layer for the Vessel container library.
//!
//! Memory acquisition and object lifecycle are kept apart:
//!
//! ```text
//! RawAllocator (bytes)          MallocAlloc ── oom::recover ── RecoveryHook
//!   └── TypedAlloc<T, A>        n contiguous T, layout checked
//!         └── StorageBlock<T, A>  owned region of MaybeUninit<T> slots
//!
//! lifecycle   construct / destroy on a single slot, destroy_range
//! uninit      bulk construction into raw slots with rollback
//! ```
//!
//! Nothing in this crate decides *when* memory is allocated; that is the
//! containers' growth policy. Nothing here tracks which slots are live
//! either: a [`StorageBlock`] releases its region without dropping slot
//! contents, and callers destroy live values first.
//!
//! This crate and `vessel-containers` are the only ones that contain
//! `unsafe` code. Every `unsafe` block carries a `// SAFETY:` comment.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod block;
pub mod config;
pub mod lifecycle;
pub mod oom;
pub mod raw;
pub mod typed;
pub mod uninit;

pub use block::StorageBlock;
pub use config::AllocConfig;
pub use oom::{recovery_hook, set_recovery_hook, RecoveryHook};
pub use raw::{MallocAlloc, RawAllocator};
pub use typed::TypedAlloc;
