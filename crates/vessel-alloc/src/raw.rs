//! Byte-level allocators.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use vessel_core::AllocError;

use crate::config::AllocConfig;
use crate::oom;

/// Build a layout, reporting an invalid size/alignment pair as an error.
pub fn layout(size: usize, align: usize) -> Result<Layout, AllocError> {
    Layout::from_size_align(size, align).map_err(|_| AllocError::InvalidLayout { size, align })
}

/// Source of raw, untyped memory.
///
/// Implementations never return null: exhaustion is either recovered from
/// internally or fatal. Allocators are cheap handles; containers clone them
/// when they need a second block from the same source.
pub trait RawAllocator: Clone {
    /// Allocate a block for `layout`.
    ///
    /// # Panics
    ///
    /// Panics if `layout.size()` is zero.
    fn allocate(&self, layout: Layout) -> NonNull<u8>;

    /// Release a block.
    ///
    /// # Safety
    ///
    /// `ptr` must come from [`allocate`](Self::allocate) or
    /// [`reallocate`](Self::reallocate) on this allocator (or a clone of
    /// it) with the same `layout`, and must not have been released yet.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Resize a block to `new_size` bytes, keeping the alignment of
    /// `old_layout`. The first `min(old, new)` bytes are preserved.
    ///
    /// The default implementation allocates, copies and releases.
    ///
    /// # Safety
    ///
    /// As for [`deallocate`](Self::deallocate); on return the old pointer
    /// is no longer valid. `new_size` must be non-zero.
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_size: usize,
    ) -> NonNull<u8> {
        let new_layout = match layout(new_size, old_layout.align()) {
            Ok(new_layout) => new_layout,
            Err(e) => panic!("{e}"),
        };
        let new_ptr = self.allocate(new_layout);
        // SAFETY: both blocks are live, distinct, and at least this large.
        unsafe {
            std::ptr::copy_nonoverlapping(
                ptr.as_ptr(),
                new_ptr.as_ptr(),
                old_layout.size().min(new_size),
            );
            self.deallocate(ptr, old_layout);
        }
        new_ptr
    }
}

/// Allocator backed by the global heap.
///
/// A null result from the heap enters the recovery loop described in
/// [`oom`](crate::oom) before being treated as fatal.
#[derive(Clone, Copy, Debug, Default)]
pub struct MallocAlloc {
    config: AllocConfig,
}

impl MallocAlloc {
    /// An allocator with the default config.
    pub const fn new() -> Self {
        Self {
            config: AllocConfig::new(),
        }
    }

    /// An allocator with a custom recovery config.
    pub const fn with_config(config: AllocConfig) -> Self {
        Self { config }
    }

    /// The recovery config in effect.
    pub fn config(&self) -> &AllocConfig {
        &self.config
    }
}

impl RawAllocator for MallocAlloc {
    fn allocate(&self, layout: Layout) -> NonNull<u8> {
        assert!(layout.size() != 0, "zero-sized raw allocation");
        // SAFETY: `layout` has non-zero size.
        let attempt = move || NonNull::new(unsafe { alloc::alloc(layout) });
        match attempt() {
            Some(ptr) => ptr,
            None => oom::recover(&self.config, layout, attempt),
        }
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: caller guarantees `ptr` was allocated here with `layout`.
        unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_size: usize,
    ) -> NonNull<u8> {
        let new_layout = match layout(new_size, old_layout.align()) {
            Ok(new_layout) if new_size != 0 => new_layout,
            Ok(_) => panic!("zero-sized raw reallocation"),
            Err(e) => panic!("{e}"),
        };
        // SAFETY: caller guarantees `ptr`/`old_layout` describe a live block
        // from this allocator; `new_layout` is valid and non-zero. A null
        // result leaves the old block untouched, so retrying is sound.
        let attempt =
            move || NonNull::new(unsafe { alloc::realloc(ptr.as_ptr(), old_layout, new_size) });
        match attempt() {
            Some(new_ptr) => new_ptr,
            None => oom::recover(&self.config, new_layout, attempt),
        }
    }
}
