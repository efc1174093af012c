//! Out-of-memory recovery.
//!
//! When the global heap returns null, the allocator does not give up
//! immediately. It looks up a recovery hook (first the one in its own
//! [`AllocConfig`], then the process-wide slot), invokes it, and retries
//! the request. The hook is expected to release memory held elsewhere,
//! such as caches. With no hook, or once the configured attempt budget is
//! spent, the failure is fatal: it is logged and handed to
//! [`std::alloc::handle_alloc_error`].

use std::alloc::Layout;
use std::ptr::NonNull;
use std::sync::{Mutex, PoisonError};

use crate::config::AllocConfig;

/// A callback that tries to free memory so an allocation can be retried.
pub type RecoveryHook = fn();

static HOOK: Mutex<Option<RecoveryHook>> = Mutex::new(None);

/// Install (or clear, with `None`) the process-wide recovery hook.
///
/// Returns the previously installed hook.
pub fn set_recovery_hook(hook: Option<RecoveryHook>) -> Option<RecoveryHook> {
    let mut slot = HOOK.lock().unwrap_or_else(PoisonError::into_inner);
    let previous = std::mem::replace(&mut *slot, hook);
    log::debug!(
        "recovery hook {} (previous hook {})",
        if hook.is_some() { "installed" } else { "cleared" },
        if previous.is_some() { "replaced" } else { "absent" }
    );
    previous
}

/// The process-wide recovery hook, if one is installed.
pub fn recovery_hook() -> Option<RecoveryHook> {
    *HOOK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Why the recovery loop stopped without memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Unrecovered {
    /// Neither the config nor the process-wide slot holds a hook.
    NoHook,
    /// The hook ran `attempts` times without the request succeeding.
    Exhausted { attempts: u32 },
}

/// Retry `attempt` after each hook invocation until it yields memory.
pub(crate) fn try_recover<F>(
    config: &AllocConfig,
    layout: Layout,
    mut attempt: F,
) -> Result<NonNull<u8>, Unrecovered>
where
    F: FnMut() -> Option<NonNull<u8>>,
{
    let mut attempts = 0u32;
    loop {
        let hook = config
            .recovery_hook
            .or_else(recovery_hook)
            .ok_or(Unrecovered::NoHook)?;
        if config.max_recovery_attempts.is_some_and(|max| attempts >= max) {
            return Err(Unrecovered::Exhausted { attempts });
        }
        attempts += 1;
        log::warn!(
            "allocation of {} bytes (align {}) failed, running recovery hook (attempt {attempts})",
            layout.size(),
            layout.align()
        );
        hook();
        if let Some(ptr) = attempt() {
            return Ok(ptr);
        }
    }
}

/// [`try_recover`], with an unrecovered failure treated as fatal.
pub(crate) fn recover<F>(config: &AllocConfig, layout: Layout, attempt: F) -> NonNull<u8>
where
    F: FnMut() -> Option<NonNull<u8>>,
{
    match try_recover(config, layout, attempt) {
        Ok(ptr) => ptr,
        Err(reason) => {
            match reason {
                Unrecovered::NoHook => log::error!(
                    "out of memory: {} bytes requested and no recovery hook is installed",
                    layout.size()
                ),
                Unrecovered::Exhausted { attempts } => log::error!(
                    "out of memory: {} bytes requested, recovery hook gave up after {attempts} attempts",
                    layout.size()
                ),
            }
            std::alloc::handle_alloc_error(layout)
        }
    }
}
