//! Allocator configuration parameters.

use crate::oom::RecoveryHook;

/// Configuration for [`MallocAlloc`](crate::MallocAlloc).
///
/// Controls how an allocation failure is recovered from. Copied into the
/// allocator at construction; every container holding a clone of the
/// allocator sees the same settings.
#[derive(Clone, Copy, Debug)]
pub struct AllocConfig {
    /// Hook invoked when the global heap returns null.
    ///
    /// Default: `None`, which defers to the process-wide hook installed
    /// with [`set_recovery_hook`](crate::set_recovery_hook). When set, this
    /// hook takes precedence over the process-wide one.
    pub recovery_hook: Option<RecoveryHook>,

    /// Upper bound on hook invocations for a single request.
    ///
    /// Default: `None` (retry for as long as a hook is available). Running
    /// out of attempts is fatal, exactly like having no hook at all.
    pub max_recovery_attempts: Option<u32>,
}

impl AllocConfig {
    /// Default per-allocator hook: none.
    pub const DEFAULT_RECOVERY_HOOK: Option<RecoveryHook> = None;

    /// Default attempt budget: unbounded.
    pub const DEFAULT_MAX_RECOVERY_ATTEMPTS: Option<u32> = None;

    /// Create a config with default values.
    pub const fn new() -> Self {
        Self {
            recovery_hook: Self::DEFAULT_RECOVERY_HOOK,
            max_recovery_attempts: Self::DEFAULT_MAX_RECOVERY_ATTEMPTS,
        }
    }

    /// Use `hook` instead of the process-wide hook.
    pub const fn with_recovery_hook(mut self, hook: RecoveryHook) -> Self {
        self.recovery_hook = Some(hook);
        self
    }

    /// Give up after `attempts` hook invocations.
    pub const fn with_max_recovery_attempts(mut self, attempts: u32) -> Self {
        self.max_recovery_attempts = Some(attempts);
        self
    }
}

impl Default for AllocConfig {
    fn default() -> Self {
        Self::new()
    }
}
