use core::time::Duration;

/// Tuning for [`Allocator`].
///
/// [`Allocator`]: crate::Allocator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocatorConfig {
    /// How long a per-user lock lives in the store if its holder never
    /// releases it (crash, lost connection). Must comfortably exceed one
    /// lookup + pop + bind round-trip. A holder that outlives it loses
    /// exclusivity, and a second identifier may be popped for the same user.
    /// Only the first binding is kept.
    pub lock_ttl: Duration,

    /// Pause between attempts to take a contended lock.
    pub lock_retry: Duration,

    /// Total time to wait for a contended lock before failing with
    /// [`Error::LockTimeout`].
    ///
    /// [`Error::LockTimeout`]: crate::Error::LockTimeout
    pub lock_wait: Duration,

    /// Return a popped identifier to the pool when the binding write fails.
    ///
    /// Off by default: a write that timed out may still have been applied,
    /// and pushing its identifier back would issue it twice. Enable only for
    /// stores whose write errors are known to mean "not applied".
    pub push_back_on_failure: bool,
}

impl AllocatorConfig {
    pub const DEFAULT_LOCK_TTL: Duration = Duration::from_secs(5);
    pub const DEFAULT_LOCK_RETRY: Duration = Duration::from_millis(10);
    pub const DEFAULT_LOCK_WAIT: Duration = Duration::from_secs(2);
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            lock_ttl: Self::DEFAULT_LOCK_TTL,
            lock_retry: Self::DEFAULT_LOCK_RETRY,
            lock_wait: Self::DEFAULT_LOCK_WAIT,
            push_back_on_failure: false,
        }
    }
}
