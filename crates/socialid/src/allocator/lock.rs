use crate::{AllocatorConfig, Error, Result, SocialStore};
use std::thread;
use std::time::Instant;

/// A held per-user allocation lock. Released on drop.
///
/// Only one holder per user handle exists at a time (until the TTL lapses),
/// across every process sharing the store. Release failures are logged and
/// otherwise left to the TTL.
pub(crate) struct UserLock<'a, S>
where
    S: SocialStore + ?Sized,
{
    store: &'a S,
    user_handle: &'a str,
    token: String,
}

impl<'a, S> UserLock<'a, S>
where
    S: SocialStore + ?Sized,
{
    /// Polls [`SocialStore::try_lock`] every `lock_retry` until it succeeds or
    /// `lock_wait` has elapsed. Store errors are returned immediately.
    pub(crate) fn acquire(
        store: &'a S,
        user_handle: &'a str,
        token: String,
        config: &AllocatorConfig,
    ) -> Result<Self> {
        let start = Instant::now();
        loop {
            if store.try_lock(user_handle, &token, config.lock_ttl)? {
                return Ok(Self {
                    store,
                    user_handle,
                    token,
                });
            }

            let waited = start.elapsed();
            if waited >= config.lock_wait {
                #[cfg(feature = "tracing")]
                tracing::warn!(user_handle, ?waited, "allocation lock still held");
                return Err(Error::LockTimeout {
                    user_handle: user_handle.to_owned(),
                    waited,
                });
            }
            thread::sleep(config.lock_retry.min(config.lock_wait - waited));
        }
    }
}

impl<S> Drop for UserLock<'_, S>
where
    S: SocialStore + ?Sized,
{
    fn drop(&mut self) {
        if let Err(_e) = self.store.unlock(self.user_handle, &self.token) {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                user_handle = self.user_handle,
                "failed to release allocation lock, leaving it to expire: {_e}"
            );
        }
    }
}
