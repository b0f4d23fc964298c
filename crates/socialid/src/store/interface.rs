use crate::Result;
use core::time::Duration;
use std::sync::Arc;

/// The durable key-value store that owns the identifier pool and every
/// binding.
///
/// Allocators and pool generators are stateless; all coordination between
/// concurrent callers (threads, processes or hosts) happens through this
/// trait. Each method is a single store-side operation. In particular
/// [`pop_identifier`] must be atomic in the store itself, never a client-side
/// read followed by a delete.
///
/// Backends report connection and command failures as
/// [`Error::StoreUnavailable`].
///
/// [`pop_identifier`]: SocialStore::pop_identifier
/// [`Error::StoreUnavailable`]: crate::Error::StoreUnavailable
pub trait SocialStore {
    /// Returns the identifier bound to `user_handle`, if any.
    fn binding(&self, user_handle: &str) -> Result<Option<String>>;

    /// Records `user_handle -> social_id` with no expiry, unless the handle
    /// is already bound. Set-if-absent in one store-side step.
    ///
    /// Returns the identifier bound to `user_handle` after the call: either
    /// `social_id`, or the earlier binding that was left in place.
    fn bind(&self, user_handle: &str, social_id: &str) -> Result<String>;

    /// Atomically removes one identifier from the pool. `None` means the
    /// pool is empty.
    fn pop_identifier(&self) -> Result<Option<String>>;

    /// Returns `social_id` to the end of the pool that [`pop_identifier`]
    /// takes from, so it is the next one issued.
    ///
    /// [`pop_identifier`]: SocialStore::pop_identifier
    fn push_back_identifier(&self, social_id: &str) -> Result<()>;

    /// Clears the pool and loads `ids` so that they pop in slice order.
    /// Bindings are untouched.
    fn replace_pool(&self, ids: &[String]) -> Result<()>;

    /// Number of identifiers left in the pool.
    fn pool_len(&self) -> Result<usize>;

    /// Tries to take the allocation lock of `user_handle` for `ttl`, tagged
    /// with `token`. Returns `false` if someone else holds it.
    fn try_lock(&self, user_handle: &str, token: &str, ttl: Duration) -> Result<bool>;

    /// Releases the lock of `user_handle` if it is still held under `token`.
    fn unlock(&self, user_handle: &str, token: &str) -> Result<()>;

    /// Round-trips to the store.
    fn ping(&self) -> Result<()>;
}

macro_rules! forward_store {
    ($($ty:ty),*) => {$(
        impl<S: SocialStore + ?Sized> SocialStore for $ty {
            fn binding(&self, user_handle: &str) -> Result<Option<String>> {
                (**self).binding(user_handle)
            }

            fn bind(&self, user_handle: &str, social_id: &str) -> Result<String> {
                (**self).bind(user_handle, social_id)
            }

            fn pop_identifier(&self) -> Result<Option<String>> {
                (**self).pop_identifier()
            }

            fn push_back_identifier(&self, social_id: &str) -> Result<()> {
                (**self).push_back_identifier(social_id)
            }

            fn replace_pool(&self, ids: &[String]) -> Result<()> {
                (**self).replace_pool(ids)
            }

            fn pool_len(&self) -> Result<usize> {
                (**self).pool_len()
            }

            fn try_lock(&self, user_handle: &str, token: &str, ttl: Duration) -> Result<bool> {
                (**self).try_lock(user_handle, token, ttl)
            }

            fn unlock(&self, user_handle: &str, token: &str) -> Result<()> {
                (**self).unlock(user_handle, token)
            }

            fn ping(&self) -> Result<()> {
                (**self).ping()
            }
        }
    )*};
}

forward_store!(&S, Arc<S>, Box<S>);
