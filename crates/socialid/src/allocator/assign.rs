use crate::allocator::lock::UserLock;
use crate::{AllocatorConfig, AssignStatus, Error, Result, SocialStore, ThreadRandom, TokenSource};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Binds each user handle to exactly one Social ID from the pool.
///
/// The allocator holds no state of its own besides configuration: any number
/// of allocators, in any number of processes, may share one store.
///
/// ## Guarantees
///
/// - ✅ Unique: each identifier is issued to at most one user, because the
///   store pops atomically.
/// - ✅ Idempotent: repeated calls for a user return the first identifier and
///   never consume the pool again.
/// - ✅ Race-free per user: lookup, pop and bind run under a per-user lock
///   held in the store, so duplicate first registrations consume one entry.
///   The binding write is set-if-absent, so a holder whose lock expired
///   mid-call cannot overwrite a binding; it returns the winner instead.
/// - ✅ Concurrent across users: different handles never wait on each other.
///
/// ## Losses
///
/// Pop and bind are two store operations. A crash or timeout between them
/// leaves the popped identifier unbound and out of the pool for good. It is
/// never handed to anyone else.
///
/// ## See Also
/// - [`PoolGenerator`]
///
/// [`PoolGenerator`]: crate::PoolGenerator
pub struct Allocator<S, K = ThreadRandom>
where
    S: SocialStore,
    K: TokenSource,
{
    store: S,
    config: AllocatorConfig,
    tokens: K,
}

impl<S> Allocator<S>
where
    S: SocialStore,
{
    /// Creates an allocator with the default [`AllocatorConfig`].
    ///
    /// # Example
    /// ```
    /// use socialid::{Allocator, MemoryStore, PoolGenerator, WordLists};
    ///
    /// let store = MemoryStore::new();
    /// let words = WordLists::new(["brave"], ["crimson"], ["mango", "kiwi"]).unwrap();
    /// PoolGenerator::new(&store, &words).regenerate_pool().unwrap();
    ///
    /// let allocator = Allocator::new(&store);
    /// let alice = allocator.assign_social_id("alice").unwrap();
    /// let bob = allocator.assign_social_id("bob").unwrap();
    /// assert_ne!(alice, bob);
    /// assert_eq!(allocator.assign_social_id("alice").unwrap(), alice);
    /// assert!(allocator.assign_social_id("carol").unwrap_err().is_pool_exhausted());
    /// ```
    pub fn new(store: S) -> Self {
        Self::with_config(store, AllocatorConfig::default(), ThreadRandom)
    }
}

impl<S, K> Allocator<S, K>
where
    S: SocialStore,
    K: TokenSource,
{
    /// Creates an allocator with explicit lock tuning and token source.
    pub fn with_config(store: S, config: AllocatorConfig, tokens: K) -> Self {
        Self {
            store,
            config,
            tokens,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Returns the user's Social ID, binding one from the pool on first call.
    ///
    /// Internally calls [`Self::assign`] and discards whether the identifier
    /// was newly issued.
    ///
    /// # Errors
    ///
    /// See [`Self::assign`].
    pub fn assign_social_id(&self, user_handle: &str) -> Result<String> {
        self.assign(user_handle).map(AssignStatus::into_social_id)
    }

    /// Returns the user's Social ID, binding one from the pool on first call.
    ///
    /// 1. An existing binding is returned as [`AssignStatus::Existing`]
    ///    without locking.
    /// 2. Otherwise the per-user lock is taken and the binding re-read, since
    ///    a concurrent call for the same user may have just written it.
    /// 3. One identifier is popped; an empty pool fails with
    ///    [`Error::PoolExhausted`] and writes nothing.
    /// 4. The binding is written if still absent and [`AssignStatus::Issued`]
    ///    returned. If the lock expired and another call bound the user in
    ///    the meantime, that binding is returned as [`AssignStatus::Existing`]
    ///    and the popped identifier is pushed back or leaked per
    ///    [`AllocatorConfig::push_back_on_failure`].
    ///
    /// The lock is released on every path out of steps 2-4.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidUserHandle`] for an empty handle.
    /// - [`Error::PoolExhausted`] when no identifiers remain.
    /// - [`Error::LockTimeout`] if a concurrent call for the same user held
    ///   the lock longer than [`AllocatorConfig::lock_wait`].
    /// - [`Error::StoreUnavailable`] for any store failure. Nothing is
    ///   retried.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self), err))]
    pub fn assign(&self, user_handle: &str) -> Result<AssignStatus> {
        if user_handle.is_empty() {
            return Err(Error::InvalidUserHandle);
        }

        // Bindings are immutable once written, so a hit needs no lock.
        if let Some(social_id) = self.store.binding(user_handle)? {
            return Ok(AssignStatus::Existing { social_id });
        }

        let _lock = UserLock::acquire(
            &self.store,
            user_handle,
            self.tokens.token(),
            &self.config,
        )?;

        if let Some(social_id) = self.store.binding(user_handle)? {
            #[cfg(feature = "tracing")]
            tracing::debug!(%social_id, "bound by a concurrent call");
            return Ok(AssignStatus::Existing { social_id });
        }

        let Some(social_id) = self.store.pop_identifier()? else {
            #[cfg(feature = "tracing")]
            tracing::warn!("Social ID pool exhausted");
            return Err(Error::PoolExhausted);
        };

        let bound = match self.store.bind(user_handle, &social_id) {
            Ok(bound) => bound,
            Err(err) => return self.recover_failed_bind(user_handle, social_id, err),
        };

        if bound != social_id {
            // Our lease lapsed and a later holder bound this user first.
            #[cfg(feature = "tracing")]
            tracing::warn!(%social_id, winner = %bound, "binding already written by a concurrent call");
            self.release_unbound(&social_id);
            return Ok(AssignStatus::Existing { social_id: bound });
        }

        #[cfg(feature = "tracing")]
        tracing::info!(%social_id, "assigned Social ID");
        Ok(AssignStatus::Issued { social_id })
    }

    /// Handles a binding write that reported failure after a successful pop.
    ///
    /// The binding is read back. If it holds the popped identifier the write
    /// did land and the assignment stands; if it holds another one, that
    /// binding is returned. Otherwise the original error is returned and the
    /// popped identifier goes through [`Self::release_unbound`].
    fn recover_failed_bind(
        &self,
        user_handle: &str,
        social_id: String,
        err: Error,
    ) -> Result<AssignStatus> {
        match self.store.binding(user_handle) {
            Ok(Some(bound)) if bound == social_id => Ok(AssignStatus::Issued { social_id }),
            Ok(Some(bound)) => {
                self.release_unbound(&social_id);
                Ok(AssignStatus::Existing { social_id: bound })
            }
            _ => {
                self.release_unbound(&social_id);
                Err(err)
            }
        }
    }

    /// Disposes of a popped identifier that is not bound to anyone: pushed
    /// back when [`AllocatorConfig::push_back_on_failure`] allows it, leaked
    /// when not.
    fn release_unbound(&self, social_id: &str) {
        if !self.config.push_back_on_failure {
            #[cfg(feature = "tracing")]
            tracing::error!(social_id, "Social ID left unbound, leaked");
            return;
        }
        match self.store.push_back_identifier(social_id) {
            Ok(()) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(social_id, "returned unbound Social ID to pool");
            }
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::error!(social_id, "push-back failed, Social ID leaked: {_e}");
            }
        }
    }

    /// Returns the user's Social ID without assigning one.
    pub fn lookup(&self, user_handle: &str) -> Result<Option<String>> {
        if user_handle.is_empty() {
            return Err(Error::InvalidUserHandle);
        }
        self.store.binding(user_handle)
    }

    /// Number of identifiers still available.
    pub fn remaining(&self) -> Result<usize> {
        self.store.pool_len()
    }
}
