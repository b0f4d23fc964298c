use crate::{IdentifierSpace, Result, ShuffleSource, SocialStore, ThreadRandom, WordLists};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Materializes the identifier space into a store's pool.
///
/// Run [`Self::regenerate_pool`] once at deploy time, before any user is
/// assigned. It replaces the whole unissued pool, so running it again while
/// allocations are live can reload identifiers that are already bound. That
/// is an operational rule; nothing here enforces it.
///
/// ## See Also
/// - [`Allocator`]
///
/// [`Allocator`]: crate::Allocator
pub struct PoolGenerator<S, R = ThreadRandom>
where
    S: SocialStore,
    R: ShuffleSource,
{
    store: S,
    space: IdentifierSpace,
    shuffle: R,
}

impl<S> PoolGenerator<S>
where
    S: SocialStore,
{
    /// Creates a generator that shuffles with the thread-local RNG.
    ///
    /// # Example
    /// ```
    /// use socialid::{MemoryStore, PoolGenerator, SocialStore, WordLists};
    ///
    /// let store = MemoryStore::new();
    /// let words = WordLists::new(["brave"], ["crimson"], ["mango", "kiwi"]).unwrap();
    /// let loaded = PoolGenerator::new(&store, &words).regenerate_pool().unwrap();
    /// assert_eq!(loaded, 2);
    /// assert_eq!(store.pool_len().unwrap(), 2);
    /// ```
    pub fn new(store: S, words: &WordLists) -> Self {
        Self::with_shuffle(store, words, ThreadRandom)
    }
}

impl<S, R> PoolGenerator<S, R>
where
    S: SocialStore,
    R: ShuffleSource,
{
    pub fn with_shuffle(store: S, words: &WordLists, shuffle: R) -> Self {
        Self {
            store,
            space: IdentifierSpace::new(words),
            shuffle,
        }
    }

    pub fn space(&self) -> &IdentifierSpace {
        &self.space
    }

    /// Enumerates and shuffles the whole space without touching the store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateIdentifier`] if the word lists render the
    /// same identifier twice.
    ///
    /// [`Error::DuplicateIdentifier`]: crate::Error::DuplicateIdentifier
    pub fn generate(&self) -> Result<Vec<String>> {
        let mut ids = self.space.enumerate()?;
        self.shuffle.shuffle(&mut ids);
        Ok(ids)
    }

    /// Replaces the pool with a fresh shuffle of the full space and returns
    /// how many identifiers were loaded. Bindings are not touched.
    ///
    /// # Errors
    ///
    /// - [`Error::DuplicateIdentifier`] from [`Self::generate`]; the store is
    ///   left untouched.
    /// - [`Error::StoreUnavailable`] if the store write fails. Depending on
    ///   the backend the pool may then be partially loaded and this must be
    ///   re-run before serving traffic.
    ///
    /// [`Error::DuplicateIdentifier`]: crate::Error::DuplicateIdentifier
    /// [`Error::StoreUnavailable`]: crate::Error::StoreUnavailable
    #[cfg_attr(feature = "tracing", instrument(level = "info", skip(self), err))]
    pub fn regenerate_pool(&self) -> Result<usize> {
        let ids = self.generate()?;
        self.store.replace_pool(&ids)?;

        #[cfg(feature = "tracing")]
        tracing::info!(count = ids.len(), "loaded Social ID pool");
        Ok(ids.len())
    }
}
