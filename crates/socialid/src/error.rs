//! Error types for Social ID allocation.
//!
//! ## Error Cases
//! - `StoreUnavailable`: the backing store could not be reached or rejected a
//!   command. Surfaced as-is; nothing is retried.
//! - `PoolExhausted`: every identifier has been issued. Terminal for the
//!   registration attempt.
//! - `LockTimeout`: another caller held the per-user lock for longer than the
//!   configured wait.
//! - `InvalidUserHandle`, `InvalidWordList`, `DuplicateIdentifier`: rejected
//!   input.

use core::time::Duration;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Boxed source error from a store backend.
pub type StoreError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// All errors that allocation and pool generation can produce.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The store could not be reached, or a command against it failed.
    #[error("store unavailable: {source}")]
    StoreUnavailable {
        #[source]
        source: StoreError,
    },

    /// No identifiers remain in the pool.
    #[error("no Social IDs left in the pool")]
    PoolExhausted,

    /// The per-user allocation lock could not be acquired in time.
    #[error("timed out after {waited:?} waiting for the allocation lock of `{user_handle}`")]
    LockTimeout {
        user_handle: String,
        waited: Duration,
    },

    /// User handles must be non-empty.
    #[error("user handle must not be empty")]
    InvalidUserHandle,

    /// A word list was empty or contained an unusable word.
    #[error("invalid word list: {reason}")]
    InvalidWordList { reason: String },

    /// Two word triples rendered to the same identifier.
    #[error("identifier `{identifier}` is produced by more than one word triple")]
    DuplicateIdentifier { identifier: String },
}

impl Error {
    /// Wraps a backend failure as [`Error::StoreUnavailable`].
    pub fn store(source: impl Into<StoreError>) -> Self {
        Self::StoreUnavailable {
            source: source.into(),
        }
    }

    /// Returns `true` for [`Error::PoolExhausted`], the "no capacity left"
    /// condition callers show to end users.
    pub const fn is_pool_exhausted(&self) -> bool {
        matches!(self, Self::PoolExhausted)
    }
}

#[cfg_attr(docsrs, doc(cfg(feature = "redis")))]
#[cfg(feature = "redis")]
impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Self::store(err)
    }
}
