use crate::{Result, SocialStore};
use core::time::Duration;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::Instant;

/// An in-process [`SocialStore`].
///
/// Every operation runs under one [`parking_lot::Mutex`], so each call is
/// atomic with respect to every other call. Locks expire after their TTL the
/// same way the Redis backend's keys do.
///
/// Useful for tests and for single-process deployments where the pool and
/// bindings need not survive a restart.
///
/// # Example
/// ```
/// use socialid::{MemoryStore, SocialStore};
///
/// let store = MemoryStore::new();
/// store.replace_pool(&["A".to_string(), "B".to_string()]).unwrap();
/// assert_eq!(store.pop_identifier().unwrap().as_deref(), Some("A"));
/// assert_eq!(store.pool_len().unwrap(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    pool: VecDeque<String>,
    bindings: HashMap<String, String>,
    locks: HashMap<String, Lease>,
}

#[derive(Debug)]
struct Lease {
    token: String,
    expires_at: Instant,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bindings recorded so far.
    pub fn binding_count(&self) -> usize {
        self.state.lock().bindings.len()
    }

    /// Snapshot of the unissued pool, in pop order.
    pub fn pool_snapshot(&self) -> Vec<String> {
        self.state.lock().pool.iter().cloned().collect()
    }
}

impl SocialStore for MemoryStore {
    fn binding(&self, user_handle: &str) -> Result<Option<String>> {
        Ok(self.state.lock().bindings.get(user_handle).cloned())
    }

    fn bind(&self, user_handle: &str, social_id: &str) -> Result<String> {
        Ok(self
            .state
            .lock()
            .bindings
            .entry(user_handle.to_owned())
            .or_insert_with(|| social_id.to_owned())
            .clone())
    }

    fn pop_identifier(&self) -> Result<Option<String>> {
        Ok(self.state.lock().pool.pop_front())
    }

    fn push_back_identifier(&self, social_id: &str) -> Result<()> {
        self.state.lock().pool.push_front(social_id.to_owned());
        Ok(())
    }

    fn replace_pool(&self, ids: &[String]) -> Result<()> {
        let mut state = self.state.lock();
        state.pool.clear();
        state.pool.extend(ids.iter().cloned());
        Ok(())
    }

    fn pool_len(&self) -> Result<usize> {
        Ok(self.state.lock().pool.len())
    }

    fn try_lock(&self, user_handle: &str, token: &str, ttl: Duration) -> Result<bool> {
        let now = Instant::now();
        let mut state = self.state.lock();
        if state
            .locks
            .get(user_handle)
            .is_some_and(|lease| lease.expires_at > now)
        {
            return Ok(false);
        }
        state.locks.insert(
            user_handle.to_owned(),
            Lease {
                token: token.to_owned(),
                expires_at: now + ttl,
            },
        );
        Ok(true)
    }

    fn unlock(&self, user_handle: &str, token: &str) -> Result<()> {
        let mut state = self.state.lock();
        if state
            .locks
            .get(user_handle)
            .is_some_and(|lease| lease.token == token)
        {
            state.locks.remove(user_handle);
        }
        Ok(())
    }

    fn ping(&self) -> Result<()> {
        Ok(())
    }
}
