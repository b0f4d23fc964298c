use crate::{KeySpace, Result, SocialStore};
use core::time::Duration;
use parking_lot::Mutex;
use redis::{Client, Connection, ConnectionLike, RedisResult, Script};

/// Releases a lock only if it still carries the caller's token.
const UNLOCK_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#;

/// Sets a binding only if none exists and returns the one in place.
const BIND_SCRIPT: &str = r#"
local current = redis.call("GET", KEYS[1])
if current then
    return current
end
redis.call("SET", KEYS[1], ARGV[1])
return ARGV[1]
"#;

/// Identifiers per `LPUSH` when loading the pool.
const PUSH_CHUNK: usize = 10_000;

/// A [`SocialStore`] backed by Redis.
///
/// The pool is a list under [`KeySpace::pool`], popped with `RPOP`; bindings
/// are plain string keys with no expiry, written set-if-absent by a script;
/// per-user locks are `SET NX PX` keys released by a compare-and-delete
/// script.
///
/// Connections are reused: each operation checks one out of an idle list
/// (opening a new one when the list is empty) and returns it afterwards, up
/// to [`Self::DEFAULT_MAX_IDLE`] kept. A connection that saw an error is
/// dropped. The configured timeout bounds connecting, reading and writing.
///
/// A timed-out `RPOP` may still have removed an identifier server-side; that
/// identifier is lost, never issued twice.
pub struct RedisStore {
    client: Client,
    keys: KeySpace,
    timeout: Duration,
    max_idle: usize,
    idle: Mutex<Vec<Connection>>,
    unlock_script: Script,
    bind_script: Script,
}

impl RedisStore {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);
    pub const DEFAULT_MAX_IDLE: usize = 8;

    /// Creates a store for `url` (e.g. `redis://localhost:6379/0`).
    ///
    /// Only the URL is validated here; nothing is sent until the first
    /// operation. Use [`SocialStore::ping`] to check connectivity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreUnavailable`] if the URL cannot be parsed.
    ///
    /// [`Error::StoreUnavailable`]: crate::Error::StoreUnavailable
    pub fn open(url: &str) -> Result<Self> {
        Ok(Self {
            client: Client::open(url)?,
            keys: KeySpace::default(),
            timeout: Self::DEFAULT_TIMEOUT,
            max_idle: Self::DEFAULT_MAX_IDLE,
            idle: Mutex::new(Vec::new()),
            unlock_script: Script::new(UNLOCK_SCRIPT),
            bind_script: Script::new(BIND_SCRIPT),
        })
    }

    #[must_use]
    pub fn with_keys(mut self, keys: KeySpace) -> Self {
        self.keys = keys;
        self
    }

    /// Sets the connect, read and write timeout. Idle connections opened
    /// under the previous timeout are closed.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.idle.get_mut().clear();
        self
    }

    /// Caps how many idle connections are kept for reuse. `0` opens a
    /// connection per operation.
    #[must_use]
    pub fn with_max_idle(mut self, max_idle: usize) -> Self {
        self.max_idle = max_idle;
        self.idle.get_mut().truncate(max_idle);
        self
    }

    pub fn keys(&self) -> &KeySpace {
        &self.keys
    }

    fn connect(&self) -> Result<Connection> {
        let con = self.client.get_connection_with_timeout(self.timeout)?;
        con.set_read_timeout(Some(self.timeout))?;
        con.set_write_timeout(Some(self.timeout))?;
        Ok(con)
    }

    /// Runs `op` on a pooled connection.
    fn with_connection<T>(&self, op: impl FnOnce(&mut Connection) -> RedisResult<T>) -> Result<T> {
        let pooled = self.idle.lock().pop().filter(Connection::is_open);
        let mut con = match pooled {
            Some(con) => con,
            None => self.connect()?,
        };

        let out = op(&mut con)?;

        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push(con);
        }
        Ok(out)
    }
}

impl SocialStore for RedisStore {
    fn binding(&self, user_handle: &str) -> Result<Option<String>> {
        self.with_connection(|con| redis::cmd("GET").arg(self.keys.binding(user_handle)).query(con))
    }

    fn bind(&self, user_handle: &str, social_id: &str) -> Result<String> {
        self.with_connection(|con| {
            self.bind_script
                .key(self.keys.binding(user_handle))
                .arg(social_id)
                .invoke(con)
        })
    }

    fn pop_identifier(&self) -> Result<Option<String>> {
        self.with_connection(|con| redis::cmd("RPOP").arg(self.keys.pool()).query(con))
    }

    fn push_back_identifier(&self, social_id: &str) -> Result<()> {
        self.with_connection(|con| {
            redis::cmd("RPUSH")
                .arg(self.keys.pool())
                .arg(social_id)
                .query(con)
        })
    }

    /// `DEL` plus chunked `LPUSH` inside one `MULTI`/`EXEC`, so readers never
    /// observe a half-loaded pool.
    fn replace_pool(&self, ids: &[String]) -> Result<()> {
        let pool = self.keys.pool();
        let mut pipe = redis::pipe();
        pipe.atomic().cmd("DEL").arg(&pool).ignore();
        // LPUSH prepends, so chunks pushed in order keep ids[0] at the RPOP end.
        for chunk in ids.chunks(PUSH_CHUNK) {
            pipe.cmd("LPUSH").arg(&pool).arg(chunk).ignore();
        }

        self.with_connection(|con| pipe.query(con))
    }

    fn pool_len(&self) -> Result<usize> {
        self.with_connection(|con| redis::cmd("LLEN").arg(self.keys.pool()).query(con))
    }

    fn try_lock(&self, user_handle: &str, token: &str, ttl: Duration) -> Result<bool> {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);
        let reply: Option<String> = self.with_connection(|con| {
            redis::cmd("SET")
                .arg(self.keys.lock(user_handle))
                .arg(token)
                .arg("NX")
                .arg("PX")
                .arg(ttl_ms)
                .query(con)
        })?;
        Ok(reply.is_some())
    }

    fn unlock(&self, user_handle: &str, token: &str) -> Result<()> {
        self.with_connection(|con| {
            self.unlock_script
                .key(self.keys.lock(user_handle))
                .arg(token)
                .invoke::<i64>(con)
        })?;
        Ok(())
    }

    fn ping(&self) -> Result<()> {
        self.with_connection(|con| redis::cmd("PING").query::<String>(con))?;
        Ok(())
    }
}

/// These talk to a live server: `REDIS_URL=redis://localhost:6379/15 cargo
/// test --features redis -- --ignored`. Each test uses its own key prefix.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Allocator, Error, PoolGenerator, WordLists};
    use std::collections::HashSet;
    use std::thread::scope;

    fn store(prefix: &str) -> RedisStore {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/15".into());
        let store = RedisStore::open(&url)
            .unwrap()
            .with_keys(KeySpace::new(format!("socialid-test:{prefix}:{}", std::process::id())));
        store.ping().unwrap();
        store
    }

    #[test]
    #[ignore = "requires a running Redis server"]
    fn pool_pops_in_load_order() {
        let store = store("order");
        let ids: Vec<String> = (0..25_000).map(|i| format!("Id{i}")).collect();
        store.replace_pool(&ids).unwrap();

        assert_eq!(store.pool_len().unwrap(), ids.len());
        assert_eq!(store.pop_identifier().unwrap().as_deref(), Some("Id0"));
        assert_eq!(store.pop_identifier().unwrap().as_deref(), Some("Id1"));
        store.push_back_identifier("Id1").unwrap();
        assert_eq!(store.pop_identifier().unwrap().as_deref(), Some("Id1"));

        store.replace_pool(&[]).unwrap();
        assert_eq!(store.pop_identifier().unwrap(), None);
    }

    #[test]
    #[ignore = "requires a running Redis server"]
    fn bind_keeps_the_first_binding() {
        let store = store("bind");
        assert_eq!(store.bind("u", "A").unwrap(), "A");
        assert_eq!(store.bind("u", "B").unwrap(), "A");
        assert_eq!(store.binding("u").unwrap().as_deref(), Some("A"));
    }

    #[test]
    #[ignore = "requires a running Redis server"]
    fn connections_are_reused() {
        let store = store("reuse");
        for _ in 0..10 {
            store.pool_len().unwrap();
        }
        assert_eq!(store.idle.lock().len(), 1);

        let store = store.with_max_idle(0);
        store.pool_len().unwrap();
        assert!(store.idle.lock().is_empty());
    }

    #[test]
    #[ignore = "requires a running Redis server"]
    fn lock_requires_matching_token() {
        let store = store("lock");
        let ttl = Duration::from_secs(5);
        assert!(store.try_lock("u", "t1", ttl).unwrap());
        assert!(!store.try_lock("u", "t2", ttl).unwrap());
        store.unlock("u", "t2").unwrap();
        assert!(!store.try_lock("u", "t2", ttl).unwrap());
        store.unlock("u", "t1").unwrap();
        assert!(store.try_lock("u", "t2", ttl).unwrap());
        store.unlock("u", "t2").unwrap();
    }

    #[test]
    #[ignore = "requires a running Redis server"]
    fn concurrent_assignment_end_to_end() {
        let store = store("assign");
        let words = WordLists::new(["brave", "calm"], ["crimson", "teal"], ["mango", "kiwi"]).unwrap();
        assert_eq!(PoolGenerator::new(&store, &words).regenerate_pool().unwrap(), 8);

        let issued: Vec<String> = scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let store = &store;
                    s.spawn(move || {
                        Allocator::new(store)
                            .assign_social_id(&format!("user-{i}"))
                            .unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(issued.iter().collect::<HashSet<_>>().len(), 8);
        let err = Allocator::new(&store).assign_social_id("user-8").unwrap_err();
        assert!(matches!(err, Error::PoolExhausted));
        assert_eq!(
            Allocator::new(&store).assign_social_id("user-3").unwrap(),
            issued[3]
        );
    }
}
