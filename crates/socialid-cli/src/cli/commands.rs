//! Subcommand handlers. Each one runs a single operation against the
//! configured store and prints its result to stdout.

use crate::cli::config::{Command, Config};
use anyhow::Context;
use serde::Serialize;
use socialid::{
    Allocator, AssignStatus, IdentifierSpace, PoolGenerator, RedisStore, SocialStore, ThreadRandom,
    WordLists,
};

#[derive(Serialize)]
struct Regenerated {
    loaded: usize,
}

#[derive(Serialize)]
struct Assigned<'a> {
    user_handle: &'a str,
    #[serde(flatten)]
    status: AssignStatus,
}

#[derive(Serialize)]
struct Lookup<'a> {
    user_handle: &'a str,
    social_id: Option<String>,
}

#[derive(Serialize)]
struct Stats<'a> {
    key_prefix: &'a str,
    space_size: usize,
    remaining: usize,
}

pub fn run(config: &Config) -> anyhow::Result<()> {
    let store = RedisStore::open(&config.redis_url)
        .context("invalid REDIS_URL")?
        .with_keys(config.keys.clone())
        .with_timeout(config.timeout);

    match &config.command {
        Command::Regenerate => regenerate(&store, config),
        Command::Assign { user_handles } => assign(&store, config, user_handles),
        Command::Lookup { user_handle } => lookup(&store, config, user_handle),
        Command::Stats => stats(&store, config),
        Command::Ping => ping(&store, config),
    }
}

fn regenerate(store: &RedisStore, config: &Config) -> anyhow::Result<()> {
    tracing::warn!(
        pool = %config.keys.pool(),
        "replacing the Social ID pool; allocations must not be running"
    );
    let loaded = PoolGenerator::new(store, &WordLists::default())
        .regenerate_pool()
        .context("failed to load the Social ID pool (re-run before serving traffic)")?;

    emit(config, &Regenerated { loaded }, || {
        format!("Loaded {loaded} Social IDs into '{}'", config.keys.pool())
    })
}

fn assign(store: &RedisStore, config: &Config, user_handles: &[String]) -> anyhow::Result<()> {
    let allocator = Allocator::with_config(store, config.allocator.clone(), ThreadRandom);

    for user_handle in user_handles {
        let status = allocator
            .assign(user_handle)
            .with_context(|| format!("failed to assign a Social ID to `{user_handle}`"))?;

        let line = match &status {
            AssignStatus::Issued { social_id } => format!("Assigned '{social_id}' to {user_handle}"),
            AssignStatus::Existing { social_id } => {
                format!("{user_handle} already has '{social_id}'")
            }
        };
        emit(
            config,
            &Assigned {
                user_handle,
                status,
            },
            || line,
        )?;
    }
    Ok(())
}

fn lookup(store: &RedisStore, config: &Config, user_handle: &str) -> anyhow::Result<()> {
    let social_id = Allocator::new(store)
        .lookup(user_handle)
        .with_context(|| format!("failed to look up `{user_handle}`"))?;

    let line = match &social_id {
        Some(social_id) => format!("{user_handle}: {social_id}"),
        None => format!("{user_handle} has no Social ID"),
    };
    emit(
        config,
        &Lookup {
            user_handle,
            social_id,
        },
        || line,
    )
}

fn stats(store: &RedisStore, config: &Config) -> anyhow::Result<()> {
    let space_size = IdentifierSpace::new(&WordLists::default()).len();
    let remaining = store.pool_len().context("failed to read the pool size")?;

    emit(
        config,
        &Stats {
            key_prefix: config.keys.prefix(),
            space_size,
            remaining,
        },
        || format!("{remaining} of {space_size} Social IDs remaining"),
    )
}

fn ping(store: &RedisStore, config: &Config) -> anyhow::Result<()> {
    store.ping().context("Redis connection failed")?;
    emit(config, &serde_json::json!({ "ok": true }), || {
        "Connected to Redis".to_string()
    })
}

fn emit<T: Serialize>(
    config: &Config,
    value: &T,
    human: impl FnOnce() -> String,
) -> anyhow::Result<()> {
    if config.json {
        println!("{}", serde_json::to_string(value)?);
    } else {
        println!("{}", human());
    }
    Ok(())
}
