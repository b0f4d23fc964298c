use anyhow::bail;
use clap::{Parser, Subcommand};
use core::time::Duration;
use socialid::{AllocatorConfig, KeySpace};

/// Runtime configuration for the `socialid` binary.
///
/// Every option can come from a flag, an environment variable, or a `.env`
/// file in the working directory, in that order of precedence.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "socialid",
    version,
    about = "Seed the Social ID pool and assign Social IDs"
)]
pub struct CliArgs {
    /// Redis connection URL, e.g. `redis://localhost:6379/0`.
    ///
    /// Environment variable: `REDIS_URL`
    #[arg(long, env = "REDIS_URL")]
    pub redis_url: String,

    /// Namespace for every key this tool reads or writes.
    ///
    /// Environment variable: `KEY_PREFIX`
    #[arg(long, env = "KEY_PREFIX", default_value_t = String::from(KeySpace::DEFAULT_PREFIX))]
    pub key_prefix: String,

    /// Connect, read and write timeout for each Redis round-trip.
    ///
    /// Environment variable: `CONNECT_TIMEOUT_MS`
    #[arg(long, env = "CONNECT_TIMEOUT_MS", default_value_t = 2_000)]
    pub connect_timeout_ms: u64,

    /// Lifetime of a per-user allocation lock whose holder never releases it.
    ///
    /// Environment variable: `LOCK_TTL_MS`
    #[arg(long, env = "LOCK_TTL_MS", default_value_t = 5_000)]
    pub lock_ttl_ms: u64,

    /// Pause between attempts to take a contended per-user lock.
    ///
    /// Environment variable: `LOCK_RETRY_MS`
    #[arg(long, env = "LOCK_RETRY_MS", default_value_t = 10)]
    pub lock_retry_ms: u64,

    /// How long to wait for a contended per-user lock before giving up.
    ///
    /// Environment variable: `LOCK_WAIT_MS`
    #[arg(long, env = "LOCK_WAIT_MS", default_value_t = 2_000)]
    pub lock_wait_ms: u64,

    /// Return a popped Social ID to the pool when writing the binding fails.
    ///
    /// Unsafe if a failed write may still have been applied.
    ///
    /// Environment variable: `PUSH_BACK_ON_FAILURE`
    #[arg(long, env = "PUSH_BACK_ON_FAILURE", default_value_t = false)]
    pub push_back_on_failure: bool,

    /// Print results as JSON.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the pool with a fresh shuffle of every Social ID. Never run
    /// while registrations are live.
    Regenerate,
    /// Assign (or return the existing) Social ID for each user handle.
    Assign {
        #[arg(required = true)]
        user_handles: Vec<String>,
    },
    /// Show a user's Social ID without assigning one.
    Lookup { user_handle: String },
    /// Show the identifier space size and how many Social IDs remain.
    Stats,
    /// Check that Redis is reachable.
    Ping,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub redis_url: String,
    pub keys: KeySpace,
    pub timeout: Duration,
    pub allocator: AllocatorConfig,
    pub json: bool,
    pub command: Command,
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.redis_url.trim().is_empty() {
            bail!("REDIS_URL must not be empty");
        }

        if args.key_prefix.is_empty() || args.key_prefix.chars().any(char::is_whitespace) {
            bail!(
                "KEY_PREFIX must be non-empty and contain no whitespace (got {:?})",
                args.key_prefix
            );
        }

        if args.connect_timeout_ms == 0 {
            bail!("CONNECT_TIMEOUT_MS must be greater than 0");
        }

        if args.lock_ttl_ms == 0 {
            bail!("LOCK_TTL_MS must be greater than 0");
        }

        if args.lock_retry_ms == 0 {
            bail!("LOCK_RETRY_MS must be greater than 0");
        }

        if args.lock_retry_ms > args.lock_wait_ms {
            bail!(
                "LOCK_RETRY_MS ({}) exceeds LOCK_WAIT_MS ({})",
                args.lock_retry_ms,
                args.lock_wait_ms
            );
        }

        Ok(Self {
            redis_url: args.redis_url,
            keys: KeySpace::new(args.key_prefix),
            timeout: Duration::from_millis(args.connect_timeout_ms),
            allocator: AllocatorConfig {
                lock_ttl: Duration::from_millis(args.lock_ttl_ms),
                lock_retry: Duration::from_millis(args.lock_retry_ms),
                lock_wait: Duration::from_millis(args.lock_wait_ms),
                push_back_on_failure: args.push_back_on_failure,
            },
            json: args.json,
            command: args.command,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> anyhow::Result<Config> {
        let args = ["socialid", "--redis-url", "redis://localhost:6379/0"]
            .iter()
            .chain(extra);
        Config::try_from(CliArgs::try_parse_from(args)?)
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        CliArgs::command().debug_assert();
    }

    #[test]
    fn explicit_flags_are_applied() {
        let config = parse(&[
            "--key-prefix",
            "staging",
            "--lock-ttl-ms",
            "9000",
            "--lock-retry-ms",
            "25",
            "--lock-wait-ms",
            "500",
            "--push-back-on-failure",
            "assign",
            "alice",
            "bob",
            "--json",
        ])
        .unwrap();

        assert_eq!(config.keys.pool(), "staging:available_ids");
        assert_eq!(config.allocator.lock_ttl, Duration::from_secs(9));
        assert_eq!(config.allocator.lock_retry, Duration::from_millis(25));
        assert_eq!(config.allocator.lock_wait, Duration::from_millis(500));
        assert!(config.allocator.push_back_on_failure);
        assert!(config.json);
        assert_eq!(
            config.command,
            Command::Assign {
                user_handles: vec!["alice".into(), "bob".into()]
            }
        );
    }

    #[test]
    fn rejects_retry_longer_than_wait() {
        let err = parse(&["--lock-retry-ms", "50", "--lock-wait-ms", "10", "ping"]).unwrap_err();
        assert!(err.to_string().contains("LOCK_RETRY_MS"));
    }

    #[test]
    fn rejects_zero_lock_ttl() {
        assert!(parse(&["--lock-ttl-ms", "0", "stats"]).is_err());
    }

    #[test]
    fn rejects_blank_prefix() {
        assert!(parse(&["--key-prefix", "a b", "stats"]).is_err());
    }

    #[test]
    fn assign_requires_a_handle() {
        assert!(parse(&["assign"]).is_err());
    }
}
