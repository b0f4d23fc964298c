//! Log output for the `socialid` binary.
//!
//! Events go to stderr so that stdout carries only command output (and stays
//! valid JSON under `--json`). Use `RUST_LOG` to configure, e.g.
//! `RUST_LOG=debug` or `RUST_LOG=socialid=trace,info`.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339()),
        )
        .try_init()?;
    Ok(())
}
