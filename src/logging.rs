//! `tracing-subscriber` setup for the CLI.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Install a compact stderr subscriber.
///
/// With no `-v`/`-q` flag, `RUST_LOG` wins when set; otherwise `level` applies.
pub fn init_logging(level: LevelFilter, prefer_env: bool) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(env) if prefer_env => env,
        _ => EnvFilter::new(level.to_string()),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}
