use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

/// Install the process-wide subscriber, writing to stderr.
///
/// `RUST_LOG` wins over `default_level`.
pub fn init(default_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {e}"))
}
