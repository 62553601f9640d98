use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

/// Level used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info";

/// Install the fmt subscriber. `RUST_LOG` wins; `verbose` raises the default to debug.
pub fn init(verbose: bool) -> Result<()> {
    let default = if verbose { "debug" } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .try_init();
    Ok(())
}
