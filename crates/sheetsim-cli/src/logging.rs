//! Logging setup using `tracing-subscriber`.
//!
//! `RUST_LOG` takes precedence; otherwise `--verbose` selects `debug` and the
//! default is `warn`. Logs go to stderr so stdout stays clean for output.

use std::io;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .try_init()?;
    Ok(())
}
