use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber used by the setup binary.
///
/// Logs go to stderr so that stdout stays usable for `--dry-run` and
/// `show` output. `RUST_LOG` wins when set; otherwise the level is
/// `debug` when `verbose` is true and `warn` when it is not.
pub fn init(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_level(true)
        .compact();

    let default_level = if verbose { "debug" } else { "warn" };
    let filter_layer =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
