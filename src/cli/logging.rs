// logging.rs - Tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter
pub const LOG_ENV: &str = "TIGER_LOG";

/// Initialize the tracing subscriber on stderr so stdout only carries rates.
///
/// Respects `TIGER_LOG`; defaults to `info`, or `warn` when `quiet` is set.
pub fn init_logging(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
