//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "TEXTPATCH_LOG";

/// Install the global subscriber. `verbosity` counts `-v` flags and only
/// applies when `TEXTPATCH_LOG` is unset. Repeated calls are no-ops.
pub fn init(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
