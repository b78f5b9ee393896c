//! Logging configuration using tracing

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "TABSHELL_LOG";

/// Initialize the logging subsystem.
///
/// Logs go to stderr so stdout stays free for replay output.
/// Log level is controlled by the `TABSHELL_LOG` environment variable.
///
/// # Examples
/// ```bash
/// TABSHELL_LOG=debug tabshell-replay --input actions.ndjson
/// TABSHELL_LOG=tabshell::reducer=trace tabshell-replay
/// ```
pub fn init() {
    // Default to info, allow override via TABSHELL_LOG
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("tabshell=info,warn"));

    // A second init (tests, embedding hosts) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .try_init();
}
