//! Logging bootstrap for the command-line tool.
//!
//! Log records go to stderr so stdout carries only the report.

use std::io::{self, IsTerminal};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `--log-level` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Builds the log filter.
///
/// An explicit directive wins over `RUST_LOG`; an unparsable directive falls
/// back to [`DEFAULT_LOG_FILTER`].
pub fn make_filter(directive: Option<&str>) -> EnvFilter {
    match directive {
        Some(directive) => {
            EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
        }
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    }
}

/// Initializes logging. Call once at startup; later calls are ignored.
pub fn init_logging(directive: Option<&str>) {
    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(make_filter(directive))
        .with(stderr_layer)
        .try_init();
}
