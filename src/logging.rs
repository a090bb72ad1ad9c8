//! Diagnostic logging setup.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Per-target filter, e.g. `STOW_LOG=stow_scanner::scanner=debug`.
pub const LOG_ENV: &str = "STOW_LOG";

static INIT: Once = Once::new();

/// Default filter directive for a `-v` count.
#[must_use]
pub const fn level_for(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber on stderr. `STOW_LOG` wins over `-v`.
/// Calling it again is a no-op.
pub fn init(verbose: u8, quiet: bool) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(level_for(verbose, quiet)));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(verbose > 1),
            )
            .with(filter)
            .init();
    });
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
