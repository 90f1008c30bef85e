//! # Logging Initialization
//!
//! The crate emits `tracing` events for guard installation, intercepted exits, guard
//! disposal and resolved verdicts. Nothing is printed unless a subscriber is
//! installed; [`init_logging`] installs one that writes to stderr.
//!
//! Verbosity follows `RUST_LOG` when it is set, and otherwise defaults to the given
//! level for everything with `exit_assert=debug` on top. Initialization runs at most
//! once per process, and silently yields to a subscriber installed by someone else.

use anyhow::Result;
use std::{io::stderr, sync::Once};
use tracing_subscriber::{EnvFilter, fmt::layer, prelude::*};

static INIT: Once = Once::new();

/// Initialize verbose logging for tests.
pub fn init_test_logging() {
    if let Err(e) = init_logging("trace") {
        eprintln!("Failed to initialize test logging: {e}");
    }
}

/// Installs a global stderr subscriber filtered at `log_level`.
///
/// # Errors
///
/// Returns an error if `log_level` is not a valid filter directive.
pub fn init_logging(log_level: &str) -> Result<()> {
    let default_filter = format!("{log_level},exit_assert=debug");
    // Validate eagerly so a bad level is reported rather than swallowed by the Once.
    EnvFilter::try_new(&default_filter)?;

    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&default_filter));

        let installed = tracing_subscriber::registry()
            .with(env_filter)
            .with(layer().with_writer(stderr).with_ansi(true))
            .try_init();

        if installed.is_err() {
            tracing::debug!("A global tracing subscriber was already installed");
        }
    });

    Ok(())
}
