//! Diagnostic logging
//!
//! Library code logs through `tracing`. The binary installs a subscriber that
//! writes to stderr so report output on stdout stays clean.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber
///
/// `RUST_LOG` wins when set. Otherwise only warnings and errors are shown, or
/// debug output from pew itself with `verbose`.
pub fn init(verbose: bool) {
    let default_directive = if verbose { "pew=debug,info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
