//! Tracing setup for binaries and tests.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the application. `init_tracing` is the one-liner for callers that don't
//! have their own.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `RUST_LOG` (default `mail_api_route=info`).
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mail_api_route=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
