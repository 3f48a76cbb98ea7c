//! Tracing setup: fmt subscriber with an `EnvFilter` from `REGTRACK_LOG`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directive, e.g. `regtrack_core=debug`.
pub const LOG_ENV_VAR: &str = "REGTRACK_LOG";

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. Returns false if one was already set.
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
