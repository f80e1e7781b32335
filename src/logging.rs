//! Structured logging setup.
//!
//! Test binaries call `init_logging()` once per process; later calls are
//! ignored so every test can invoke it unconditionally.

use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "estimator_testkit=info";

/// Set `TESTKIT_LOG_JSON` to get one JSON object per event.
const JSON_ENV: &str = "TESTKIT_LOG_JSON";

/// Install the global `fmt` subscriber.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_logging() -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json_logging = std::env::var(JSON_ENV).is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_test_writer()
            .try_init()
            .is_ok()
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_test_writer()
            .try_init()
            .is_ok()
    }
}
