// crates/test-utils/src/lib.rs

//! Shared helpers for reloader's integration tests: scripted launchers,
//! temporary source trees with controllable mtimes, and log capture.

pub mod fake_launcher;
pub mod source_tree;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use reloader::logging::LOG_ENV_VAR;
use tracing_subscriber::{EnvFilter, fmt};

/// Upper bound for any single async test step.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

static INIT: Once = Once::new();

/// Capture `tracing` output in the test harness.
///
/// Directives come from `RELOADER_LOG` like in the binary, then `RUST_LOG`,
/// then `info`. Output is only shown for failing tests unless the harness
/// runs with `--nocapture`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("info"));

        // Another subscriber may already be installed by the test binary.
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Await `f`, failing the test if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(TEST_TIMEOUT, f)
        .await
        .unwrap_or_else(|_| panic!("test step did not finish within {TEST_TIMEOUT:?}"))
}
