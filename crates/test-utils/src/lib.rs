//! Shared helpers for the blocktask integration tests.

pub mod builders;
pub mod harness;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Upper bound for any async test driving the frame loop.
pub const TEST_DEADLINE: Duration = Duration::from_secs(5);

/// Initialise tracing for tests.
///
/// Output goes through the test writer, so it only shows for failing tests
/// (or with `--nocapture`). Directives come from `BLOCKTASK_LOG`, e.g.
/// `BLOCKTASK_LOG=blocktask::sched=trace cargo test`; the default keeps the
/// scheduler at `debug` and everything else quiet.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("BLOCKTASK_LOG")
            .unwrap_or_else(|_| EnvFilter::new("blocktask=debug,warn"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .with_target(true)
            .init();
    });
}

/// Await `f`, failing the test if it outlives [`TEST_DEADLINE`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_DEADLINE, f).await {
        Ok(value) => value,
        Err(_) => panic!("runtime did not finish within {TEST_DEADLINE:?}"),
    }
}
