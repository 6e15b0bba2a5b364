use std::sync::Once;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

const DEFAULT_FILTER: &str = "datacollect_acceptance=debug,datacollect_sdk=debug";

/// Install the test log subscriber. Safe to call from every test.
///
/// `RUST_LOG` overrides the default filter. Output goes through the test
/// writer so it is captured per test unless `--nocapture` is given.
pub fn init() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // Another subscriber may already be installed by the test binary.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_test_writer().with_target(true))
            .try_init();
    });
}
