use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "info";

/// Local log output for the CLI.
///
/// Logs go to stderr so that the response body on stdout stays clean for piping.
pub struct Telemetry {
    filter: EnvFilter,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl Telemetry {
    /// Reads the filter from `RUST_LOG`, falling back to `info`.
    pub fn new() -> Self {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        Self { filter }
    }

    /// Installs the global subscriber.
    pub fn register(self) {
        tracing_subscriber::registry()
            .with(self.filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
