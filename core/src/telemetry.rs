use serde::Serialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::TelemetryConfig;

/// Installs the global subscriber. `RUST_LOG` overrides the configured filter.
pub fn init_tracing(config: &TelemetryConfig) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationStats {
    pub total: usize,
    pub succeeded: usize,
    pub rejected: usize,
}

impl InvocationStats {
    pub fn record_success(&mut self) {
        self.total += 1;
        self.succeeded += 1;
    }

    pub fn record_rejection(&mut self) {
        self.total += 1;
        self.rejected += 1;
    }
}
