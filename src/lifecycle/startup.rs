//! Startup orchestration.
//!
//! # Design Decisions
//! - Logging comes up first so later failures are visible
//! - A metrics exporter that fails to start is logged, not fatal

use std::net::SocketAddr;

use crate::config::{DialerConfig, ObservabilityConfig};
use crate::net::Dialer;
use crate::observability::{logging, metrics};

/// Bring up logging and, when enabled, the metrics exporter.
///
/// `level_override` (from the command line) wins over the configured level.
pub fn init_observability(config: &ObservabilityConfig, level_override: Option<&str>) {
    logging::init(level_override.unwrap_or(&config.log_level));

    if !config.metrics_enabled {
        return;
    }

    match config.metrics_address.parse::<SocketAddr>() {
        Ok(addr) => {
            if let Err(e) = metrics::init_metrics(addr) {
                tracing::error!(error = %e, "Failed to start metrics exporter");
            }
        }
        Err(_) => {
            tracing::error!(
                metrics_address = %config.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }
}

/// TCP dialer configured from the `[dial]` table.
pub fn build_dialer(config: &DialerConfig) -> Dialer {
    let dialer = Dialer::tcp().with_config(&config.dial);
    tracing::info!(
        timeout_secs = config.dial.timeout_secs,
        strategy = ?config.dial.strategy,
        targets = config.probe.targets.len(),
        "Configuration loaded"
    );
    dialer
}
