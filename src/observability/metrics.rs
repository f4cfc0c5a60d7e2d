//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dial_attempts_total` (counter): dials by outcome
//! - `dial_duration_seconds` (histogram): caller-observed dial latency by outcome
//! - `dial_late_connections_discarded_total` (counter): connections closed after the deadline
//! - `dial_workers_in_flight` (gauge): connector tasks still running
//!
//! # Design Decisions
//! - Without an installed recorder every call is a no-op
//! - The in-flight gauge keeps counting connectors the coordinator has
//!   already given up on, so hung resolvers stay visible

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::net::attempt::AttemptOutcome;

/// Install the Prometheus recorder with an HTTP scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a finished dial.
pub fn record_dial(outcome: AttemptOutcome, elapsed: Duration) {
    counter!("dial_attempts_total", "outcome" => outcome.as_str()).increment(1);
    histogram!("dial_duration_seconds", "outcome" => outcome.as_str()).record(elapsed.as_secs_f64());
}

/// Record a connection closed because it arrived after the deadline.
pub fn record_late_discard() {
    counter!("dial_late_connections_discarded_total").increment(1);
}

/// Holds the in-flight gauge up for the lifetime of a connector task.
#[derive(Debug)]
pub struct WorkerGuard(());

impl WorkerGuard {
    pub fn new() -> Self {
        gauge!("dial_workers_in_flight").increment(1.0);
        Self(())
    }
}

impl Default for WorkerGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        gauge!("dial_workers_in_flight").decrement(1.0);
    }
}

/// Value of an unlabelled sample in Prometheus text output.
#[cfg(test)]
pub(crate) fn sample(rendered: &str, name: &str) -> Option<f64> {
    rendered.lines().find_map(|line| {
        let (metric, value) = line.split_once(' ')?;
        if metric == name {
            value.trim().parse().ok()
        } else {
            None
        }
    })
}
