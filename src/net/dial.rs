//! Connect-with-deadline coordinator.
//!
//! # Flow (race strategy)
//! ```text
//! dial_target()
//!     → new ConnectionAttempt (still_wanted = true)
//!     → spawn watchdog + connector (detached)
//!     → wait on gate, bounded by the deadline
//!     → cancel workers, retire attempt (still_wanted = false)
//!     → connection? Ok : failure? Connect : Timeout
//! ```
//!
//! The coordinator never joins its workers. A connector stuck in the
//! resolver or in connect keeps running after the call returns and closes
//! whatever it eventually gets. If the caller drops the dial future
//! instead, the watchdog sees its cancel sender vanish and the connector's
//! stream is dropped together with the last reference to the attempt.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tracing::Instrument;

use crate::config::DialConfig;
use crate::net::attempt::{AttemptOutcome, ConnectionAttempt, Resolution};
use crate::net::connector::{self, Connect, TcpConnector};
use crate::net::error::{DialError, DialResult};
use crate::net::target::Target;
use crate::net::watchdog;
use crate::observability::metrics;
use crate::resilience::timeouts::{self, Deadline};

/// How a dialer enforces its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DialStrategy {
    /// Connector and watchdog workers race to a shared gate.
    #[default]
    Race,
    /// The runtime's own timeout wraps the connect.
    Native,
}

/// Open a TCP connection to `host:port`, giving up after `timeout_secs`.
///
/// Fails with [`DialError::Connect`] if the connect itself fails first, or
/// [`DialError::Timeout`] once the deadline passes.
pub async fn connect(host: &str, port: u16, timeout_secs: u64) -> DialResult<TcpStream> {
    Dialer::tcp()
        .dial_with_deadline(host, port, Deadline::from_secs(timeout_secs))
        .await
}

/// Connect-with-deadline over a pluggable connect primitive.
#[derive(Debug)]
pub struct Dialer<C = TcpConnector> {
    connector: Arc<C>,
    strategy: DialStrategy,
    deadline: Deadline,
}

impl<C> Clone for Dialer<C> {
    fn clone(&self) -> Self {
        Self {
            connector: Arc::clone(&self.connector),
            strategy: self.strategy,
            deadline: self.deadline,
        }
    }
}

impl Dialer<TcpConnector> {
    /// TCP dialer with the race strategy and the default deadline.
    pub fn tcp() -> Self {
        Self::new(TcpConnector)
    }
}

impl<C: Connect> Dialer<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector: Arc::new(connector),
            strategy: DialStrategy::default(),
            deadline: Deadline::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: DialStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }

    /// Apply the `[dial]` configuration table.
    pub fn with_config(self, config: &DialConfig) -> Self {
        self.with_strategy(config.strategy)
            .with_deadline(Deadline::from_secs(config.timeout_secs))
    }

    pub fn strategy(&self) -> DialStrategy {
        self.strategy
    }

    /// Deadline used by [`Dialer::dial`].
    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    /// Dial with the dialer's default deadline.
    pub async fn dial(&self, host: &str, port: u16) -> DialResult<C::Stream> {
        self.dial_with_deadline(host, port, self.deadline).await
    }

    pub async fn dial_with_deadline(
        &self,
        host: &str,
        port: u16,
        deadline: Deadline,
    ) -> DialResult<C::Stream> {
        self.dial_target(&Target::new(host, port), deadline).await
    }

    pub async fn dial_target(&self, target: &Target, deadline: Deadline) -> DialResult<C::Stream> {
        let started = Instant::now();
        let result = match self.strategy {
            DialStrategy::Race => race(Arc::clone(&self.connector), target.clone(), deadline).await,
            DialStrategy::Native => timeouts::connect_native(&*self.connector, target, deadline).await,
        };

        let outcome = match &result {
            Ok(_) => AttemptOutcome::Succeeded,
            Err(e) if e.is_timeout() => AttemptOutcome::TimedOut,
            Err(_) => AttemptOutcome::Failed,
        };
        metrics::record_dial(outcome, started.elapsed());

        result
    }
}

async fn race<C: Connect>(
    connector: Arc<C>,
    target: Target,
    deadline: Deadline,
) -> DialResult<C::Stream> {
    let attempt = Arc::new(ConnectionAttempt::new(target));
    let span = tracing::debug_span!(
        "dial",
        attempt_id = %attempt.id(),
        target = %attempt.target(),
        deadline_secs = deadline.as_secs(),
    );

    async move {
        let started = Instant::now();
        let (cancel_tx, cancel_rx) = watch::channel(false);

        watchdog::spawn(Arc::clone(&attempt), deadline, cancel_rx.clone());
        connector::spawn(connector, Arc::clone(&attempt), cancel_rx);

        if !attempt.wait(deadline.duration()).await {
            tracing::debug!("Gate wait bound elapsed without a signal");
        }

        // Receivers may already be gone; cancellation is advisory.
        let _ = cancel_tx.send(true);
        let resolution = attempt.retire();

        tracing::debug!(
            outcome = resolution.outcome().as_str(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Dial resolved"
        );

        match resolution {
            Resolution::Connected(stream) => Ok(stream),
            Resolution::Failed(source) => Err(DialError::Connect {
                target: attempt.target().clone(),
                source,
            }),
            Resolution::Pending => Err(DialError::Timeout {
                target: attempt.target().clone(),
                deadline_secs: deadline.as_secs(),
            }),
        }
    }
    .instrument(span)
    .await
}
