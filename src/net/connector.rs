//! Connector worker.
//!
//! # Responsibilities
//! - Run the underlying connect with no timeout of its own
//! - Publish exactly one of {connection, failure} into the attempt
//! - Close a connection that completes after the coordinator stopped waiting
//! - Signal the gate once, whatever the outcome
//!
//! # Design Decisions
//! - Cancellation does not abort the in-flight connect; the attempt's
//!   `still_wanted` flag decides whether the result is kept
//! - Errors never leave the task; they are recorded for the coordinator

use std::io;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::net::attempt::ConnectionAttempt;
use crate::net::target::Target;
use crate::observability::metrics;

/// The underlying connect primitive.
///
/// Implementations may block for as long as the network does; the dialer
/// supplies the deadline.
pub trait Connect: Send + Sync + 'static {
    /// The connected stream handed to the caller. Dropping it closes it.
    type Stream: Send + 'static;

    fn connect<'a>(&'a self, target: &'a Target) -> BoxFuture<'a, io::Result<Self::Stream>>;
}

/// Plain TCP connect, including name resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl Connect for TcpConnector {
    type Stream = TcpStream;

    fn connect<'a>(&'a self, target: &'a Target) -> BoxFuture<'a, io::Result<TcpStream>> {
        Box::pin(TcpStream::connect((target.host.as_str(), target.port)))
    }
}

/// Spawn the connector worker for `attempt`. The task is detached.
pub(crate) fn spawn<C: Connect>(
    connector: Arc<C>,
    attempt: Arc<ConnectionAttempt<C::Stream>>,
    cancel: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(run(connector, attempt, cancel).in_current_span())
}

async fn run<C: Connect>(
    connector: Arc<C>,
    attempt: Arc<ConnectionAttempt<C::Stream>>,
    cancel: watch::Receiver<bool>,
) {
    let _in_flight = metrics::WorkerGuard::new();

    let result = connector.connect(attempt.target()).await;

    if *cancel.borrow() {
        tracing::trace!("Connect finished after cancellation was requested");
    }

    settle(&attempt, result);
    attempt.signal();
}

/// What the connector did with a finished connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Settlement {
    /// The connection was handed to the waiting coordinator.
    Published,
    /// The connect error was recorded.
    Failed,
    /// The coordinator had already stopped waiting; the connection was closed.
    Discarded,
}

pub(crate) fn settle<S>(attempt: &ConnectionAttempt<S>, result: io::Result<S>) -> Settlement {
    match result {
        Ok(stream) => match attempt.publish_connection(stream) {
            Ok(()) => {
                tracing::debug!("Connection established");
                Settlement::Published
            }
            Err(late) => {
                drop(late);
                metrics::record_late_discard();
                tracing::warn!("Late connection closed: deadline already exceeded");
                Settlement::Discarded
            }
        },
        Err(e) => {
            tracing::debug!(error = %e, "Connect failed");
            attempt.publish_failure(e);
            Settlement::Failed
        }
    }
}
