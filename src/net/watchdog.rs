//! Watchdog worker: signals the gate once the deadline passes.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::net::attempt::ConnectionAttempt;
use crate::resilience::timeouts::Deadline;

/// Spawn the watchdog for `attempt`. The task is detached.
///
/// Exits without signalling if cancellation arrives first, or if the
/// coordinator goes away (sender dropped).
pub(crate) fn spawn<S: Send + 'static>(
    attempt: Arc<ConnectionAttempt<S>>,
    deadline: Deadline,
    mut cancel: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let task = async move {
        tokio::select! {
            _ = tokio::time::sleep(deadline.duration()) => {
                tracing::trace!("Deadline reached");
                attempt.signal();
            }
            _ = cancel.changed() => {
                tracing::trace!("Watchdog cancelled");
            }
        }
    };
    tokio::spawn(task.in_current_span())
}
