//! Per-call attempt state shared by the dial coordinator and its workers.
//!
//! # Responsibilities
//! - Generate unique attempt IDs for tracing
//! - Hold the outcome slots (`connection`, `failure`) written by the connector
//! - Hold the `still_wanted` flag that turns a late success into a discard
//! - Provide the gate the coordinator waits on and both workers signal
//!
//! # Lifecycle
//! ```text
//! PENDING → SUCCEEDED   connector published a connection before retire()
//! PENDING → FAILED      connector published a failure before retire()
//! PENDING → TIMED_OUT   retire() found both slots empty
//!
//! A connection that arrives after retire() is handed back to the connector,
//! which closes it. The coordinator never sees it.
//! ```

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;

use crate::net::target::Target;

/// Global atomic counter for attempt IDs.
static ATTEMPT_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a dial attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttemptId(u64);

impl AttemptId {
    /// Generate a new unique attempt ID.
    pub fn new() -> Self {
        Self(ATTEMPT_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for AttemptId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AttemptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dial-{}", self.0)
    }
}

/// Caller-visible result class of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Succeeded,
    Failed,
    TimedOut,
}

impl AttemptOutcome {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptOutcome::Succeeded => "succeeded",
            AttemptOutcome::Failed => "failed",
            AttemptOutcome::TimedOut => "timed_out",
        }
    }
}

/// What the coordinator found when it retired the attempt.
#[derive(Debug)]
pub enum Resolution<S> {
    Connected(S),
    Failed(io::Error),
    Pending,
}

impl<S> Resolution<S> {
    pub fn outcome(&self) -> AttemptOutcome {
        match self {
            Resolution::Connected(_) => AttemptOutcome::Succeeded,
            Resolution::Failed(_) => AttemptOutcome::Failed,
            Resolution::Pending => AttemptOutcome::TimedOut,
        }
    }
}

#[derive(Debug)]
struct AttemptState<S> {
    connection: Option<S>,
    failure: Option<io::Error>,
    still_wanted: bool,
}

/// Shared state of a single connect-with-deadline call.
///
/// Created fresh per call and shared only with the two workers spawned for
/// that call. Every field access goes through one mutex.
#[derive(Debug)]
pub struct ConnectionAttempt<S> {
    id: AttemptId,
    target: Target,
    state: Mutex<AttemptState<S>>,
    gate: Notify,
}

impl<S> ConnectionAttempt<S> {
    /// Create a pending attempt for `target`.
    pub fn new(target: Target) -> Self {
        Self {
            id: AttemptId::new(),
            target,
            state: Mutex::new(AttemptState {
                connection: None,
                failure: None,
                still_wanted: true,
            }),
            gate: Notify::new(),
        }
    }

    pub fn id(&self) -> AttemptId {
        self.id
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Whether the coordinator is still waiting for this attempt.
    pub fn still_wanted(&self) -> bool {
        self.lock().still_wanted
    }

    /// Record an established connection.
    ///
    /// Returns the stream back when the attempt has already been retired;
    /// the caller owns it and must close it.
    pub fn publish_connection(&self, stream: S) -> Result<(), S> {
        let mut state = self.lock();
        if !state.still_wanted || state.connection.is_some() || state.failure.is_some() {
            return Err(stream);
        }
        state.connection = Some(stream);
        Ok(())
    }

    /// Record a connect failure. Ignored if an outcome is already recorded.
    pub fn publish_failure(&self, error: io::Error) {
        let mut state = self.lock();
        if state.connection.is_none() && state.failure.is_none() {
            state.failure = Some(error);
        }
    }

    /// Wake the coordinator. Extra signals are harmless.
    pub fn signal(&self) {
        self.gate.notify_one();
    }

    /// Wait for a worker signal, bounded by `bound`.
    ///
    /// Returns false if the bound elapsed without a signal.
    pub async fn wait(&self, bound: Duration) -> bool {
        tokio::time::timeout(bound, self.gate.notified()).await.is_ok()
    }

    /// Stop wanting a result and take whatever has been recorded.
    ///
    /// `still_wanted` goes false in the same critical section that reads the
    /// slots, so nothing can be published between the two. Later calls
    /// always return `Pending`.
    pub fn retire(&self) -> Resolution<S> {
        let mut state = self.lock();
        state.still_wanted = false;
        if let Some(stream) = state.connection.take() {
            Resolution::Connected(stream)
        } else if let Some(error) = state.failure.take() {
            Resolution::Failed(error)
        } else {
            Resolution::Pending
        }
    }

    fn lock(&self) -> MutexGuard<'_, AttemptState<S>> {
        // The state stays consistent across a panicking holder: every write is a single assignment.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
