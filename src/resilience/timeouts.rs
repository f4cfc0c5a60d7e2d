//! Timeout enforcement.
//!
//! # Responsibilities
//! - Represent the caller's deadline (whole seconds)
//! - Derive the single `Duration` every bound of a dial is taken from
//! - Provide the native connect-with-timeout strategy
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from connect errors
//! - The watchdog sleep and the coordinator's wait bound share one value

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::timeout;

use crate::net::connector::Connect;
use crate::net::error::{DialError, DialResult};
use crate::net::target::Target;

/// Upper bound on how long a dial may take, in whole seconds.
///
/// A zero deadline is accepted but expires immediately; configuration
/// validation rejects it before it reaches a dialer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Deadline(u64);

impl Deadline {
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// The deadline in milliseconds, as used by every timed wait.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.0.saturating_mul(1000))
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self(5)
    }
}

impl std::fmt::Display for Deadline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Connect with the runtime's own timeout instead of a worker race.
///
/// Dropping the connect future on expiry closes any half-open socket, so
/// no late connection can outlive this call.
pub async fn connect_native<C: Connect>(
    connector: &C,
    target: &Target,
    deadline: Deadline,
) -> DialResult<C::Stream> {
    match timeout(deadline.duration(), connector.connect(target)).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(source)) => Err(DialError::Connect {
            target: target.clone(),
            source,
        }),
        Err(_) => Err(DialError::Timeout {
            target: target.clone(),
            deadline_secs: deadline.as_secs(),
        }),
    }
}
