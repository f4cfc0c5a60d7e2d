//! Dial error definitions.

use std::io;

use thiserror::Error;

use crate::net::target::Target;

/// Errors surfaced by a connect-with-deadline call.
///
/// `Connect` and `Timeout` are the only two outcomes of a failed dial.
#[derive(Debug, Error)]
pub enum DialError {
    /// The underlying connect failed before the deadline.
    #[error("failed to connect to {target}: {source}")]
    Connect {
        target: Target,
        #[source]
        source: io::Error,
    },

    /// The deadline elapsed with no definitive outcome.
    #[error("connect to {target} timed out: deadline of {deadline_secs}s exceeded")]
    Timeout { target: Target, deadline_secs: u64 },
}

impl DialError {
    /// Returns true for a deadline expiry.
    pub fn is_timeout(&self) -> bool {
        matches!(self, DialError::Timeout { .. })
    }

    /// The underlying I/O error of a connect failure.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            DialError::Connect { source, .. } => Some(source),
            DialError::Timeout { .. } => None,
        }
    }
}

/// Result type for dial operations.
pub type DialResult<T> = Result<T, DialError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn connect_error_preserves_source() {
        let err = DialError::Connect {
            target: Target::new("db.internal", 5432),
            source: io::Error::new(io::ErrorKind::ConnectionRefused, "refused"),
        };
        assert!(!err.is_timeout());
        assert_eq!(err.io_error().map(|e| e.kind()), Some(io::ErrorKind::ConnectionRefused));
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "failed to connect to db.internal:5432: refused");
    }

    #[test]
    fn timeout_error_display() {
        let err = DialError::Timeout {
            target: Target::new("10.0.0.1", 80),
            deadline_secs: 3,
        };
        assert!(err.is_timeout());
        assert!(err.io_error().is_none());
        assert_eq!(
            err.to_string(),
            "connect to 10.0.0.1:80 timed out: deadline of 3s exceeded"
        );
    }
}
