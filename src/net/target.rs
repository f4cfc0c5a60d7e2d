//! Dial targets.
//!
//! A target is the immutable `(host, port)` pair an attempt connects to.
//! The host is passed to the resolver untouched, so it may be a name,
//! an IPv4 literal, or an IPv6 literal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Remote endpoint of a dial attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Target {
    /// Host name or IP literal.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl Target {
    /// Create a new target.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// A `host:port` string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid target '{input}': {reason}")]
pub struct TargetParseError {
    pub input: String,
    pub reason: &'static str,
}

impl TargetParseError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// Parses `host:port` and `[v6-literal]:port`.
impl FromStr for Target {
    type Err = TargetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| TargetParseError::new(s, "missing port"))?;

        let host = match host.strip_prefix('[') {
            Some(inner) => inner
                .strip_suffix(']')
                .ok_or_else(|| TargetParseError::new(s, "unterminated '['"))?,
            None if host.contains(':') => {
                return Err(TargetParseError::new(s, "IPv6 host must be bracketed"))
            }
            None => host,
        };

        if host.is_empty() {
            return Err(TargetParseError::new(s, "empty host"));
        }

        let port: u16 = port
            .parse()
            .map_err(|_| TargetParseError::new(s, "port must be a number in 0-65535"))?;

        Ok(Self::new(host, port))
    }
}
