//! Probe results.

use std::time::Duration;

use serde::Serialize;

use crate::net::error::DialError;
use crate::net::target::Target;

/// Reachability of a probed target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    /// Connected before the deadline.
    Up,
    /// The connect failed before the deadline.
    Down,
    /// The deadline passed first.
    Timeout,
}

/// Result of probing one target once.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub name: String,
    pub target: String,
    pub status: ProbeStatus,
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeReport {
    pub fn from_result<S>(name: &str, target: &Target, elapsed: Duration, result: &Result<S, DialError>) -> Self {
        let (status, error) = match result {
            Ok(_) => (ProbeStatus::Up, None),
            Err(e) if e.is_timeout() => (ProbeStatus::Timeout, Some(e.to_string())),
            Err(e) => (ProbeStatus::Down, Some(e.to_string())),
        };

        Self {
            name: name.to_string(),
            target: target.to_string(),
            status,
            elapsed_ms: elapsed.as_millis() as u64,
            error,
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == ProbeStatus::Up
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn classifies_results() {
        let target = Target::new("127.0.0.1", 1);
        let elapsed = Duration::from_millis(12);

        let up = ProbeReport::from_result::<()>("a", &target, elapsed, &Ok(()));
        assert!(up.is_up());
        assert_eq!(up.error, None);

        let timeout = ProbeReport::from_result::<()>(
            "b",
            &target,
            elapsed,
            &Err(DialError::Timeout {
                target: target.clone(),
                deadline_secs: 1,
            }),
        );
        assert_eq!(timeout.status, ProbeStatus::Timeout);

        let down = ProbeReport::from_result::<()>(
            "c",
            &target,
            elapsed,
            &Err(DialError::Connect {
                target: target.clone(),
                source: io::Error::new(io::ErrorKind::ConnectionRefused, "refused"),
            }),
        );
        assert_eq!(down.status, ProbeStatus::Down);
        assert!(down.error.unwrap().contains("refused"));
    }

    #[test]
    fn serializes_without_empty_error() {
        let report = ProbeReport {
            name: "web".into(),
            target: "127.0.0.1:80".into(),
            status: ProbeStatus::Up,
            elapsed_ms: 3,
            error: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "web",
                "target": "127.0.0.1:80",
                "status": "up",
                "elapsed_ms": 3
            })
        );
    }
}
