//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (deadlines > 0, ports valid)
//! - Detect duplicate probe target names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DialerConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::DialerConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("dial.timeout_secs must be greater than 0")]
    ZeroDialTimeout,

    #[error("probe.interval_secs must be greater than 0")]
    ZeroProbeInterval,

    #[error("probe target #{index} has an empty name")]
    EmptyTargetName { index: usize },

    #[error("probe target '{name}' is defined more than once")]
    DuplicateTargetName { name: String },

    #[error("probe target '{name}' has an empty host")]
    EmptyHost { name: String },

    #[error("probe target '{name}' has port 0")]
    ZeroPort { name: String },

    #[error("probe target '{name}' has timeout_secs = 0")]
    ZeroTargetTimeout { name: String },

    #[error("observability.metrics_address '{address}' is not a socket address")]
    InvalidMetricsAddress { address: String },
}

/// Check `config` and collect every problem found.
pub fn validate_config(config: &DialerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.dial.timeout_secs == 0 {
        errors.push(ValidationError::ZeroDialTimeout);
    }
    if config.probe.interval_secs == 0 {
        errors.push(ValidationError::ZeroProbeInterval);
    }

    let mut seen = HashSet::new();
    for (index, target) in config.probe.targets.iter().enumerate() {
        if target.name.is_empty() {
            errors.push(ValidationError::EmptyTargetName { index });
        } else if !seen.insert(target.name.as_str()) {
            errors.push(ValidationError::DuplicateTargetName {
                name: target.name.clone(),
            });
        }
        if target.host.trim().is_empty() {
            errors.push(ValidationError::EmptyHost {
                name: target.name.clone(),
            });
        }
        if target.port == 0 {
            errors.push(ValidationError::ZeroPort {
                name: target.name.clone(),
            });
        }
        if target.timeout_secs == Some(0) {
            errors.push(ValidationError::ZeroTargetTimeout {
                name: target.name.clone(),
            });
        }
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress {
            address: observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
