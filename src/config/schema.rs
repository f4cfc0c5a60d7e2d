//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::net::dial::DialStrategy;
use crate::net::target::Target;
use crate::resilience::timeouts::Deadline;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct DialerConfig {
    /// Deadline and strategy for every dial.
    pub dial: DialConfig,

    /// Targets probed by the `probe` command.
    pub probe: ProbeConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Dial settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DialConfig {
    /// Connect deadline in whole seconds.
    pub timeout_secs: u64,

    /// How the deadline is enforced.
    pub strategy: DialStrategy,
}

impl Default for DialConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Deadline::default().as_secs(),
            strategy: DialStrategy::Race,
        }
    }
}

/// Probe settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ProbeConfig {
    /// Seconds between probe rounds.
    pub interval_secs: u64,

    /// Endpoints to probe.
    pub targets: Vec<ProbeTarget>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            targets: Vec::new(),
        }
    }
}

/// A named endpoint to probe.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ProbeTarget {
    /// Identifier for logs and reports.
    pub name: String,

    pub host: String,

    pub port: u16,

    /// Overrides `dial.timeout_secs` for this target.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ProbeTarget {
    pub fn target(&self) -> Target {
        Target::new(self.host.clone(), self.port)
    }

    /// This target's deadline, falling back to `default`.
    pub fn deadline(&self, default: Deadline) -> Deadline {
        self.timeout_secs.map(Deadline::from_secs).unwrap_or(default)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: DialerConfig = toml::from_str("").unwrap();
        assert_eq!(config, DialerConfig::default());
        assert_eq!(config.dial.timeout_secs, 5);
        assert_eq!(config.dial.strategy, DialStrategy::Race);
        assert_eq!(config.probe.interval_secs, 10);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn parses_full_document() {
        let config: DialerConfig = toml::from_str(
            r#"
            [dial]
            timeout_secs = 2
            strategy = "native"

            [probe]
            interval_secs = 30

            [[probe.targets]]
            name = "db"
            host = "db.internal"
            port = 5432

            [[probe.targets]]
            name = "cache"
            host = "10.0.0.7"
            port = 6379
            timeout_secs = 1

            [observability]
            log_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.dial.strategy, DialStrategy::Native);
        assert_eq!(config.probe.targets.len(), 2);

        let default = Deadline::from_secs(config.dial.timeout_secs);
        assert_eq!(config.probe.targets[0].deadline(default), Deadline::from_secs(2));
        assert_eq!(config.probe.targets[1].deadline(default), Deadline::from_secs(1));
        assert_eq!(config.probe.targets[1].target(), Target::new("10.0.0.7", 6379));
        assert_eq!(config.observability.log_level, "debug");
    }
}
