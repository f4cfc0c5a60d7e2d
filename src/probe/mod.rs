//! Probe subsystem.
//!
//! # Data Flow
//! ```text
//! [[probe.targets]]
//!     → monitor.rs (one dial per target per round, concurrent)
//!     → report.rs (up / down / timeout + elapsed)
//!     → JSON on stdout (probe --once) or transition logs (continuous)
//! ```
//!
//! # Design Decisions
//! - Each round is independent: no retries, no pooled connections
//! - Connections opened by a probe are closed immediately

pub mod monitor;
pub mod report;

pub use monitor::{run_once, ProbeMonitor};
pub use report::{ProbeReport, ProbeStatus};
