//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dial coordinator and workers produce:
//!     → logging.rs (structured events inside a per-attempt `dial` span)
//!     → metrics.rs (outcome counters, latency histogram, in-flight gauge)
//!
//! Consumers:
//!     → stderr log stream
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;
