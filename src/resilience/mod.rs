//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Dial request:
//!     → timeouts.rs (deadline in whole seconds → one Duration)
//!     → net::dial (race strategy) or timeouts::connect_native (native strategy)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every dial has a deadline
//! - No retries: a timed-out or failed dial is terminal for the call

pub mod timeouts;
