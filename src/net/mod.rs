//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! connect(host, port, timeout_secs)
//!     → dial.rs (coordinator: creates the attempt, waits, decides)
//!         → connector.rs (worker: blocking connect, publishes outcome)
//!         → watchdog.rs (worker: sleeps for the deadline, signals)
//!     → attempt.rs (shared state + gate, one per call)
//!     → TcpStream | DialError::Connect | DialError::Timeout
//! ```
//!
//! # Design Decisions
//! - Workers are detached tasks; the coordinator only waits on the gate
//! - `still_wanted` is the authority for discarding late connections
//! - Each attempt is private to one call and never reused

pub mod attempt;
pub mod connector;
pub mod dial;
pub mod error;
pub mod target;
pub mod watchdog;

pub use connector::{Connect, TcpConnector};
pub use dial::{connect, DialStrategy, Dialer};
pub use error::{DialError, DialResult};
pub use target::{Target, TargetParseError};
