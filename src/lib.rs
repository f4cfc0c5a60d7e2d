//! Bounded-time TCP connection establishment.
//!
//! [`connect`] opens a connection to `host:port` and returns within the
//! caller's deadline no matter how long the underlying connect would block.
//! A connection that completes after the deadline is closed, never returned.

pub mod config;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod probe;
pub mod resilience;

pub use config::DialerConfig;
pub use net::{
    connect, Connect, DialError, DialResult, DialStrategy, Dialer, TcpConnector, Target,
    TargetParseError,
};
pub use resilience::timeouts::Deadline;
