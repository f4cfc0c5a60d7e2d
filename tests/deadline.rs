//! Connect-with-deadline behaviour against real sockets and scripted connectors.

use std::io;
use std::time::{Duration, Instant};

use deadline_connect::{connect, Deadline, DialError, DialStrategy, Dialer};
use futures_util::future::join_all;
use tokio::io::AsyncWriteExt;

mod common;

use common::{Script, ScriptedConnector};

const SLACK: Duration = Duration::from_millis(500);

#[tokio::test]
async fn test_fast_success_returns_usable_stream() {
    let (addr, received) = common::start_echo_once().await;

    let started = Instant::now();
    let mut stream = connect("127.0.0.1", addr.port(), 5).await.expect("connect failed");
    assert!(started.elapsed() < Duration::from_secs(1), "success should not wait for the deadline");

    stream.write_all(b"ping").await.unwrap();
    stream.shutdown().await.unwrap();
    drop(stream);

    let bytes = tokio::time::timeout(Duration::from_secs(2), received)
        .await
        .expect("listener never saw the data")
        .unwrap();
    assert_eq!(bytes, b"ping");
}

#[tokio::test]
async fn test_refused_connection_is_connect_failure() {
    let port = common::closed_port().await;

    let started = Instant::now();
    let err = connect("127.0.0.1", port, 5).await.unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(2), "refusal should be reported promptly");
    match err {
        DialError::Connect { target, source } => {
            assert_eq!(target.port, port);
            assert_eq!(source.kind(), io::ErrorKind::ConnectionRefused);
        }
        other => panic!("expected connect failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_silent_endpoint_times_out_at_deadline() {
    let connector = ScriptedConnector::new(Duration::ZERO, Script::Hang);
    let dialer = Dialer::new(connector);

    let started = Instant::now();
    let err = dialer
        .dial_with_deadline("192.0.2.1", 80, Deadline::from_secs(1))
        .await
        .unwrap_err();
    let elapsed = started.elapsed();

    assert!(err.is_timeout(), "expected timeout, got {err:?}");
    assert!(elapsed >= Duration::from_millis(990), "returned early: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(1) + SLACK, "returned late: {elapsed:?}");
}

#[tokio::test]
async fn test_late_success_is_closed_not_returned() {
    let connector = ScriptedConnector::new(Duration::from_secs(2), Script::Accept);
    let counts = connector.counts.clone();
    let dialer = Dialer::new(connector);

    let started = Instant::now();
    let err = dialer
        .dial_with_deadline("192.0.2.1", 80, Deadline::from_secs(1))
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got {err:?}");
    assert!(started.elapsed() < Duration::from_secs(1) + SLACK);
    assert_eq!(counts.opened(), 0, "connector should still be in flight");

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(counts.opened(), 1, "late connection was never established");
    assert_eq!(counts.closed(), 1, "late connection leaked");
}

#[tokio::test]
async fn test_failure_before_deadline_preserves_error() {
    let connector = ScriptedConnector::new(
        Duration::from_millis(100),
        Script::Fail(io::ErrorKind::AddrNotAvailable),
    );
    let dialer = Dialer::new(connector);

    let started = Instant::now();
    let err = dialer
        .dial_with_deadline("192.0.2.1", 80, Deadline::from_secs(5))
        .await
        .unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(1));
    assert!(!err.is_timeout());
    assert_eq!(err.io_error().map(|e| e.kind()), Some(io::ErrorKind::AddrNotAvailable));
}

#[tokio::test]
async fn test_boundary_race_yields_single_outcome_without_leaks() {
    // Connects finishing right at the deadline: each call must land on exactly one side.
    let connector = ScriptedConnector::new(Duration::from_millis(1000), Script::Accept);
    let counts = connector.counts.clone();
    let dialer = Dialer::new(connector);

    let calls = (0..16).map(|_| dialer.dial_with_deadline("192.0.2.1", 80, Deadline::from_secs(1)));
    let results = join_all(calls).await;

    let mut held = Vec::new();
    for result in results {
        match result {
            Ok(stream) => held.push(stream),
            Err(e) => assert!(e.is_timeout(), "unexpected error {e:?}"),
        }
    }

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(counts.opened(), 16);
    assert_eq!(counts.live(), held.len(), "returned streams and live handles disagree");

    drop(held);
    assert_eq!(counts.live(), 0);
}

#[tokio::test]
async fn test_native_strategy_never_opens_late_connection() {
    let connector = ScriptedConnector::new(Duration::from_secs(2), Script::Accept);
    let counts = connector.counts.clone();
    let dialer = Dialer::new(connector).with_strategy(DialStrategy::Native);

    let started = Instant::now();
    let err = dialer
        .dial_with_deadline("192.0.2.1", 80, Deadline::from_secs(1))
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert!(started.elapsed() < Duration::from_secs(1) + SLACK);

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(counts.opened(), 0);
}

#[tokio::test]
async fn test_strategies_agree_on_real_sockets() {
    let closed = common::closed_port().await;

    for strategy in [DialStrategy::Race, DialStrategy::Native] {
        let (addr, _received) = common::start_echo_once().await;
        let dialer = Dialer::tcp()
            .with_strategy(strategy)
            .with_deadline(Deadline::from_secs(3));

        let stream = dialer.dial("127.0.0.1", addr.port()).await;
        assert!(stream.is_ok(), "{strategy:?}: {stream:?}");

        let err = dialer.dial("127.0.0.1", closed).await.unwrap_err();
        assert!(matches!(err, DialError::Connect { .. }), "{strategy:?}: {err:?}");
    }
}
