//! Shared utilities for integration tests.

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use deadline_connect::{Connect, Target};
use futures_util::future::BoxFuture;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Start a listener that accepts one connection and reports what it reads.
#[allow(dead_code)]
pub async fn start_echo_once() -> (SocketAddr, oneshot::Receiver<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = Vec::new();
            let _ = socket.read_to_end(&mut buf).await;
            let _ = tx.send(buf);
        }
    });

    (addr, rx)
}

/// A loopback port with nothing listening on it.
#[allow(dead_code)]
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Open/close accounting for scripted connections.
#[derive(Debug, Default)]
pub struct HandleCounts {
    opened: AtomicUsize,
    closed: AtomicUsize,
}

impl HandleCounts {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    /// Connections opened and not yet closed.
    pub fn live(&self) -> usize {
        self.opened() - self.closed()
    }
}

/// Stand-in for a socket; closing is dropping.
#[derive(Debug)]
pub struct TrackedStream {
    counts: Arc<HandleCounts>,
}

impl TrackedStream {
    fn open(counts: &Arc<HandleCounts>) -> Self {
        counts.opened.fetch_add(1, Ordering::SeqCst);
        Self {
            counts: Arc::clone(counts),
        }
    }
}

impl Drop for TrackedStream {
    fn drop(&mut self) {
        self.counts.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// What a scripted connect does once its delay has passed.
#[derive(Debug, Clone, Copy)]
pub enum Script {
    Accept,
    Fail(io::ErrorKind),
    Hang,
}

/// Connect primitive with a scripted delay and result.
#[derive(Debug, Clone)]
pub struct ScriptedConnector {
    pub delay: Duration,
    pub script: Script,
    pub counts: Arc<HandleCounts>,
}

impl ScriptedConnector {
    pub fn new(delay: Duration, script: Script) -> Self {
        Self {
            delay,
            script,
            counts: Arc::new(HandleCounts::default()),
        }
    }
}

impl Connect for ScriptedConnector {
    type Stream = TrackedStream;

    fn connect<'a>(&'a self, _target: &'a Target) -> BoxFuture<'a, io::Result<TrackedStream>> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            match self.script {
                Script::Accept => Ok(TrackedStream::open(&self.counts)),
                Script::Fail(kind) => Err(io::Error::new(kind, "scripted failure")),
                Script::Hang => std::future::pending().await,
            }
        })
    }
}
