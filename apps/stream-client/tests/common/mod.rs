#![allow(dead_code)] // not every test binary uses every helper

//! Shared test harness: a scripted in-memory transport.
//!
//! Each `connect` call consumes one script entry: `Open` hands the actor
//! a live session the test drives, `Fail` returns a connect error. Tests
//! run on a paused clock and settle the actor with bounded yield loops
//! so no wall time passes.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use stream_client::{
    StreamClient, StreamClientConfig, Transport, TransportError, TransportEvent, TransportSink,
    TransportStream,
};
use stream_client::infrastructure::stream::{HeartbeatConfig, ReconnectConfig};

/// One scripted answer to a `connect` call.
pub enum ConnectScript {
    Open,
    Fail,
}

/// Test-side handle to one open connection.
pub struct SessionHandle {
    sent: Arc<Mutex<Vec<String>>>,
    event_tx: mpsc::UnboundedSender<TransportEvent>,
}

impl SessionHandle {
    /// Deliver a text frame to the client.
    pub fn frame(&self, text: &str) {
        let _ = self.event_tx.send(TransportEvent::Frame(text.to_string()));
    }

    /// Deliver a transport error to the client.
    pub fn error(&self, message: &str) {
        let _ = self.event_tx.send(TransportEvent::Error(
            TransportError::Protocol(message.to_string()),
        ));
    }

    /// Close the connection from the server side.
    pub fn close(&self) {
        let _ = self.event_tx.send(TransportEvent::Closed);
    }

    /// Frames the client has written to this connection so far.
    pub fn sent_frames(&self) -> Vec<String> {
        self.sent.lock().clone()
    }

    /// Yield until the client has written at least `n` frames.
    pub async fn wait_for_frames(&self, n: usize) -> Vec<String> {
        wait_until(|| self.sent.lock().len() >= n).await;
        self.sent_frames()
    }
}

pub struct FakeSink {
    sent: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl TransportSink for FakeSink {
    async fn send(&mut self, text: &str) -> Result<(), TransportError> {
        self.sent.lock().push(text.to_string());
        Ok(())
    }

    async fn close(&mut self) {}
}

pub struct FakeStream {
    event_rx: mpsc::UnboundedReceiver<TransportEvent>,
}

#[async_trait]
impl TransportStream for FakeStream {
    async fn next_event(&mut self) -> Option<TransportEvent> {
        self.event_rx.recv().await
    }
}

/// Transport whose `connect` outcomes are scripted by the test.
pub struct FakeTransport {
    script_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<ConnectScript>>,
    session_tx: mpsc::UnboundedSender<SessionHandle>,
    connects: Arc<AtomicU32>,
}

#[async_trait]
impl Transport for FakeTransport {
    type Sink = FakeSink;
    type Stream = FakeStream;

    async fn connect(&self, _url: &str) -> Result<(Self::Sink, Self::Stream), TransportError> {
        self.connects.fetch_add(1, Ordering::SeqCst);

        let script = self.script_rx.lock().await.recv().await;
        match script {
            Some(ConnectScript::Open) => {
                let sent = Arc::new(Mutex::new(Vec::new()));
                let (event_tx, event_rx) = mpsc::unbounded_channel();
                let _ = self.session_tx.send(SessionHandle {
                    sent: Arc::clone(&sent),
                    event_tx,
                });
                Ok((FakeSink { sent }, FakeStream { event_rx }))
            }
            Some(ConnectScript::Fail) => Err(TransportError::ConnectFailed(
                "connection refused".to_string(),
            )),
            // Script exhausted: park until the test tears the client down.
            None => std::future::pending().await,
        }
    }
}

/// A client wired to a scripted transport, plus the test-side controls.
pub struct Harness {
    pub client: StreamClient,
    pub events: tokio::sync::mpsc::Receiver<stream_client::ClientEvent>,
    script_tx: mpsc::UnboundedSender<ConnectScript>,
    session_rx: mpsc::UnboundedReceiver<SessionHandle>,
    connects: Arc<AtomicU32>,
}

impl Harness {
    /// Start a client against a fresh scripted transport.
    pub fn start(config: StreamClientConfig) -> Self {
        let (script_tx, script_rx) = mpsc::unbounded_channel();
        let (session_tx, session_rx) = mpsc::unbounded_channel();
        let connects = Arc::new(AtomicU32::new(0));

        let transport = FakeTransport {
            script_rx: tokio::sync::Mutex::new(script_rx),
            session_tx,
            connects: Arc::clone(&connects),
        };
        let (client, events) = StreamClient::start(transport, config);

        Self {
            client,
            events,
            script_tx,
            session_rx,
            connects,
        }
    }

    /// Script the next `connect` to succeed and wait for the session.
    pub async fn open(&mut self) -> SessionHandle {
        let _ = self.script_tx.send(ConnectScript::Open);
        self.session_rx
            .recv()
            .await
            .expect("transport produces a session")
    }

    /// Script the next `connect` to fail.
    pub fn fail_next(&self) {
        let _ = self.script_tx.send(ConnectScript::Fail);
    }

    /// Number of `connect` calls made so far.
    pub fn connects(&self) -> u32 {
        self.connects.load(Ordering::SeqCst)
    }

    /// Yield until `n` connect calls have been made.
    pub async fn wait_for_connects(&self, n: u32) {
        let connects = Arc::clone(&self.connects);
        wait_until(move || connects.load(Ordering::SeqCst) >= n).await;
    }

    /// Receive the next client event, settling the actor as needed.
    pub async fn next_event(&mut self) -> stream_client::ClientEvent {
        tokio::time::timeout(Duration::from_secs(60), self.events.recv())
            .await
            .expect("event within timeout")
            .expect("event channel open")
    }
}

/// Default test config: short fixed retry interval, long heartbeat so it
/// stays out of timing-sensitive assertions.
pub fn test_config(max_attempts: u32) -> StreamClientConfig {
    StreamClientConfig {
        url: "ws://test.invalid/ws".to_string(),
        reconnect: ReconnectConfig::new(Duration::from_millis(3000), max_attempts),
        heartbeat: HeartbeatConfig::new(Duration::from_secs(3600)),
    }
}

/// Yield the current task until `cond` holds.
///
/// Bounded so a broken invariant fails the test instead of hanging it.
pub async fn wait_until(cond: impl Fn() -> bool) {
    for _ in 0..10_000 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached after 10000 yields");
}

/// Let every ready task run without advancing the clock.
pub async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}
