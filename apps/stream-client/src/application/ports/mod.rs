//! Port Interfaces
//!
//! Contracts between the connection actor and the underlying duplex
//! transport, following the Hexagonal Architecture pattern. The
//! production adapter wraps `tokio-tungstenite`; tests drive the actor
//! through a scripted fake.
//!
//! The transport is assumed to provide reliable framing over an
//! unreliable connection: frames arrive whole and in order for a given
//! connection, but the connection itself can drop at any time.

use async_trait::async_trait;

/// Errors raised by a transport adapter.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Constructing or opening the connection failed.
    #[error("connection failed: {0}")]
    ConnectFailed(String),

    /// Sending a frame failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// The transport reported a protocol-level error.
    #[error("transport error: {0}")]
    Protocol(String),
}

/// An event emitted by a live transport connection.
#[derive(Debug)]
pub enum TransportEvent {
    /// A complete inbound text frame.
    Frame(String),
    /// The transport errored. A close follows per normal socket
    /// semantics; the error itself never ends the session.
    Error(TransportError),
    /// The connection closed.
    Closed,
}

/// Factory for duplex connections.
///
/// The connection actor owns at most one live connection at a time and
/// calls `connect` again only after the previous one has closed.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Write half of an established connection.
    type Sink: TransportSink;
    /// Read half of an established connection.
    type Stream: TransportStream;

    /// Open a connection to `url`, resolving once the transport is ready
    /// to carry frames.
    async fn connect(&self, url: &str) -> Result<(Self::Sink, Self::Stream), TransportError>;
}

/// Write half of a transport connection.
#[async_trait]
pub trait TransportSink: Send + 'static {
    /// Send one text frame.
    async fn send(&mut self, text: &str) -> Result<(), TransportError>;

    /// Initiate a close. Errors are irrelevant at this point and are
    /// swallowed by the adapter.
    async fn close(&mut self);
}

/// Read half of a transport connection.
#[async_trait]
pub trait TransportStream: Send + 'static {
    /// Next event from the connection. `None` means the stream ended,
    /// which the actor treats the same as [`TransportEvent::Closed`].
    async fn next_event(&mut self) -> Option<TransportEvent>;
}
