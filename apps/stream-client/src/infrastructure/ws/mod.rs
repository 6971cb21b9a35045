//! WebSocket Transport
//!
//! `tokio-tungstenite` implementation of the transport ports. Splits the
//! socket into independent halves so the connection actor can write
//! control frames while waiting on inbound events.
//!
//! Only text frames carry application data on this stream. Binary frames
//! are ignored, ping/pong stays inside tungstenite's automatic replies,
//! and a close frame (or the socket going away) ends the event stream.

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::application::ports::{
    Transport, TransportError, TransportEvent, TransportSink, TransportStream,
};

type WsSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket transport factory.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsTransport;

impl WsTransport {
    /// Create a new transport.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for WsTransport {
    type Sink = WsSink;
    type Stream = WsStream;

    async fn connect(&self, url: &str) -> Result<(Self::Sink, Self::Stream), TransportError> {
        let (socket, _response) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|e| TransportError::ConnectFailed(e.to_string()))?;
        let (write, read) = socket.split();
        Ok((WsSink { write }, WsStream { read }))
    }
}

/// Write half of a WebSocket connection.
pub struct WsSink {
    write: SplitSink<WsSocket, Message>,
}

#[async_trait]
impl TransportSink for WsSink {
    async fn send(&mut self, text: &str) -> Result<(), TransportError> {
        self.write
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    async fn close(&mut self) {
        if let Err(e) = self.write.send(Message::Close(None)).await {
            tracing::debug!(error = %e, "close frame not sent");
        }
        let _ = self.write.close().await;
    }
}

/// Read half of a WebSocket connection.
pub struct WsStream {
    read: SplitStream<WsSocket>,
}

#[async_trait]
impl TransportStream for WsStream {
    async fn next_event(&mut self) -> Option<TransportEvent> {
        loop {
            return match self.read.next().await? {
                Ok(Message::Text(text)) => Some(TransportEvent::Frame(text.to_string())),
                Ok(Message::Close(_)) => Some(TransportEvent::Closed),
                // Pong replies are automatic; binary frames are not part
                // of this protocol.
                Ok(Message::Binary(_) | Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => {
                    continue;
                }
                Err(e) => Some(TransportEvent::Error(TransportError::Protocol(
                    e.to_string(),
                ))),
            };
        }
    }
}
