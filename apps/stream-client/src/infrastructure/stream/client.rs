//! Stream Client
//!
//! Connection manager and public facade for the real-time subscription
//! client. One client owns exactly one transport connection at a time,
//! drives the lifecycle state machine, and multiplexes the caller's
//! symbol of interest onto that connection.
//!
//! # Structure
//!
//! [`StreamClient`] is the only surface callers touch. Construction
//! spawns two tasks:
//!
//! - a connection actor that owns all mutable client state and runs the
//!   connect / session / retry loop;
//! - a [`HeartbeatTimer`] that feeds keepalive ticks into the actor for
//!   the whole client lifetime.
//!
//! Facade calls are commands on a channel into the actor, so every
//! mutation happens in one execution context and the single-transport
//! invariant needs no locking. Teardown cancels both tasks through a
//! shared token; callbacks arriving afterwards are discarded.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{Transport, TransportEvent, TransportSink, TransportStream};
use crate::domain::connection::ConnectionState;
use crate::domain::subscription::{SlotChanges, SubscriptionSlot};

use super::codec::FrameCodec;
use super::heartbeat::{HeartbeatConfig, HeartbeatTick, HeartbeatTimer};
use super::messages::{InboundMessage, OutboundFrame};
use super::reconnect::{ReconnectConfig, ReconnectPolicy};

/// Capacity of the caller-facing event channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Capacity of the facade command channel.
const COMMAND_CHANNEL_CAPACITY: usize = 64;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for a stream client.
#[derive(Debug, Clone)]
pub struct StreamClientConfig {
    /// WebSocket URL of the signal stream (`/ws` endpoint).
    pub url: String,
    /// Reconnection configuration.
    pub reconnect: ReconnectConfig,
    /// Heartbeat configuration.
    pub heartbeat: HeartbeatConfig,
}

impl StreamClientConfig {
    /// Create a configuration with default reconnect and heartbeat
    /// settings.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reconnect: ReconnectConfig::default(),
            heartbeat: HeartbeatConfig::default(),
        }
    }
}

// =============================================================================
// Events
// =============================================================================

/// Events emitted to the caller.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// The transport opened.
    Connected,
    /// The transport closed.
    Disconnected,
    /// A reconnect is scheduled.
    Reconnecting {
        /// Attempt number, 1-based since the last successful open.
        attempt: u32,
    },
    /// A parsed inbound frame.
    Message(InboundMessage),
    /// A transport error. Never fatal; the close that follows drives the
    /// reconnection policy.
    Error(String),
}

// =============================================================================
// Shared status
// =============================================================================

/// Connection status shared between the actor and the facade.
#[derive(Debug, Default)]
pub struct ClientStatus {
    state: RwLock<ConnectionState>,
    last_message: RwLock<Option<InboundMessage>>,
}

impl ClientStatus {
    /// Current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    /// Most recent successfully parsed inbound message.
    #[must_use]
    pub fn last_message(&self) -> Option<InboundMessage> {
        self.last_message.read().clone()
    }

    fn set_state(&self, state: ConnectionState) {
        *self.state.write() = state;
    }

    fn record_message(&self, message: InboundMessage) {
        *self.last_message.write() = Some(message);
    }
}

// =============================================================================
// Facade
// =============================================================================

/// Commands from the facade into the connection actor.
#[derive(Debug)]
enum Command {
    Subscribe(String),
    Unsubscribe(String),
    Send(serde_json::Value),
    Reconnect,
    Disconnect,
}

/// Public facade of the real-time subscription client.
///
/// Created once per logical consumer; connects immediately. Dropping the
/// client (or calling [`shutdown`](Self::shutdown)) tears it down
/// permanently.
pub struct StreamClient {
    command_tx: mpsc::Sender<Command>,
    status: Arc<ClientStatus>,
    cancel: CancellationToken,
    actor: tokio::task::JoinHandle<()>,
    heartbeat: tokio::task::JoinHandle<()>,
}

impl StreamClient {
    /// Start a client and begin connecting immediately.
    ///
    /// Returns the facade and the event stream the caller consumes.
    #[must_use]
    pub fn start<T: Transport>(
        transport: T,
        config: StreamClientConfig,
    ) -> (Self, mpsc::Receiver<ClientEvent>) {
        let status = Arc::new(ClientStatus::default());
        let cancel = CancellationToken::new();
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (tick_tx, tick_rx) = mpsc::channel(4);

        let timer = HeartbeatTimer::new(config.heartbeat.clone(), tick_tx, cancel.clone());
        let heartbeat = tokio::spawn(timer.run());

        let actor = ConnectionActor {
            transport,
            config,
            shared: ActorContext {
                status: Arc::clone(&status),
                event_tx,
                codec: FrameCodec::new(),
            },
            slot: SubscriptionSlot::new(),
            command_rx,
            tick_rx,
            cancel: cancel.clone(),
        };
        let actor = tokio::spawn(actor.run());

        (
            Self {
                command_tx,
                status,
                cancel,
                actor,
                heartbeat,
            },
            event_rx,
        )
    }

    /// Current connection state.
    #[must_use]
    pub fn status(&self) -> ConnectionState {
        self.status.state()
    }

    /// Most recent successfully parsed inbound message.
    #[must_use]
    pub fn last_message(&self) -> Option<InboundMessage> {
        self.status.last_message()
    }

    /// Request streaming of `symbol`.
    ///
    /// Sent immediately while connected; otherwise queued and flushed on
    /// the next open. The desired symbol survives reconnects until
    /// [`unsubscribe`](Self::unsubscribe).
    pub async fn subscribe(&self, symbol: impl Into<String>) {
        self.send_command(Command::Subscribe(symbol.into())).await;
    }

    /// Stop streaming of `symbol`.
    pub async fn unsubscribe(&self, symbol: impl Into<String>) {
        self.send_command(Command::Unsubscribe(symbol.into())).await;
    }

    /// Send an arbitrary JSON payload verbatim.
    ///
    /// Dropped with a warning while not connected; sends are never
    /// queued for later delivery.
    pub async fn send_message(&self, payload: serde_json::Value) {
        self.send_command(Command::Send(payload)).await;
    }

    /// Drop the current connection, reset the attempt budget and
    /// connect again. The only way to resume after the automatic
    /// attempts are exhausted.
    pub async fn reconnect(&self) {
        self.send_command(Command::Reconnect).await;
    }

    /// Close the connection and suppress automatic reconnects.
    /// Idempotent; [`reconnect`](Self::reconnect) resumes.
    pub async fn disconnect(&self) {
        self.send_command(Command::Disconnect).await;
    }

    /// Tear the client down permanently and wait for its tasks.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        let _ = (&mut self.actor).await;
        let _ = (&mut self.heartbeat).await;
    }

    async fn send_command(&self, command: Command) {
        if self.command_tx.send(command).await.is_err() {
            tracing::debug!("stream client already shut down, dropping command");
        }
    }
}

impl Drop for StreamClient {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// =============================================================================
// Connection actor
// =============================================================================

/// State the session helpers share immutably.
struct ActorContext {
    status: Arc<ClientStatus>,
    event_tx: mpsc::Sender<ClientEvent>,
    codec: FrameCodec,
}

impl ActorContext {
    async fn emit(&self, event: ClientEvent) {
        let _ = self.event_tx.send(event).await;
    }
}

/// How a connected session ended.
enum SessionEnd {
    /// The transport closed or errored out.
    Closed,
    /// The caller asked for a manual disconnect.
    Disconnect,
    /// The caller asked for an immediate reconnect.
    Reconnect,
    /// The client is being torn down.
    Teardown,
}

/// How a retry delay ended.
enum RetryWait {
    Elapsed,
    ReconnectNow,
    Disconnected,
    Cancelled,
}

/// The connection actor. Owns the transport, the subscription slot and
/// the retry budget; the only place client state mutates.
struct ConnectionActor<T: Transport> {
    transport: T,
    config: StreamClientConfig,
    shared: ActorContext,
    slot: SubscriptionSlot,
    command_rx: mpsc::Receiver<Command>,
    tick_rx: mpsc::Receiver<HeartbeatTick>,
    cancel: CancellationToken,
}

impl<T: Transport> ConnectionActor<T> {
    async fn run(self) {
        let Self {
            transport,
            config,
            shared,
            mut slot,
            mut command_rx,
            mut tick_rx,
            cancel,
        } = self;
        let mut policy = ReconnectPolicy::new(config.reconnect.clone());

        loop {
            if cancel.is_cancelled() {
                break;
            }

            shared.status.set_state(ConnectionState::Connecting);
            tracing::info!(url = %config.url, "connecting to signal stream");

            let result = tokio::select! {
                () = cancel.cancelled() => break,
                result = transport.connect(&config.url) => result,
            };

            match result {
                Ok((sink, stream)) => {
                    policy.reset();
                    let end = run_session(
                        &shared,
                        &mut slot,
                        &mut command_rx,
                        &mut tick_rx,
                        &cancel,
                        sink,
                        stream,
                    )
                    .await;
                    match end {
                        SessionEnd::Teardown => break,
                        SessionEnd::Reconnect => {
                            policy.reset();
                            continue;
                        }
                        SessionEnd::Disconnect => {
                            policy.exhaust();
                            shared.status.set_state(ConnectionState::Disconnected);
                            shared.emit(ClientEvent::Disconnected).await;
                            tracing::info!("signal stream disconnected by caller");
                            if idle_until_reconnect(&mut slot, &mut command_rx, &mut tick_rx, &cancel)
                                .await
                            {
                                policy.reset();
                                continue;
                            }
                            break;
                        }
                        SessionEnd::Closed => {}
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "signal stream connection failed");
                    shared.status.set_state(ConnectionState::Error);
                    shared.emit(ClientEvent::Error(e.to_string())).await;
                    // A failed open still closes at the socket level,
                    // which is what feeds the reconnection check.
                    shared.status.set_state(ConnectionState::Disconnected);
                    shared.emit(ClientEvent::Disconnected).await;
                }
            }

            match policy.next_delay() {
                Some(delay) => {
                    let attempt = policy.attempts_used();
                    shared.emit(ClientEvent::Reconnecting { attempt }).await;
                    tracing::info!(
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "reconnect scheduled"
                    );
                    match wait_retry(&mut slot, &mut command_rx, &mut tick_rx, &cancel, delay).await
                    {
                        RetryWait::Elapsed => {}
                        RetryWait::ReconnectNow => policy.reset(),
                        RetryWait::Disconnected => {
                            policy.exhaust();
                            if idle_until_reconnect(&mut slot, &mut command_rx, &mut tick_rx, &cancel)
                                .await
                            {
                                policy.reset();
                            } else {
                                break;
                            }
                        }
                        RetryWait::Cancelled => break,
                    }
                }
                None => {
                    tracing::warn!("reconnect attempts exhausted, waiting for manual reconnect");
                    if idle_until_reconnect(&mut slot, &mut command_rx, &mut tick_rx, &cancel).await
                    {
                        policy.reset();
                    } else {
                        break;
                    }
                }
            }
        }

        shared.status.set_state(ConnectionState::Disconnected);
        tracing::debug!("stream client actor stopped");
    }
}

/// Drive one open connection until it closes or the caller intervenes.
async fn run_session<S: TransportSink, R: TransportStream>(
    shared: &ActorContext,
    slot: &mut SubscriptionSlot,
    command_rx: &mut mpsc::Receiver<Command>,
    tick_rx: &mut mpsc::Receiver<HeartbeatTick>,
    cancel: &CancellationToken,
    mut sink: S,
    mut stream: R,
) -> SessionEnd {
    shared.status.set_state(ConnectionState::Connected);
    shared.emit(ClientEvent::Connected).await;
    tracing::info!("signal stream connected");

    if let Some(symbol) = slot.flush_on_open() {
        send_frame(shared, &mut sink, &OutboundFrame::subscribe(symbol)).await;
    }

    // Ticks buffered while disconnected are stale, not due pings.
    while tick_rx.try_recv().is_ok() {}

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                sink.close().await;
                return SessionEnd::Teardown;
            }
            tick = tick_rx.recv() => {
                if tick.is_some() && shared.status.state().is_connected() {
                    send_frame(shared, &mut sink, &OutboundFrame::Ping).await;
                }
            }
            command = command_rx.recv() => match command {
                Some(Command::Subscribe(symbol)) => {
                    let connected = shared.status.state().is_connected();
                    let changes = slot.request(&symbol, connected);
                    apply_changes(shared, &mut sink, changes).await;
                }
                Some(Command::Unsubscribe(symbol)) => {
                    let connected = shared.status.state().is_connected();
                    let changes = slot.release(&symbol, connected);
                    apply_changes(shared, &mut sink, changes).await;
                }
                Some(Command::Send(payload)) => {
                    if shared.status.state().is_connected() {
                        send_raw(shared, &mut sink, &payload).await;
                    } else {
                        tracing::warn!("dropping message sent while not connected");
                    }
                }
                Some(Command::Reconnect) => {
                    sink.close().await;
                    return SessionEnd::Reconnect;
                }
                Some(Command::Disconnect) => {
                    sink.close().await;
                    return SessionEnd::Disconnect;
                }
                None => {
                    sink.close().await;
                    return SessionEnd::Teardown;
                }
            },
            event = stream.next_event() => match event {
                Some(TransportEvent::Frame(text)) => dispatch_frame(shared, &text).await,
                Some(TransportEvent::Error(e)) => {
                    tracing::warn!(error = %e, "signal stream transport error");
                    shared.status.set_state(ConnectionState::Error);
                    shared.emit(ClientEvent::Error(e.to_string())).await;
                }
                Some(TransportEvent::Closed) | None => {
                    tracing::info!("signal stream closed");
                    shared.status.set_state(ConnectionState::Disconnected);
                    shared.emit(ClientEvent::Disconnected).await;
                    return SessionEnd::Closed;
                }
            },
        }
    }
}

/// Wait out one retry delay while still honoring caller commands.
async fn wait_retry(
    slot: &mut SubscriptionSlot,
    command_rx: &mut mpsc::Receiver<Command>,
    tick_rx: &mut mpsc::Receiver<HeartbeatTick>,
    cancel: &CancellationToken,
    delay: Duration,
) -> RetryWait {
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            () = cancel.cancelled() => return RetryWait::Cancelled,
            () = &mut sleep => return RetryWait::Elapsed,
            _tick = tick_rx.recv() => {} // not connected, skip silently
            command = command_rx.recv() => match command {
                Some(Command::Subscribe(symbol)) => {
                    let _ = slot.request(&symbol, false);
                }
                Some(Command::Unsubscribe(symbol)) => {
                    let _ = slot.release(&symbol, false);
                }
                Some(Command::Send(_)) => {
                    tracing::warn!("dropping message sent while not connected");
                }
                Some(Command::Reconnect) => return RetryWait::ReconnectNow,
                Some(Command::Disconnect) => return RetryWait::Disconnected,
                None => return RetryWait::Cancelled,
            },
        }
    }
}

/// Park while disconnected with the attempt budget spent.
///
/// Returns `true` when the caller requests a reconnect, `false` on
/// teardown.
async fn idle_until_reconnect(
    slot: &mut SubscriptionSlot,
    command_rx: &mut mpsc::Receiver<Command>,
    tick_rx: &mut mpsc::Receiver<HeartbeatTick>,
    cancel: &CancellationToken,
) -> bool {
    loop {
        tokio::select! {
            () = cancel.cancelled() => return false,
            _tick = tick_rx.recv() => {} // not connected, skip silently
            command = command_rx.recv() => match command {
                Some(Command::Subscribe(symbol)) => {
                    let _ = slot.request(&symbol, false);
                }
                Some(Command::Unsubscribe(symbol)) => {
                    let _ = slot.release(&symbol, false);
                }
                Some(Command::Send(_)) => {
                    tracing::warn!("dropping message sent while not connected");
                }
                Some(Command::Reconnect) => return true,
                Some(Command::Disconnect) => {} // already disconnected
                None => return false,
            },
        }
    }
}

/// Parse an inbound frame, store it and fan it out.
///
/// A malformed frame is logged and dropped; it never breaks the stream.
async fn dispatch_frame(shared: &ActorContext, text: &str) {
    match shared.codec.decode(text) {
        Ok(message) => {
            shared.status.record_message(message.clone());
            shared.emit(ClientEvent::Message(message)).await;
        }
        Err(e) => tracing::warn!(error = %e, "dropping malformed frame"),
    }
}

/// Encode and send one control frame.
async fn send_frame<S: TransportSink>(shared: &ActorContext, sink: &mut S, frame: &OutboundFrame) {
    match shared.codec.encode(frame) {
        Ok(text) => {
            if let Err(e) = sink.send(&text).await {
                tracing::warn!(error = %e, frame = ?frame, "failed to send frame");
            }
        }
        Err(e) => tracing::warn!(error = %e, "failed to encode frame"),
    }
}

/// Send a caller payload verbatim.
async fn send_raw<S: TransportSink>(shared: &ActorContext, sink: &mut S, payload: &serde_json::Value) {
    match shared.codec.encode(payload) {
        Ok(text) => {
            if let Err(e) = sink.send(&text).await {
                tracing::warn!(error = %e, "failed to send message");
            }
        }
        Err(e) => tracing::warn!(error = %e, "failed to encode message"),
    }
}

/// Send the frames a slot operation produced, unsubscribe first.
async fn apply_changes<S: TransportSink>(shared: &ActorContext, sink: &mut S, changes: SlotChanges) {
    if let Some(symbol) = changes.unsubscribe {
        send_frame(shared, sink, &OutboundFrame::unsubscribe(symbol)).await;
    }
    if let Some(symbol) = changes.subscribe {
        send_frame(shared, sink, &OutboundFrame::subscribe(symbol)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_disconnected() {
        let status = ClientStatus::default();
        assert_eq!(status.state(), ConnectionState::Disconnected);
        assert!(status.last_message().is_none());
    }

    #[test]
    fn status_records_latest_message() {
        let status = ClientStatus::default();
        let first = InboundMessage {
            kind: "market_update".to_string(),
            symbol: Some("XAUUSD".to_string()),
            data: None,
            timestamp: None,
            message: None,
        };
        let second = InboundMessage {
            kind: "prediction_update".to_string(),
            ..first.clone()
        };

        status.record_message(first);
        status.record_message(second.clone());

        assert_eq!(status.last_message(), Some(second));
    }

    #[test]
    fn config_applies_defaults() {
        let config = StreamClientConfig::new("ws://localhost:8000/ws");
        assert_eq!(config.url, "ws://localhost:8000/ws");
        assert_eq!(config.reconnect.max_attempts, 10);
        assert_eq!(config.heartbeat.period, Duration::from_secs(30));
    }
}
