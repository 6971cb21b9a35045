//! Signalboard Stream Client Binary
//!
//! Connects to the signal dashboard backend and logs the event stream.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin stream-client
//! ```
//!
//! # Environment Variables
//!
//! All optional:
//! - `STREAM_CLIENT_URL`: Signal stream URL (default: `ws://localhost:8000/ws`)
//! - `STREAM_CLIENT_SYMBOL`: Symbol to subscribe to on startup
//! - `STREAM_CLIENT_RECONNECT_INTERVAL_MS`: Delay between reconnect attempts (default: 3000)
//! - `STREAM_CLIENT_MAX_RECONNECT_ATTEMPTS`: Automatic attempt budget (default: 10)
//! - `STREAM_CLIENT_HEARTBEAT_PERIOD_SECS`: Keepalive period (default: 30)
//! - `RUST_LOG`: Log level (default: info)

use anyhow::Context;
use stream_client::infrastructure::telemetry;
use stream_client::infrastructure::ws::WsTransport;
use stream_client::{ClientEvent, StreamClient, StreamSettings};
use tokio::signal;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls crypto provider"))?;

    let _ = dotenvy::dotenv();

    telemetry::init();

    tracing::info!("Starting signal stream client");

    let settings = StreamSettings::from_env();
    tracing::info!(
        url = %settings.url,
        reconnect_interval_ms = u64::try_from(settings.reconnect_interval.as_millis()).unwrap_or(u64::MAX),
        max_reconnect_attempts = settings.max_reconnect_attempts,
        heartbeat_period_secs = settings.heartbeat_period.as_secs(),
        "Configuration loaded"
    );

    let (client, event_rx) = StreamClient::start(WsTransport::new(), settings.client_config());

    if let Some(symbol) = &settings.symbol {
        tracing::info!(symbol = %symbol, "Subscribing on startup");
        client.subscribe(symbol.clone()).await;
    }

    let events = tokio::spawn(log_events(event_rx));

    signal::ctrl_c()
        .await
        .context("signal handler installation is critical for graceful shutdown")?;
    tracing::info!("Received Ctrl+C, shutting down");

    client.shutdown().await;
    let _ = events.await;

    tracing::info!("Signal stream client stopped");
    Ok(())
}

/// Log the client event stream until the client shuts down.
async fn log_events(mut rx: mpsc::Receiver<ClientEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            ClientEvent::Connected => tracing::info!("Stream connected"),
            ClientEvent::Disconnected => tracing::warn!("Stream disconnected"),
            ClientEvent::Reconnecting { attempt } => {
                tracing::info!(attempt, "Stream reconnecting");
            }
            ClientEvent::Message(message) => {
                tracing::info!(
                    kind = %message.kind,
                    symbol = message.symbol.as_deref().unwrap_or("-"),
                    "Stream message"
                );
            }
            ClientEvent::Error(msg) => tracing::error!(error = %msg, "Stream error"),
        }
    }
}
