//! Infrastructure Layer - Adapters and external integrations.
//!
//! This layer contains the connection actor and the concrete
//! implementations of the port interfaces defined in the application
//! layer.

/// Stream client: connection actor, codec, heartbeat, reconnect policy.
pub mod stream;

/// WebSocket transport adapter (`tokio-tungstenite`).
pub mod ws;

/// Configuration loading.
pub mod config;

/// Tracing subscriber initialization.
pub mod telemetry;
