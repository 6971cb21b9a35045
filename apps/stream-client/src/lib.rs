#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Signalboard Stream Client - Real-Time Signal Subscriber
//!
//! Maintains a single WebSocket connection to the signal dashboard
//! backend and keeps one market symbol streaming across connection
//! drops. Lost connections are retried on a fixed interval up to a
//! bounded number of attempts; a manual reconnect always resumes.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Core connection logic with no external dependencies
//!   - `connection`: Connection lifecycle state machine
//!   - `subscription`: Single-symbol subscription slot
//!
//! - **Application**: Port definitions
//!   - `ports`: Transport interfaces the connection actor runs against
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `stream`: Connection actor, frame codec, heartbeat, retry policy
//!   - `ws`: `tokio-tungstenite` transport adapter
//!   - `config`: Configuration from environment variables
//!   - `telemetry`: Tracing subscriber setup
//!
//! # Data Flow
//!
//! ```text
//!                    ┌─────────────┐     ┌─────────────┐
//! Signal backend ───►│ Connection  │────►│ ClientEvent │───► Caller
//!   /ws endpoint ◄───│   actor     │◄────│  commands   │◄─── (facade)
//!                    └─────────────┘     └─────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Core connection types with no external dependencies.
pub mod domain;

/// Application layer - Port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::connection::ConnectionState;
pub use domain::subscription::{SlotChanges, SubscriptionSlot, Symbol};

// Transport ports (for integration tests and alternate transports)
pub use application::ports::{
    Transport, TransportError, TransportEvent, TransportSink, TransportStream,
};

// Stream client
pub use infrastructure::stream::{
    ClientEvent, ClientStatus, InboundMessage, OutboundFrame, StreamClient, StreamClientConfig,
};

// Infrastructure config
pub use infrastructure::config::StreamSettings;
