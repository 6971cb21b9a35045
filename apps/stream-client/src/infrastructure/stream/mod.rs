//! Stream Client Core
//!
//! The real-time subscription client:
//!
//! - **client**: connection actor and public facade
//! - **codec**: JSON frame encoding/decoding
//! - **heartbeat**: client-lifetime keepalive timer
//! - **messages**: inbound/outbound frame types
//! - **reconnect**: fixed-interval, attempt-capped retry policy

pub mod client;
pub mod codec;
pub mod heartbeat;
pub mod messages;
pub mod reconnect;

pub use client::{ClientEvent, ClientStatus, StreamClient, StreamClientConfig};
pub use codec::{CodecError, FrameCodec};
pub use heartbeat::{HeartbeatConfig, HeartbeatTick, HeartbeatTimer};
pub use messages::{InboundMessage, OutboundFrame};
pub use reconnect::{ReconnectConfig, ReconnectPolicy};
