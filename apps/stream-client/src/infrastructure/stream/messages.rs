//! Stream Frame Types
//!
//! Wire types for the `/ws` endpoint. Both directions carry JSON text
//! frames. Inbound payloads are opaque to the client core: `type`
//! discriminates the event kind for higher layers (market updates,
//! prediction updates, accuracy updates, suggestions), and the core only
//! stores and forwards them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A server-to-client frame.
///
/// Only `type` is required; every other field depends on the event kind
/// and is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Event kind discriminator, e.g. `"market_update"`.
    #[serde(rename = "type")]
    pub kind: String,

    /// Market symbol the event concerns, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,

    /// Opaque event payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Server-side event time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Human-readable message, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A client-to-server control frame.
///
/// Serializes to `{"type":"subscribe","symbol":...}`,
/// `{"type":"unsubscribe","symbol":...}` or `{"type":"ping"}`. Arbitrary
/// caller payloads bypass this type and are sent verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundFrame {
    /// Start streaming a symbol.
    Subscribe {
        /// Symbol to stream.
        symbol: String,
    },
    /// Stop streaming a symbol.
    Unsubscribe {
        /// Symbol to stop streaming.
        symbol: String,
    },
    /// Keepalive frame.
    Ping,
}

impl OutboundFrame {
    /// Build a subscribe frame.
    #[must_use]
    pub fn subscribe(symbol: impl Into<String>) -> Self {
        Self::Subscribe {
            symbol: symbol.into(),
        }
    }

    /// Build an unsubscribe frame.
    #[must_use]
    pub fn unsubscribe(symbol: impl Into<String>) -> Self {
        Self::Unsubscribe {
            symbol: symbol.into(),
        }
    }
}
