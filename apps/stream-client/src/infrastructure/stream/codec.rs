//! Frame Codec
//!
//! JSON encoding and decoding for stream frames. A malformed inbound
//! frame is a codec error the dispatcher logs and drops; it never ends
//! the connection or reaches the caller.

use super::messages::InboundMessage;

/// Codec errors.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// JSON encoding/decoding failed.
    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSON codec for the signal stream.
#[derive(Debug, Default, Clone)]
pub struct FrameCodec;

impl FrameCodec {
    /// Create a new codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decode an inbound text frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON or lacks the
    /// `type` discriminator.
    pub fn decode(&self, text: &str) -> Result<InboundMessage, CodecError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Encode a value to a JSON text frame.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn encode<T: serde::Serialize>(&self, value: &T) -> Result<String, CodecError> {
        Ok(serde_json::to_string(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::stream::messages::OutboundFrame;
    use tokio_test::assert_ok;

    #[test]
    fn decode_market_update() {
        let codec = FrameCodec::new();
        let msg = assert_ok!(
            codec.decode(r#"{"type":"market_update","symbol":"XAUUSD","data":{"price":1.0}}"#)
        );
        assert_eq!(msg.kind, "market_update");
        assert_eq!(msg.symbol.as_deref(), Some("XAUUSD"));
    }

    #[test]
    fn decode_rejects_invalid_json() {
        let codec = FrameCodec::new();
        assert!(codec.decode("{not json").is_err());
    }

    #[test]
    fn decode_rejects_frame_without_type() {
        let codec = FrameCodec::new();
        assert!(codec.decode(r#"{"symbol":"XAUUSD"}"#).is_err());
    }

    #[test]
    fn decode_unknown_kind_passes_through() {
        // The core treats `type` opaquely; new server event kinds must
        // not break older clients.
        let codec = FrameCodec::new();
        let msg = assert_ok!(codec.decode(r#"{"type":"suggestion_update","data":[1,2,3]}"#));
        assert_eq!(msg.kind, "suggestion_update");
    }

    #[test]
    fn encode_control_frame() {
        let codec = FrameCodec::new();
        let text = assert_ok!(codec.encode(&OutboundFrame::Ping));
        assert_eq!(text, r#"{"type":"ping"}"#);
    }
}
