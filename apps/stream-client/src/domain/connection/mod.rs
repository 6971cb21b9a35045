//! Connection State
//!
//! The lifecycle state of the stream client's single transport connection.
//! Exactly one value is current per client instance; transitions happen
//! only inside the connection actor.

/// Lifecycle state of the client's transport connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// A transport is being constructed / opened.
    Connecting,
    /// The transport has opened and no close or error has followed.
    Connected,
    /// No live transport. Initial and terminal state.
    #[default]
    Disconnected,
    /// The transport reported an error. The close that follows it drives
    /// the reconnection check; `Error` itself never schedules a retry.
    Error,
}

impl ConnectionState {
    /// Get the state name for logging.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::Error => "error",
        }
    }

    /// Check whether frames may be sent in this state.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_disconnected() {
        assert_eq!(ConnectionState::default(), ConnectionState::Disconnected);
    }

    #[test]
    fn only_connected_allows_sends() {
        assert!(ConnectionState::Connected.is_connected());
        assert!(!ConnectionState::Connecting.is_connected());
        assert!(!ConnectionState::Disconnected.is_connected());
        assert!(!ConnectionState::Error.is_connected());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(ConnectionState::Connecting.to_string(), "connecting");
        assert_eq!(ConnectionState::Error.to_string(), "error");
    }
}
