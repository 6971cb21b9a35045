//! Stream Client Configuration Settings
//!
//! Configuration types for the stream client, loaded from environment
//! variables. Every variable has a working default so a local dashboard
//! backend needs zero configuration.

use std::time::Duration;

use crate::infrastructure::stream::{HeartbeatConfig, ReconnectConfig, StreamClientConfig};

/// Default signal stream URL for a local dashboard backend.
pub const DEFAULT_URL: &str = "ws://localhost:8000/ws";

/// Complete stream client configuration.
#[derive(Debug, Clone)]
pub struct StreamSettings {
    /// WebSocket URL of the signal stream.
    pub url: String,
    /// Delay between reconnection attempts.
    pub reconnect_interval: Duration,
    /// Maximum automatic reconnection attempts.
    pub max_reconnect_attempts: u32,
    /// Period between keepalive pings.
    pub heartbeat_period: Duration,
    /// Symbol to subscribe to on startup, if any.
    pub symbol: Option<String>,
}

impl Default for StreamSettings {
    fn default() -> Self {
        let reconnect = ReconnectConfig::default();
        Self {
            url: DEFAULT_URL.to_string(),
            reconnect_interval: reconnect.interval,
            max_reconnect_attempts: reconnect.max_attempts,
            heartbeat_period: HeartbeatConfig::default().period,
            symbol: None,
        }
    }
}

impl StreamSettings {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("STREAM_CLIENT_URL").unwrap_or(defaults.url),
            reconnect_interval: parse_env_duration_millis(
                "STREAM_CLIENT_RECONNECT_INTERVAL_MS",
                defaults.reconnect_interval,
            ),
            max_reconnect_attempts: parse_env_u32(
                "STREAM_CLIENT_MAX_RECONNECT_ATTEMPTS",
                defaults.max_reconnect_attempts,
            ),
            heartbeat_period: parse_env_duration_secs(
                "STREAM_CLIENT_HEARTBEAT_PERIOD_SECS",
                defaults.heartbeat_period,
            ),
            symbol: std::env::var("STREAM_CLIENT_SYMBOL")
                .ok()
                .filter(|s| !s.is_empty()),
        }
    }

    /// Build the client configuration these settings describe.
    #[must_use]
    pub fn client_config(&self) -> StreamClientConfig {
        StreamClientConfig {
            url: self.url.clone(),
            reconnect: ReconnectConfig::new(self.reconnect_interval, self.max_reconnect_attempts),
            heartbeat: HeartbeatConfig::new(self.heartbeat_period),
        }
    }
}

fn parse_env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_env_duration_secs(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_secs)
}

fn parse_env_duration_millis(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let settings = StreamSettings::default();
        assert_eq!(settings.url, "ws://localhost:8000/ws");
        assert_eq!(settings.reconnect_interval, Duration::from_millis(3000));
        assert_eq!(settings.max_reconnect_attempts, 10);
        assert_eq!(settings.heartbeat_period, Duration::from_secs(30));
        assert!(settings.symbol.is_none());
    }

    #[test]
    fn client_config_mapping() {
        let settings = StreamSettings {
            url: "ws://example.test/ws".to_string(),
            reconnect_interval: Duration::from_millis(500),
            max_reconnect_attempts: 3,
            heartbeat_period: Duration::from_secs(10),
            symbol: Some("XAUUSD".to_string()),
        };

        let config = settings.client_config();

        assert_eq!(config.url, "ws://example.test/ws");
        assert_eq!(config.reconnect.interval, Duration::from_millis(500));
        assert_eq!(config.reconnect.max_attempts, 3);
        assert_eq!(config.heartbeat.period, Duration::from_secs(10));
    }
}
