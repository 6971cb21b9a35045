//! Reconnection Policy
//!
//! Fixed-interval, attempt-capped retry after a dropped connection. The
//! interval does not grow between attempts; the client is a UI-facing
//! component where a human can always trigger a manual reconnect, so the
//! retry schedule stays simple and bounded.

use std::time::Duration;

/// Default delay between reconnection attempts.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(3000);

/// Default maximum number of automatic attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Configuration for reconnection behavior.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay before each reconnection attempt.
    pub interval: Duration,
    /// Maximum number of automatic attempts before the client stays
    /// disconnected until a manual reconnect.
    pub max_attempts: u32,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl ReconnectConfig {
    /// Create a new configuration with custom values.
    #[must_use]
    pub const fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

/// Retry state for one client instance.
///
/// `attempts_used` counts closes consumed since the last successful
/// open; every successful open resets it to zero.
#[derive(Debug)]
pub struct ReconnectPolicy {
    config: ReconnectConfig,
    attempts_used: u32,
}

impl ReconnectPolicy {
    /// Create a new reconnection policy.
    #[must_use]
    pub const fn new(config: ReconnectConfig) -> Self {
        Self {
            config,
            attempts_used: 0,
        }
    }

    /// Consume one attempt and get the delay before it.
    ///
    /// Returns `None` once the attempt budget is spent; the caller then
    /// stays disconnected until [`reset`](Self::reset).
    #[must_use]
    pub const fn next_delay(&mut self) -> Option<Duration> {
        if self.attempts_used >= self.config.max_attempts {
            return None;
        }
        self.attempts_used += 1;
        Some(self.config.interval)
    }

    /// Reset the attempt counter after a successful open or a manual
    /// reconnect.
    pub const fn reset(&mut self) {
        self.attempts_used = 0;
    }

    /// Spend the whole budget, suppressing automatic reconnects. Used by
    /// manual disconnect.
    pub const fn exhaust(&mut self) {
        self.attempts_used = self.config.max_attempts;
    }

    /// Attempts consumed since the last reset.
    #[must_use]
    pub const fn attempts_used(&self) -> u32 {
        self.attempts_used
    }

    /// Whether the attempt budget is spent.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.attempts_used >= self.config.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn default_config_values() {
        let config = ReconnectConfig::default();
        assert_eq!(config.interval, Duration::from_millis(3000));
        assert_eq!(config.max_attempts, 10);
    }

    #[test]
    fn interval_is_fixed_across_attempts() {
        let mut policy = ReconnectPolicy::new(ReconnectConfig::new(Duration::from_millis(100), 5));

        for _ in 0..5 {
            assert_eq!(policy.next_delay(), Some(Duration::from_millis(100)));
        }
    }

    #[test_case(1; "single attempt")]
    #[test_case(3; "three attempts")]
    #[test_case(10; "default budget")]
    fn budget_is_capped(max_attempts: u32) {
        let mut policy =
            ReconnectPolicy::new(ReconnectConfig::new(Duration::from_millis(100), max_attempts));

        for k in 1..=max_attempts {
            assert!(policy.next_delay().is_some());
            assert_eq!(policy.attempts_used(), k);
        }

        assert!(policy.next_delay().is_none());
        assert!(policy.is_exhausted());
    }

    #[test]
    fn zero_max_attempts_never_retries() {
        let mut policy = ReconnectPolicy::new(ReconnectConfig::new(Duration::from_millis(100), 0));
        assert!(policy.next_delay().is_none());
        assert!(policy.is_exhausted());
    }

    #[test]
    fn reset_restores_full_budget() {
        let mut policy = ReconnectPolicy::new(ReconnectConfig::new(Duration::from_millis(100), 2));

        let _ = policy.next_delay();
        let _ = policy.next_delay();
        assert!(policy.next_delay().is_none());

        policy.reset();

        assert_eq!(policy.attempts_used(), 0);
        assert!(policy.next_delay().is_some());
    }

    #[test]
    fn exhaust_suppresses_retries() {
        let mut policy = ReconnectPolicy::new(ReconnectConfig::default());

        policy.exhaust();

        assert!(policy.is_exhausted());
        assert!(policy.next_delay().is_none());
    }
}
