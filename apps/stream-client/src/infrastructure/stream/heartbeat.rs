//! Heartbeat Timer
//!
//! Client-lifetime keepalive timer. Emits a tick on a fixed period; the
//! connection actor turns a tick into a `{"type":"ping"}` frame while
//! connected and drops it silently otherwise.
//!
//! The timer is started once at client construction, runs independently
//! of the reconnect schedule, and is stopped exactly once at teardown
//! through the client's cancellation token.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Default period between keepalive frames.
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(30);

/// Configuration for heartbeat behavior.
#[derive(Debug, Clone)]
pub struct HeartbeatConfig {
    /// Period between ticks.
    pub period: Duration,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
        }
    }
}

impl HeartbeatConfig {
    /// Create a new configuration with a custom period.
    #[must_use]
    pub const fn new(period: Duration) -> Self {
        Self { period }
    }
}

/// One heartbeat tick.
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatTick;

/// Periodic tick source for the connection actor.
pub struct HeartbeatTimer {
    config: HeartbeatConfig,
    tick_tx: mpsc::Sender<HeartbeatTick>,
    cancel: CancellationToken,
}

impl HeartbeatTimer {
    /// Create a new heartbeat timer.
    #[must_use]
    pub const fn new(
        config: HeartbeatConfig,
        tick_tx: mpsc::Sender<HeartbeatTick>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            tick_tx,
            cancel,
        }
    }

    /// Run the timer until cancelled or the receiver goes away.
    pub async fn run(self) {
        let start = tokio::time::Instant::now() + self.config.period;
        let mut interval = tokio::time::interval_at(start, self.config.period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                () = self.cancel.cancelled() => {
                    tracing::debug!("heartbeat timer cancelled");
                    break;
                }
                _ = interval.tick() => {
                    if self.tick_tx.send(HeartbeatTick).await.is_err() {
                        tracing::debug!("tick channel closed, stopping heartbeat");
                        break;
                    }
                }
            }
        }
    }
}
