//! Subscription Slot
//!
//! Domain type that makes "the caller wants symbol S streamed" survive
//! across reconnects.
//!
//! # Design
//!
//! The slot tracks exactly one desired symbol at a time, not a set.
//! The dashboard watches a single symbol per client, so the data model
//! is a single slot by contract:
//!
//! - **Desired**: the symbol the caller currently wants streamed. Once
//!   set it survives reconnects (it is re-sent on every open) until
//!   explicitly released.
//! - **Pending**: a symbol requested while not connected, queued to be
//!   sent on the next open instead of being lost.
//!
//! Slot operations return [`SlotChanges`] describing the frames the
//! connection layer must send; the slot itself never touches a socket.

/// A market symbol string (e.g. `"XAUUSD"`).
pub type Symbol = String;

/// Frames the connection layer must send as the result of a slot operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlotChanges {
    /// Symbol to send an unsubscribe frame for.
    pub unsubscribe: Option<Symbol>,
    /// Symbol to send a subscribe frame for.
    pub subscribe: Option<Symbol>,
}

impl SlotChanges {
    /// Check if there is anything to send.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.unsubscribe.is_none() && self.subscribe.is_none()
    }
}

/// Single-slot subscription registry.
#[derive(Debug, Default)]
pub struct SubscriptionSlot {
    desired: Option<Symbol>,
    pending: Option<Symbol>,
}

impl SubscriptionSlot {
    /// Create an empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            desired: None,
            pending: None,
        }
    }

    /// Record that the caller wants `symbol` streamed.
    ///
    /// While connected, returns the subscribe frame to send, preceded by
    /// an unsubscribe frame for a previously tracked different symbol.
    /// Re-requesting the symbol that is already current returns nothing,
    /// so no duplicate frame hits the wire.
    ///
    /// While disconnected, the symbol is stored as pending and flushed on
    /// the next open; no frames are returned.
    pub fn request(&mut self, symbol: &str, connected: bool) -> SlotChanges {
        if connected {
            if self.desired.as_deref() == Some(symbol) {
                return SlotChanges::default();
            }
            let previous = self.desired.replace(symbol.to_string());
            self.pending = None;
            SlotChanges {
                unsubscribe: previous,
                subscribe: Some(symbol.to_string()),
            }
        } else {
            self.desired = Some(symbol.to_string());
            self.pending = Some(symbol.to_string());
            SlotChanges::default()
        }
    }

    /// Record that the caller no longer wants `symbol` streamed.
    ///
    /// The unsubscribe frame is sent whenever connected, even for a
    /// symbol the slot is not tracking; tracked state is only cleared
    /// when `symbol` matches it.
    pub fn release(&mut self, symbol: &str, connected: bool) -> SlotChanges {
        if self.desired.as_deref() == Some(symbol) {
            self.desired = None;
        }
        if self.pending.as_deref() == Some(symbol) {
            self.pending = None;
        }
        SlotChanges {
            unsubscribe: connected.then(|| symbol.to_string()),
            subscribe: None,
        }
    }

    /// Symbol to subscribe on a fresh open, if any.
    ///
    /// A pending request wins and is consumed; otherwise the desired
    /// symbol is re-sent, since server-side subscriptions are not
    /// assumed to survive a dropped connection.
    pub fn flush_on_open(&mut self) -> Option<Symbol> {
        self.pending.take().or_else(|| self.desired.clone())
    }

    /// The symbol the caller currently wants streamed.
    #[must_use]
    pub fn desired(&self) -> Option<&str> {
        self.desired.as_deref()
    }

    /// The symbol queued while disconnected, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }
}
