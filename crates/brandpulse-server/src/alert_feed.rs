//! In-process observer channel for freshly created alerts.
//!
//! Fire-and-forget: the monitoring handlers publish one event per alert row
//! they create, and the SSE endpoint fans events out to subscribed dashboard
//! clients, which react by re-fetching the full alert list. Nothing in the
//! pipeline depends on a subscriber being present — a missed event only
//! means a stale view until the next manual refresh.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

/// Payload pushed per new alert. Deliberately thin: consumers re-fetch the
/// alert list rather than relying on an incremental contract.
#[derive(Debug, Clone, Serialize)]
pub struct AlertEvent {
    pub id: i64,
    pub brand_id: i64,
    pub brand_name: String,
    pub alert_type: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AlertFeed {
    tx: broadcast::Sender<AlertEvent>,
}

impl AlertFeed {
    #[must_use]
    pub fn new(buffer: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer.max(1));
        Self { tx }
    }

    /// Publish an event to whoever is listening right now.
    pub fn publish(&self, event: AlertEvent) {
        // A send error just means no subscribers; that is the normal state
        // when no dashboard tab is open.
        let _ = self.tx.send(event);
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AlertEvent> {
        self.tx.subscribe()
    }
}
