//! Event log listener.
//!
//! [`EventLog`] subscribes to the [`EventBus`](crate::bus::EventBus) and
//! writes every received [`MatchEvent`] as a structured `tracing` record. It
//! runs as a long-lived background task and stops when the bus is dropped.

use tokio::sync::broadcast;

use crate::bus::MatchEvent;

/// Background listener that records match and claim events.
pub struct EventLog;

impl EventLog {
    /// Run the logging loop until the channel closes.
    ///
    /// Returns the number of events recorded.
    pub async fn run(mut receiver: broadcast::Receiver<MatchEvent>) -> u64 {
        let mut recorded = 0;
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    Self::record(&event);
                    recorded += 1;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event log lagged, some events were not recorded");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!(recorded, "Event bus closed, event log shutting down");
                    break;
                }
            }
        }
        recorded
    }

    fn record(event: &MatchEvent) {
        match serde_json::to_string(event) {
            Ok(payload) => {
                tracing::info!(event_type = event.event_type(), %payload, "Event published");
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    event_type = event.event_type(),
                    "Failed to serialize event"
                );
            }
        }
    }
}
