//! Match and claim events and the broadcast bus that carries them.
//!
//! [`EventBus`] is the hand-off point to notification delivery and is
//! shared as `Arc<EventBus>`. Publishing neither blocks nor fails.

use lostfound_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// MatchEvent
// ---------------------------------------------------------------------------

/// Something that happened to a match or a claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum MatchEvent {
    /// A new pending match was recorded.
    MatchCreated {
        match_id: DbId,
        lost_item_id: DbId,
        found_item_id: DbId,
        similarity_score: f64,
    },
    MatchConfirmed {
        match_id: DbId,
        lost_item_id: DbId,
        found_item_id: DbId,
        actor_user_id: DbId,
    },
    MatchRejected {
        match_id: DbId,
        actor_user_id: DbId,
    },
    ClaimInitiated {
        claim_id: DbId,
        claimant_user_id: DbId,
        item_type: String,
        item_id: DbId,
    },
    ClaimVerified {
        claim_id: DbId,
        claimant_user_id: DbId,
        passed: bool,
        attempts: i32,
    },
}

impl MatchEvent {
    /// Dot-separated event name, e.g. `"match.created"`.
    pub fn event_type(&self) -> &'static str {
        match self {
            MatchEvent::MatchCreated { .. } => "match.created",
            MatchEvent::MatchConfirmed { .. } => "match.confirmed",
            MatchEvent::MatchRejected { .. } => "match.rejected",
            MatchEvent::ClaimInitiated { .. } => "claim.initiated",
            MatchEvent::ClaimVerified { .. } => "claim.verified",
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Events buffered per subscriber before the slowest one starts lagging.
const DEFAULT_CAPACITY: usize = 256;

/// Fans [`MatchEvent`]s out to every subscriber in the process.
pub struct EventBus {
    sender: broadcast::Sender<MatchEvent>,
}

impl EventBus {
    /// A subscriber that falls more than `capacity` events behind loses the
    /// oldest ones and sees `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _initial) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Deliver `event` to whoever is listening. Never fails; with no
    /// subscribers the event is discarded.
    pub fn publish(&self, event: MatchEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("Event published with no subscribers");
        }
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<MatchEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
