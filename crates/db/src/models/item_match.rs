//! Lost/found pairing models and DTOs.

use lostfound_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::status::{MatchStatus, StatusId};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `item_matches` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ItemMatch {
    pub id: DbId,
    pub lost_item_id: DbId,
    pub found_item_id: DbId,
    pub similarity_score: f64,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ItemMatch {
    pub fn status(&self) -> Option<MatchStatus> {
        MatchStatus::from_id(self.status_id)
    }
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// DTO for recording a candidate pairing. New rows start as `pending`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItemMatch {
    pub lost_item_id: DbId,
    pub found_item_id: DbId,
    pub similarity_score: f64,
}
