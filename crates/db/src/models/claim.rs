//! Ownership claim models and DTOs.
//!
//! The option set is stored as a JSONB array and never changes after insert.

use lostfound_core::claim_challenge::ChallengeOption;
use lostfound_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::status::{ClaimStatus, StatusId};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `claims` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Claim {
    pub id: DbId,
    pub claimant_user_id: DbId,
    /// `lost` or `found`.
    pub item_type: String,
    pub item_id: DbId,
    pub description: Option<String>,
    pub question_text: String,
    pub options: Json<Vec<ChallengeOption>>,
    #[serde(skip_serializing)]
    pub correct_option_id: String,
    pub status_id: StatusId,
    pub attempts: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Claim {
    pub fn status(&self) -> Option<ClaimStatus> {
        ClaimStatus::from_id(self.status_id)
    }

    pub fn options(&self) -> &[ChallengeOption] {
        &self.options.0
    }
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// DTO for persisting a freshly built challenge. New rows start as
/// `pending` with zero attempts.
#[derive(Debug, Clone)]
pub struct CreateClaim {
    pub claimant_user_id: DbId,
    pub item_type: String,
    pub item_id: DbId,
    pub description: Option<String>,
    pub question_text: String,
    pub options: Vec<ChallengeOption>,
    pub correct_option_id: String,
}
