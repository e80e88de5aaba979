//! Found item models and DTOs.

use lostfound_core::item::{ItemProfile, Polarity};
use lostfound_core::types::{DbId, ItemDate, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::status::{FoundItemStatus, StatusId};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `found_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FoundItem {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub image_url: Option<String>,
    pub found_location: String,
    pub found_date: ItemDate,
    /// Free-form grading such as `excellent`, `good`, `fair`, `poor`.
    pub condition: String,
    pub status_id: StatusId,
    #[serde(skip_serializing)]
    pub feature_tokens: Option<Vec<String>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl FoundItem {
    pub fn status(&self) -> Option<FoundItemStatus> {
        FoundItemStatus::from_id(self.status_id)
    }

    /// The polarity-neutral view used by scoring, filtering, and claims.
    pub fn profile(&self) -> ItemProfile {
        ItemProfile {
            id: self.id,
            polarity: Polarity::Found,
            user_id: self.user_id,
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            color: self.color.clone(),
            brand: self.brand.clone(),
            condition: Some(self.condition.clone()),
            location: self.found_location.clone(),
            date: Some(self.found_date),
            image_url: self.image_url.clone(),
            feature_tokens: self.feature_tokens.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// DTO for reporting a found item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFoundItem {
    pub user_id: DbId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub image_url: Option<String>,
    pub found_location: String,
    pub found_date: ItemDate,
    pub condition: String,
}
