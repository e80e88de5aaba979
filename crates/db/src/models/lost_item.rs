//! Lost item models and DTOs.

use lostfound_core::item::{ItemProfile, Polarity};
use lostfound_core::types::{DbId, ItemDate, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::status::{LostItemStatus, StatusId};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `lost_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LostItem {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub image_url: Option<String>,
    pub lost_location: String,
    pub lost_date: ItemDate,
    pub reward_amount: f64,
    pub status_id: StatusId,
    /// Cached scoring tokens; `None` until the item has been matched once.
    #[serde(skip_serializing)]
    pub feature_tokens: Option<Vec<String>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl LostItem {
    pub fn status(&self) -> Option<LostItemStatus> {
        LostItemStatus::from_id(self.status_id)
    }

    /// The polarity-neutral view used by scoring, filtering, and claims.
    pub fn profile(&self) -> ItemProfile {
        ItemProfile {
            id: self.id,
            polarity: Polarity::Lost,
            user_id: self.user_id,
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            color: self.color.clone(),
            brand: self.brand.clone(),
            condition: None,
            location: self.lost_location.clone(),
            date: Some(self.lost_date),
            image_url: self.image_url.clone(),
            feature_tokens: self.feature_tokens.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// DTO for reporting a lost item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLostItem {
    pub user_id: DbId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub image_url: Option<String>,
    pub lost_location: String,
    pub lost_date: ItemDate,
    pub reward_amount: Option<f64>,
}
