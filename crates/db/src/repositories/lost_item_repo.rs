//! Repository for the `lost_items` table.

use lostfound_core::types::DbId;
use sqlx::PgPool;

use crate::models::lost_item::{CreateLostItem, LostItem};
use crate::models::status::LostItemStatus;
use crate::DbTransaction;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, user_id, title, description, category, color, brand, image_url, \
    lost_location, lost_date, reward_amount, status_id, feature_tokens, \
    created_at, updated_at";

/// Provides CRUD operations for lost item reports.
pub struct LostItemRepo;

impl LostItemRepo {
    /// Insert a new lost item with status `active`.
    pub async fn create(pool: &PgPool, input: &CreateLostItem) -> Result<LostItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO lost_items
                (user_id, title, description, category, color, brand, image_url,
                 lost_location, lost_date, reward_amount)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10::DOUBLE PRECISION, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LostItem>(&query)
            .bind(input.user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.color)
            .bind(&input.brand)
            .bind(&input.image_url)
            .bind(&input.lost_location)
            .bind(input.lost_date)
            .bind(input.reward_amount)
            .fetch_one(pool)
            .await
    }

    /// Find a lost item by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<LostItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lost_items WHERE id = $1");
        sqlx::query_as::<_, LostItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List lost items in the given status, oldest first.
    pub async fn list_by_status(
        pool: &PgPool,
        status: LostItemStatus,
    ) -> Result<Vec<LostItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lost_items
             WHERE status_id = $1
             ORDER BY id"
        );
        sqlx::query_as::<_, LostItem>(&query)
            .bind(status.id())
            .fetch_all(pool)
            .await
    }

    /// List lost items that carry an image, optionally restricted to one
    /// category (compared case-insensitively).
    pub async fn list_with_image(
        pool: &PgPool,
        category: Option<&str>,
    ) -> Result<Vec<LostItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lost_items
             WHERE image_url IS NOT NULL AND image_url <> ''
               AND ($1::TEXT IS NULL OR LOWER(category) = LOWER($1))
             ORDER BY id"
        );
        sqlx::query_as::<_, LostItem>(&query)
            .bind(category)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Transactional helpers
    // -----------------------------------------------------------------------

    /// Lock a lost item row for the rest of the transaction.
    pub async fn lock(tx: &mut DbTransaction<'_>, id: DbId) -> Result<Option<LostItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lost_items WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, LostItem>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Set the status of a lost item. Returns `false` if no row matched.
    pub async fn set_status(
        tx: &mut DbTransaction<'_>,
        id: DbId,
        status: LostItemStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE lost_items SET status_id = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(status.id())
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store the cached scoring tokens for a lost item.
    pub async fn set_feature_tokens(
        tx: &mut DbTransaction<'_>,
        id: DbId,
        tokens: &[String],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE lost_items SET feature_tokens = $2 WHERE id = $1")
            .bind(id)
            .bind(tokens)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
