//! Repository for the `found_items` table.

use lostfound_core::types::DbId;
use sqlx::PgPool;

use crate::models::found_item::{CreateFoundItem, FoundItem};
use crate::models::status::FoundItemStatus;
use crate::DbTransaction;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, user_id, title, description, category, color, brand, image_url, \
    found_location, found_date, condition, status_id, feature_tokens, \
    created_at, updated_at";

/// Provides CRUD operations for found item reports.
pub struct FoundItemRepo;

impl FoundItemRepo {
    /// Insert a new found item with status `available`.
    pub async fn create(pool: &PgPool, input: &CreateFoundItem) -> Result<FoundItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO found_items
                (user_id, title, description, category, color, brand, image_url,
                 found_location, found_date, condition)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FoundItem>(&query)
            .bind(input.user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.color)
            .bind(&input.brand)
            .bind(&input.image_url)
            .bind(&input.found_location)
            .bind(input.found_date)
            .bind(&input.condition)
            .fetch_one(pool)
            .await
    }

    /// Find a found item by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<FoundItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM found_items WHERE id = $1");
        sqlx::query_as::<_, FoundItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List found items in the given status, oldest first.
    pub async fn list_by_status(
        pool: &PgPool,
        status: FoundItemStatus,
    ) -> Result<Vec<FoundItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM found_items
             WHERE status_id = $1
             ORDER BY id"
        );
        sqlx::query_as::<_, FoundItem>(&query)
            .bind(status.id())
            .fetch_all(pool)
            .await
    }

    /// List found items that carry an image, optionally restricted to one
    /// category (compared case-insensitively).
    pub async fn list_with_image(
        pool: &PgPool,
        category: Option<&str>,
    ) -> Result<Vec<FoundItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM found_items
             WHERE image_url IS NOT NULL AND image_url <> ''
               AND ($1::TEXT IS NULL OR LOWER(category) = LOWER($1))
             ORDER BY id"
        );
        sqlx::query_as::<_, FoundItem>(&query)
            .bind(category)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Transactional helpers
    // -----------------------------------------------------------------------

    /// Lock a found item row for the rest of the transaction.
    pub async fn lock(tx: &mut DbTransaction<'_>, id: DbId) -> Result<Option<FoundItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM found_items WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, FoundItem>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Set the status of a found item. Returns `false` if no row matched.
    pub async fn set_status(
        tx: &mut DbTransaction<'_>,
        id: DbId,
        status: FoundItemStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE found_items SET status_id = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(status.id())
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store the cached scoring tokens for a found item.
    pub async fn set_feature_tokens(
        tx: &mut DbTransaction<'_>,
        id: DbId,
        tokens: &[String],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE found_items SET feature_tokens = $2 WHERE id = $1")
            .bind(id)
            .bind(tokens)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
