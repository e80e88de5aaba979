//! Repository for the `item_matches` table.

use lostfound_core::types::DbId;
use sqlx::PgPool;

use crate::models::item_match::{CreateItemMatch, ItemMatch};
use crate::models::status::MatchStatus;
use crate::DbTransaction;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, lost_item_id, found_item_id, similarity_score, status_id, \
    created_at, updated_at";

/// Provides CRUD operations for lost/found pairings.
pub struct MatchRepo;

impl MatchRepo {
    /// Insert a pending match unless one already exists for the pair.
    ///
    /// Returns `None` when the `(lost_item_id, found_item_id)` pair is
    /// already recorded; the existing row is left untouched.
    pub async fn insert_if_absent(
        tx: &mut DbTransaction<'_>,
        input: &CreateItemMatch,
    ) -> Result<Option<ItemMatch>, sqlx::Error> {
        let query = format!(
            "INSERT INTO item_matches (lost_item_id, found_item_id, similarity_score, status_id)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ON CONSTRAINT uq_item_matches_pair DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ItemMatch>(&query)
            .bind(input.lost_item_id)
            .bind(input.found_item_id)
            .bind(input.similarity_score)
            .bind(MatchStatus::Pending.id())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Insert a pending match, failing on a duplicate pair.
    pub async fn create(pool: &PgPool, input: &CreateItemMatch) -> Result<ItemMatch, sqlx::Error> {
        let query = format!(
            "INSERT INTO item_matches (lost_item_id, found_item_id, similarity_score, status_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ItemMatch>(&query)
            .bind(input.lost_item_id)
            .bind(input.found_item_id)
            .bind(input.similarity_score)
            .bind(MatchStatus::Pending.id())
            .fetch_one(pool)
            .await
    }

    /// Find a match by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ItemMatch>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM item_matches WHERE id = $1");
        sqlx::query_as::<_, ItemMatch>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the match recorded for a lost/found pair, if any.
    pub async fn find_by_pair(
        pool: &PgPool,
        lost_item_id: DbId,
        found_item_id: DbId,
    ) -> Result<Option<ItemMatch>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM item_matches
             WHERE lost_item_id = $1 AND found_item_id = $2"
        );
        sqlx::query_as::<_, ItemMatch>(&query)
            .bind(lost_item_id)
            .bind(found_item_id)
            .fetch_optional(pool)
            .await
    }

    /// List matches involving a lost item, best score first.
    pub async fn list_for_lost_item(
        pool: &PgPool,
        lost_item_id: DbId,
    ) -> Result<Vec<ItemMatch>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM item_matches
             WHERE lost_item_id = $1
             ORDER BY similarity_score DESC, id"
        );
        sqlx::query_as::<_, ItemMatch>(&query)
            .bind(lost_item_id)
            .fetch_all(pool)
            .await
    }

    /// List matches involving a found item, best score first.
    pub async fn list_for_found_item(
        pool: &PgPool,
        found_item_id: DbId,
    ) -> Result<Vec<ItemMatch>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM item_matches
             WHERE found_item_id = $1
             ORDER BY similarity_score DESC, id"
        );
        sqlx::query_as::<_, ItemMatch>(&query)
            .bind(found_item_id)
            .fetch_all(pool)
            .await
    }

    /// List every match where the user owns the lost or the found item,
    /// newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<ItemMatch>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM item_matches
             WHERE lost_item_id IN (SELECT id FROM lost_items WHERE user_id = $1)
                OR found_item_id IN (SELECT id FROM found_items WHERE user_id = $1)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ItemMatch>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Transactional helpers
    // -----------------------------------------------------------------------

    /// Lock a match row for the rest of the transaction.
    pub async fn lock(tx: &mut DbTransaction<'_>, id: DbId) -> Result<Option<ItemMatch>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM item_matches WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, ItemMatch>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Set the status of a match and return the updated row.
    pub async fn set_status(
        tx: &mut DbTransaction<'_>,
        id: DbId,
        status: MatchStatus,
    ) -> Result<ItemMatch, sqlx::Error> {
        let query = format!(
            "UPDATE item_matches SET status_id = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ItemMatch>(&query)
            .bind(id)
            .bind(status.id())
            .fetch_one(&mut **tx)
            .await
    }
}
