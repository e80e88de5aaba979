//! Repository for the `claims` table.

use lostfound_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::claim::{Claim, CreateClaim};
use crate::models::status::ClaimStatus;
use crate::DbTransaction;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, claimant_user_id, item_type, item_id, description, question_text, \
    options, correct_option_id, status_id, attempts, created_at, updated_at";

/// Provides CRUD operations for ownership claims.
pub struct ClaimRepo;

impl ClaimRepo {
    /// Insert a new claim with status `pending` and zero attempts.
    pub async fn create(pool: &PgPool, input: &CreateClaim) -> Result<Claim, sqlx::Error> {
        let query = format!(
            "INSERT INTO claims
                (claimant_user_id, item_type, item_id, description, question_text,
                 options, correct_option_id, status_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Claim>(&query)
            .bind(input.claimant_user_id)
            .bind(&input.item_type)
            .bind(input.item_id)
            .bind(&input.description)
            .bind(&input.question_text)
            .bind(Json(&input.options))
            .bind(&input.correct_option_id)
            .bind(ClaimStatus::Pending.id())
            .fetch_one(pool)
            .await
    }

    /// Find a claim by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Claim>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM claims WHERE id = $1");
        sqlx::query_as::<_, Claim>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List claims made by a user, newest first.
    pub async fn list_by_claimant(
        pool: &PgPool,
        claimant_user_id: DbId,
    ) -> Result<Vec<Claim>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM claims
             WHERE claimant_user_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Claim>(&query)
            .bind(claimant_user_id)
            .fetch_all(pool)
            .await
    }

    /// List claims against one item.
    pub async fn list_for_item(
        pool: &PgPool,
        item_type: &str,
        item_id: DbId,
    ) -> Result<Vec<Claim>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM claims
             WHERE item_type = $1 AND item_id = $2
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Claim>(&query)
            .bind(item_type)
            .bind(item_id)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Transactional helpers
    // -----------------------------------------------------------------------

    /// Lock a claim row for the rest of the transaction.
    pub async fn lock(tx: &mut DbTransaction<'_>, id: DbId) -> Result<Option<Claim>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM claims WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Claim>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Count one verification attempt and store its outcome.
    pub async fn record_attempt(
        tx: &mut DbTransaction<'_>,
        id: DbId,
        status: ClaimStatus,
    ) -> Result<Claim, sqlx::Error> {
        let query = format!(
            "UPDATE claims SET
                attempts   = attempts + 1,
                status_id  = $2,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Claim>(&query)
            .bind(id)
            .bind(status.id())
            .fetch_one(&mut **tx)
            .await
    }
}
