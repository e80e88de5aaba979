//! Match lifecycle: candidate generation, deduplicated persistence, and the
//! confirm/reject transitions.

use std::sync::Arc;

use lostfound_core::item::{ItemProfile, Polarity};
use lostfound_core::matching::{self, CandidateVerdict, ScoredCandidate, SearchHit, SearchQuery};
use lostfound_core::types::DbId;
use lostfound_db::models::item_match::{CreateItemMatch, ItemMatch};
use lostfound_db::models::status::{FoundItemStatus, LostItemStatus, MatchStatus};
use lostfound_db::repositories::{FoundItemRepo, LostItemRepo, MatchRepo};
use lostfound_db::{DbPool, DbTransaction};
use lostfound_events::{EventBus, MatchEvent};

use crate::config::MatchingConfig;
use crate::error::{MatchingError, MatchingResult};

/// Creates, confirms, and rejects lost/found pairings.
///
/// Cheap to clone; holds only the pool, the event bus, and configuration.
#[derive(Clone)]
pub struct MatchLifecycle {
    pool: DbPool,
    events: Arc<EventBus>,
    config: MatchingConfig,
}

impl MatchLifecycle {
    pub fn new(pool: DbPool, events: Arc<EventBus>, config: MatchingConfig) -> Self {
        Self {
            pool,
            events,
            config,
        }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Candidate generation
    // -----------------------------------------------------------------------

    /// Score, filter, and rank the opposite pool for one item without
    /// persisting anything.
    pub async fn find_candidates(
        &self,
        item_id: DbId,
        polarity: Polarity,
    ) -> MatchingResult<Vec<ScoredCandidate>> {
        let subject = self.load_profile(polarity, item_id).await?;
        self.rank_for(&subject).await
    }

    /// Record a pending match for each of the best candidates of an item.
    ///
    /// Pairs that already have a match are skipped without being re-scored.
    /// Returns only the rows created by this call. All inserts share one
    /// transaction; on failure nothing is kept.
    pub async fn create_matches_for_item(
        &self,
        item_id: DbId,
        polarity: Polarity,
    ) -> MatchingResult<Vec<ItemMatch>> {
        let subject = self.load_profile(polarity, item_id).await?;
        let candidates = self.rank_for(&subject).await?;

        let mut tx = self.pool.begin().await?;

        cache_tokens(&mut tx, &subject).await?;

        let mut created = Vec::with_capacity(candidates.len());
        let mut skipped = 0usize;
        for candidate in &candidates {
            let (lost_item_id, found_item_id) = polarity.orient(subject.id, candidate.item.id);
            let input = CreateItemMatch {
                lost_item_id,
                found_item_id,
                similarity_score: candidate.score,
            };
            match MatchRepo::insert_if_absent(&mut tx, &input).await? {
                Some(row) => created.push(row),
                None => skipped += 1,
            }
        }

        tx.commit().await?;

        tracing::info!(
            item_id,
            polarity = %polarity,
            candidates = candidates.len(),
            created = created.len(),
            skipped,
            "Matches created for item"
        );

        for row in &created {
            self.events.publish(MatchEvent::MatchCreated {
                match_id: row.id,
                lost_item_id: row.lost_item_id,
                found_item_id: row.found_item_id,
                similarity_score: row.similarity_score,
            });
        }

        Ok(created)
    }

    // -----------------------------------------------------------------------
    // Review transitions
    // -----------------------------------------------------------------------

    /// Confirm a match on behalf of the owner of either item.
    ///
    /// Marks the match `confirmed` and both items `matched` atomically.
    pub async fn confirm(&self, match_id: DbId, acting_user_id: DbId) -> MatchingResult<ItemMatch> {
        let mut tx = self.pool.begin().await?;
        let existing = lock_owned_match(&mut tx, match_id, acting_user_id).await?;

        let updated = MatchRepo::set_status(&mut tx, match_id, MatchStatus::Confirmed).await?;
        LostItemRepo::set_status(&mut tx, existing.lost_item_id, LostItemStatus::Matched).await?;
        FoundItemRepo::set_status(&mut tx, existing.found_item_id, FoundItemStatus::Matched)
            .await?;

        tx.commit().await?;

        tracing::info!(
            match_id,
            acting_user_id,
            lost_item_id = updated.lost_item_id,
            found_item_id = updated.found_item_id,
            "Match confirmed"
        );
        self.events.publish(MatchEvent::MatchConfirmed {
            match_id,
            lost_item_id: updated.lost_item_id,
            found_item_id: updated.found_item_id,
            actor_user_id: acting_user_id,
        });

        Ok(updated)
    }

    /// Reject a match on behalf of the owner of either item.
    ///
    /// Item statuses are left unchanged.
    pub async fn reject(&self, match_id: DbId, acting_user_id: DbId) -> MatchingResult<ItemMatch> {
        let mut tx = self.pool.begin().await?;
        lock_owned_match(&mut tx, match_id, acting_user_id).await?;

        let updated = MatchRepo::set_status(&mut tx, match_id, MatchStatus::Rejected).await?;

        tx.commit().await?;

        tracing::info!(match_id, acting_user_id, "Match rejected");
        self.events.publish(MatchEvent::MatchRejected {
            match_id,
            actor_user_id: acting_user_id,
        });

        Ok(updated)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Free-text search over the open pools selected by the query scope.
    pub async fn search(&self, query: &SearchQuery) -> MatchingResult<Vec<SearchHit>> {
        query.validate()?;
        let limit = matching::clamp_search_limit(query.limit, self.config.search_limit);

        let mut items = Vec::new();
        if query.scope.includes(Polarity::Lost) {
            items.extend(self.open_pool(Polarity::Lost).await?);
        }
        if query.scope.includes(Polarity::Found) {
            items.extend(self.open_pool(Polarity::Found).await?);
        }

        let searched = items.len();
        let hits = matching::rank_search(&query.composite_text(), items, limit);
        tracing::debug!(scope = %query.scope, searched, hits = hits.len(), "Search completed");
        Ok(hits)
    }

    /// Every match where the user owns the lost or the found item, newest
    /// first.
    pub async fn matches_for_user(&self, user_id: DbId) -> MatchingResult<Vec<ItemMatch>> {
        Ok(MatchRepo::list_for_user(&self.pool, user_id).await?)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn load_profile(&self, polarity: Polarity, id: DbId) -> MatchingResult<ItemProfile> {
        match polarity {
            Polarity::Lost => LostItemRepo::find_by_id(&self.pool, id)
                .await?
                .map(|item| item.profile())
                .ok_or_else(|| MatchingError::not_found("LostItem", id)),
            Polarity::Found => FoundItemRepo::find_by_id(&self.pool, id)
                .await?
                .map(|item| item.profile())
                .ok_or_else(|| MatchingError::not_found("FoundItem", id)),
        }
    }

    /// Items still open for matching: active lost reports or available
    /// found reports.
    async fn open_pool(&self, polarity: Polarity) -> MatchingResult<Vec<ItemProfile>> {
        let profiles: Vec<ItemProfile> = match polarity {
            Polarity::Lost => LostItemRepo::list_by_status(&self.pool, LostItemStatus::Active)
                .await?
                .iter()
                .map(|item| item.profile())
                .collect(),
            Polarity::Found => FoundItemRepo::list_by_status(&self.pool, FoundItemStatus::Available)
                .await?
                .iter()
                .map(|item| item.profile())
                .collect(),
        };
        Ok(profiles)
    }

    async fn rank_for(&self, subject: &ItemProfile) -> MatchingResult<Vec<ScoredCandidate>> {
        let pool = self.open_pool(subject.polarity.opposite()).await?;
        let pool_size = pool.len();
        let filter = self.config.filter();

        let ranked = matching::rank_candidates_observed(
            subject,
            pool,
            &filter,
            self.config.match_limit,
            |candidate, verdict| {
                if let CandidateVerdict::Rejected(reason) = verdict {
                    tracing::debug!(
                        subject_id = subject.id,
                        candidate_id = candidate.id,
                        %reason,
                        "Candidate rejected"
                    );
                }
            },
        );

        tracing::debug!(
            subject_id = subject.id,
            polarity = %subject.polarity,
            pool_size,
            ranked = ranked.len(),
            "Candidates ranked"
        );
        Ok(ranked)
    }
}

/// Store the subject's scoring tokens so later comparisons skip re-tokenizing.
async fn cache_tokens(tx: &mut DbTransaction<'_>, subject: &ItemProfile) -> MatchingResult<()> {
    if subject.feature_tokens.is_some() {
        return Ok(());
    }
    let tokens = subject.tokens();
    match subject.polarity {
        Polarity::Lost => LostItemRepo::set_feature_tokens(tx, subject.id, &tokens).await?,
        Polarity::Found => FoundItemRepo::set_feature_tokens(tx, subject.id, &tokens).await?,
    }
    Ok(())
}

/// Lock a match and both of its items, and check that the acting user owns
/// one of the items.
async fn lock_owned_match(
    tx: &mut DbTransaction<'_>,
    match_id: DbId,
    acting_user_id: DbId,
) -> MatchingResult<ItemMatch> {
    let existing = MatchRepo::lock(tx, match_id)
        .await?
        .ok_or_else(|| MatchingError::not_found("ItemMatch", match_id))?;
    let lost = LostItemRepo::lock(tx, existing.lost_item_id)
        .await?
        .ok_or_else(|| MatchingError::not_found("LostItem", existing.lost_item_id))?;
    let found = FoundItemRepo::lock(tx, existing.found_item_id)
        .await?
        .ok_or_else(|| MatchingError::not_found("FoundItem", existing.found_item_id))?;

    if lost.user_id != acting_user_id && found.user_id != acting_user_id {
        tracing::warn!(match_id, acting_user_id, "Match review by non-owner refused");
        return Err(MatchingError::forbidden(
            "Only the owner of the lost or found item can review this match",
        ));
    }

    Ok(existing)
}
