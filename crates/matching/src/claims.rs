//! Claim challenge engine: issues an image-recognition challenge for a
//! claimed item and checks the claimant's answer.
//!
//! Randomness comes from the [`StdRng`] handed to [`ClaimEngine::with_rng`],
//! so a seeded generator yields reproducible option sets.

use std::sync::{Arc, Mutex};

use lostfound_core::claim_challenge::{self, Challenge, ClaimTarget, MAX_DISTRACTORS};
use lostfound_core::item::{ItemProfile, Polarity};
use lostfound_core::types::DbId;
use lostfound_db::models::claim::{Claim, CreateClaim};
use lostfound_db::models::status::ClaimStatus;
use lostfound_db::repositories::{ClaimRepo, FoundItemRepo, LostItemRepo};
use lostfound_db::DbPool;
use lostfound_events::{EventBus, MatchEvent};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{MatchingError, MatchingResult};

/// A request to open an ownership claim on an item.
#[derive(Debug, Clone)]
pub struct InitiateClaim {
    pub claimant_user_id: DbId,
    pub target: ClaimTarget,
    pub item_id: DbId,
    /// The claimant's own description of the item.
    pub description: Option<String>,
}

/// The outcome of one verification attempt.
#[derive(Debug, Clone)]
pub struct ClaimVerification {
    pub passed: bool,
    pub claim: Claim,
}

/// Builds and verifies claim challenges.
pub struct ClaimEngine {
    pool: DbPool,
    events: Arc<EventBus>,
    rng: Mutex<StdRng>,
}

impl ClaimEngine {
    /// Create an engine seeded from the thread-local generator.
    pub fn new(pool: DbPool, events: Arc<EventBus>) -> Self {
        Self::with_rng(pool, events, StdRng::from_rng(&mut rand::rng()))
    }

    /// Create an engine drawing all randomness from `rng`.
    pub fn with_rng(pool: DbPool, events: Arc<EventBus>, rng: StdRng) -> Self {
        Self {
            pool,
            events,
            rng: Mutex::new(rng),
        }
    }

    /// Open a claim on an item that has an image.
    ///
    /// Distractors come from opposite-polarity items of the same category,
    /// widening to any item with an image when fewer than three are found.
    pub async fn initiate(&self, request: &InitiateClaim) -> MatchingResult<Claim> {
        let target = self.load_target(request.target, request.item_id).await?;
        let Some(target_image) = target.image_url().map(str::to_string) else {
            return Err(MatchingError::validation(
                "No image available for the target item to generate a challenge",
            ));
        };

        let pool = self.distractor_pool(&target).await?;
        let challenge = self.build(&target_image, &pool)?;

        let claim = ClaimRepo::create(
            &self.pool,
            &CreateClaim {
                claimant_user_id: request.claimant_user_id,
                item_type: request.target.as_str().to_string(),
                item_id: request.item_id,
                description: request.description.clone(),
                question_text: challenge.question_text,
                options: challenge.options,
                correct_option_id: challenge.correct_option_id,
            },
        )
        .await?;

        tracing::info!(
            claim_id = claim.id,
            claimant_user_id = request.claimant_user_id,
            item_type = %request.target,
            item_id = request.item_id,
            options = claim.options().len(),
            "Claim initiated"
        );
        self.events.publish(MatchEvent::ClaimInitiated {
            claim_id: claim.id,
            claimant_user_id: claim.claimant_user_id,
            item_type: claim.item_type.clone(),
            item_id: claim.item_id,
        });

        Ok(claim)
    }

    /// Check the claimant's selected option and record the attempt.
    ///
    /// Every call increments the attempt counter and sets the status from
    /// this answer alone, including on claims that already passed or failed.
    /// A missing claim or a non-claimant is refused before the selection is
    /// looked at; a blank selection is refused without recording an attempt.
    pub async fn verify(
        &self,
        claim_id: DbId,
        claimant_user_id: DbId,
        selected_option_id: &str,
    ) -> MatchingResult<ClaimVerification> {
        let mut tx = self.pool.begin().await?;

        let existing = ClaimRepo::lock(&mut tx, claim_id)
            .await?
            .ok_or_else(|| MatchingError::not_found("Claim", claim_id))?;

        if existing.claimant_user_id != claimant_user_id {
            tracing::warn!(claim_id, claimant_user_id, "Claim verification by non-claimant refused");
            return Err(MatchingError::forbidden("Not authorized to verify this claim"));
        }

        if selected_option_id.trim().is_empty() {
            return Err(MatchingError::validation("selected_option_id is required"));
        }

        let verdict =
            claim_challenge::evaluate_answer(&existing.correct_option_id, selected_option_id);
        let status = if verdict.is_passed() {
            ClaimStatus::Passed
        } else {
            ClaimStatus::Failed
        };

        let claim = ClaimRepo::record_attempt(&mut tx, claim_id, status).await?;
        tx.commit().await?;

        let passed = verdict.is_passed();
        tracing::info!(
            claim_id,
            claimant_user_id,
            passed,
            attempts = claim.attempts,
            "Claim verification recorded"
        );
        self.events.publish(MatchEvent::ClaimVerified {
            claim_id,
            claimant_user_id,
            passed,
            attempts: claim.attempts,
        });

        Ok(ClaimVerification { passed, claim })
    }

    /// Find a claim by id.
    pub async fn find(&self, claim_id: DbId) -> MatchingResult<Claim> {
        ClaimRepo::find_by_id(&self.pool, claim_id)
            .await?
            .ok_or_else(|| MatchingError::not_found("Claim", claim_id))
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn load_target(&self, target: ClaimTarget, id: DbId) -> MatchingResult<ItemProfile> {
        match target {
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

    async fn distractor_pool(&self, target: &ItemProfile) -> MatchingResult<Vec<String>> {
        let category = target.category();
        let same_category: Vec<ItemProfile> = match target.polarity.opposite() {
            Polarity::Lost => LostItemRepo::list_with_image(&self.pool, category)
                .await?
                .iter()
                .map(|item| item.profile())
                .collect(),
            Polarity::Found => FoundItemRepo::list_with_image(&self.pool, category)
                .await?
                .iter()
                .map(|item| item.profile())
                .collect(),
        };

        let narrow = claim_challenge::distractor_pool(target, &same_category, &[]);
        if narrow.len() >= MAX_DISTRACTORS {
            return Ok(narrow);
        }

        let mut any_with_image: Vec<ItemProfile> = LostItemRepo::list_with_image(&self.pool, None)
            .await?
            .iter()
            .map(|item| item.profile())
            .collect();
        any_with_image.extend(
            FoundItemRepo::list_with_image(&self.pool, None)
                .await?
                .iter()
                .map(|item| item.profile()),
        );

        tracing::debug!(
            item_id = target.id,
            same_category = narrow.len(),
            widened = any_with_image.len(),
            "Widening distractor pool"
        );
        Ok(claim_challenge::distractor_pool(target, &same_category, &any_with_image))
    }

    fn build(&self, target_image: &str, pool: &[String]) -> MatchingResult<Challenge> {
        // The guard is never held across an await.
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(claim_challenge::build_challenge(target_image, pool, &mut *rng)?)
    }
}
