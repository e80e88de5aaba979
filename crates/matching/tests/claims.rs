//! Integration tests for the claim challenge engine.
//!
//! Exercises `ClaimEngine` against a real database:
//! - A well-stocked category yields four options with one correct image
//! - Sparse categories widen the distractor pool
//! - Correct and incorrect answers, attempt counting, re-evaluation
//! - Authorization and not-found handling leave claims untouched

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use assert_matches::assert_matches;
use lostfound_core::error::CoreError;
use lostfound_core::item::Polarity;
use lostfound_db::models::status::ClaimStatus;
use lostfound_events::{EventBus, MatchEvent};
use lostfound_matching::{ClaimEngine, InitiateClaim, MatchingError};
use sqlx::PgPool;

use common::*;

const TARGET_IMAGE: &str = "/img/found-phone.jpg";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Insert a found phone with an image, plus `distractors` lost electronics
/// with distinct images. Returns the found item id.
async fn seed_target(pool: &PgPool, distractors: usize) -> i64 {
    let mut target = found_report(2, "Black Samsung phone", "Cracked screen");
    target.image_url = Some(TARGET_IMAGE.to_string());
    let target = insert_found(pool, target).await;

    for i in 0..distractors {
        let mut lost = lost_report(10 + i as i64, &format!("Phone {i}"), "Some phone");
        lost.image_url = Some(format!("/img/lost-{i}.jpg"));
        insert_lost(pool, lost).await;
    }
    target.id
}

fn claim_request(claimant_user_id: i64, item_id: i64) -> InitiateClaim {
    InitiateClaim {
        claimant_user_id,
        target: Polarity::Found,
        item_id,
        description: Some("My phone, crack across the top corner".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Test: initiate
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_initiate_builds_four_options(pool: PgPool) {
    let (engine, events) = claim_engine(&pool, 17);
    let mut rx = events.subscribe();
    let item_id = seed_target(&pool, 5).await;

    let claim = engine.initiate(&claim_request(1, item_id)).await.unwrap();

    assert_eq!(claim.status(), Some(ClaimStatus::Pending));
    assert_eq!(claim.attempts, 0);
    assert_eq!(claim.item_type, "found");
    assert_eq!(claim.options().len(), 4);

    let correct: Vec<_> = claim
        .options()
        .iter()
        .filter(|o| o.id == claim.correct_option_id)
        .collect();
    assert_eq!(correct.len(), 1);
    assert_eq!(correct[0].image_url, TARGET_IMAGE);
    assert_eq!(
        claim.options().iter().filter(|o| o.image_url == TARGET_IMAGE).count(),
        1
    );

    let images: HashSet<_> = claim.options().iter().map(|o| o.image_url.as_str()).collect();
    assert_eq!(images.len(), 4, "distractor images must be distinct");

    assert_matches!(
        rx.recv().await.unwrap(),
        MatchEvent::ClaimInitiated { claim_id, .. } if claim_id == claim.id
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_initiate_widens_sparse_category(pool: PgPool) {
    let (engine, _events) = claim_engine(&pool, 3);
    let item_id = seed_target(&pool, 1).await;

    let mut other = found_report(30, "Red umbrella", "Folding umbrella");
    other.category = "accessories".to_string();
    other.image_url = Some("/img/umbrella.jpg".to_string());
    insert_found(&pool, other).await;

    let claim = engine.initiate(&claim_request(1, item_id)).await.unwrap();
    let images: HashSet<_> = claim.options().iter().map(|o| o.image_url.as_str()).collect();
    assert_eq!(
        images,
        HashSet::from([TARGET_IMAGE, "/img/lost-0.jpg", "/img/umbrella.jpg"])
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_initiate_without_image_is_rejected(pool: PgPool) {
    let (engine, _events) = claim_engine(&pool, 1);
    let item = insert_found(&pool, found_report(2, "Wallet", "Brown wallet")).await;

    assert_matches!(
        engine.initiate(&claim_request(1, item.id)).await,
        Err(MatchingError::Core(CoreError::Validation(_)))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_initiate_missing_item_is_not_found(pool: PgPool) {
    let (engine, _events) = claim_engine(&pool, 1);
    assert_matches!(
        engine.initiate(&claim_request(1, 777)).await,
        Err(MatchingError::Core(CoreError::NotFound { entity: "FoundItem", id: 777 }))
    );
}

// ---------------------------------------------------------------------------
// Test: verify
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_correct_answer_passes(pool: PgPool) {
    let (engine, _events) = claim_engine(&pool, 5);
    let item_id = seed_target(&pool, 3).await;
    let claim = engine.initiate(&claim_request(1, item_id)).await.unwrap();

    let outcome = engine
        .verify(claim.id, 1, &claim.correct_option_id)
        .await
        .unwrap();

    assert!(outcome.passed);
    assert_eq!(outcome.claim.status(), Some(ClaimStatus::Passed));
    assert_eq!(outcome.claim.attempts, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_wrong_answer_fails(pool: PgPool) {
    let (engine, events) = claim_engine(&pool, 5);
    let item_id = seed_target(&pool, 3).await;
    let claim = engine.initiate(&claim_request(1, item_id)).await.unwrap();
    let mut rx = events.subscribe();

    let wrong = claim
        .options()
        .iter()
        .find(|o| o.id != claim.correct_option_id)
        .unwrap();
    let outcome = engine.verify(claim.id, 1, &wrong.id).await.unwrap();

    assert!(!outcome.passed);
    assert_eq!(outcome.claim.status(), Some(ClaimStatus::Failed));
    assert_eq!(outcome.claim.attempts, 1);

    assert_matches!(
        rx.recv().await.unwrap(),
        MatchEvent::ClaimVerified { passed: false, attempts: 1, .. }
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_claim_can_pass_on_retry(pool: PgPool) {
    let (engine, _events) = claim_engine(&pool, 9);
    let item_id = seed_target(&pool, 3).await;
    let claim = engine.initiate(&claim_request(1, item_id)).await.unwrap();

    let failed = engine.verify(claim.id, 1, "not-an-option").await.unwrap();
    assert_eq!(failed.claim.status(), Some(ClaimStatus::Failed));

    let passed = engine
        .verify(claim.id, 1, &claim.correct_option_id)
        .await
        .unwrap();
    assert!(passed.passed);
    assert_eq!(passed.claim.status(), Some(ClaimStatus::Passed));
    assert_eq!(passed.claim.attempts, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_claimant_cannot_verify(pool: PgPool) {
    let (engine, _events) = claim_engine(&pool, 5);
    let item_id = seed_target(&pool, 3).await;
    let claim = engine.initiate(&claim_request(1, item_id)).await.unwrap();

    assert_matches!(
        engine.verify(claim.id, 2, &claim.correct_option_id).await,
        Err(MatchingError::Core(CoreError::Forbidden(_)))
    );

    let unchanged = engine.find(claim.id).await.unwrap();
    assert_eq!(unchanged.status(), Some(ClaimStatus::Pending));
    assert_eq!(unchanged.attempts, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_verify_missing_claim_is_not_found(pool: PgPool) {
    let (engine, _events) = claim_engine(&pool, 5);
    assert_matches!(
        engine.verify(31337, 1, "abc").await,
        Err(MatchingError::Core(CoreError::NotFound { entity: "Claim", .. }))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_blank_selection_is_rejected_without_an_attempt(pool: PgPool) {
    let (engine, _events) = claim_engine(&pool, 5);
    let item_id = seed_target(&pool, 3).await;
    let claim = engine.initiate(&claim_request(1, item_id)).await.unwrap();

    assert_matches!(
        engine.verify(claim.id, 1, "  ").await,
        Err(MatchingError::Core(CoreError::Validation(_)))
    );

    let unchanged = engine.find(claim.id).await.unwrap();
    assert_eq!(unchanged.status(), Some(ClaimStatus::Pending));
    assert_eq!(unchanged.attempts, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_lookup_and_ownership_precede_selection_check(pool: PgPool) {
    let (engine, _events) = claim_engine(&pool, 5);
    let item_id = seed_target(&pool, 3).await;
    let claim = engine.initiate(&claim_request(1, item_id)).await.unwrap();

    assert_matches!(
        engine.verify(claim.id, 2, "").await,
        Err(MatchingError::Core(CoreError::Forbidden(_)))
    );
    assert_matches!(
        engine.verify(claim.id + 1000, 1, "").await,
        Err(MatchingError::Core(CoreError::NotFound { entity: "Claim", .. }))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unseeded_engine_issues_valid_challenge(pool: PgPool) {
    let events = Arc::new(EventBus::default());
    let engine = ClaimEngine::new(pool.clone(), events);
    let item_id = seed_target(&pool, 4).await;

    let claim = engine.initiate(&claim_request(1, item_id)).await.unwrap();

    assert_eq!(claim.options().len(), 4);
    let correct = claim
        .options()
        .iter()
        .find(|o| o.id == claim.correct_option_id)
        .unwrap();
    assert_eq!(correct.image_url, TARGET_IMAGE);

    let outcome = engine
        .verify(claim.id, 1, &claim.correct_option_id)
        .await
        .unwrap();
    assert!(outcome.passed);
}
