#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use lostfound_db::models::found_item::{CreateFoundItem, FoundItem};
use lostfound_db::models::lost_item::{CreateLostItem, LostItem};
use lostfound_db::repositories::{FoundItemRepo, LostItemRepo};
use lostfound_events::EventBus;
use lostfound_matching::{ClaimEngine, MatchLifecycle, MatchingConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sqlx::PgPool;

/// Calendar day `n` of the test month.
pub fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, n).unwrap()
}

/// A lost report with the fields matching reads; adjust the rest per test.
pub fn lost_report(user_id: i64, title: &str, description: &str) -> CreateLostItem {
    CreateLostItem {
        user_id,
        title: title.to_string(),
        description: description.to_string(),
        category: "electronics".to_string(),
        color: Some("black".to_string()),
        brand: None,
        image_url: None,
        lost_location: "Central Park".to_string(),
        lost_date: day(1),
        reward_amount: None,
    }
}

/// A found report with the fields matching reads; adjust the rest per test.
pub fn found_report(user_id: i64, title: &str, description: &str) -> CreateFoundItem {
    CreateFoundItem {
        user_id,
        title: title.to_string(),
        description: description.to_string(),
        category: "electronics".to_string(),
        color: Some("black".to_string()),
        brand: None,
        image_url: None,
        found_location: "Central Park".to_string(),
        found_date: day(2),
        condition: "good".to_string(),
    }
}

pub async fn insert_lost(pool: &PgPool, input: CreateLostItem) -> LostItem {
    LostItemRepo::create(pool, &input).await.unwrap()
}

pub async fn insert_found(pool: &PgPool, input: CreateFoundItem) -> FoundItem {
    FoundItemRepo::create(pool, &input).await.unwrap()
}

/// Lifecycle with default configuration plus the bus it publishes to.
pub fn lifecycle(pool: &PgPool) -> (MatchLifecycle, Arc<EventBus>) {
    let events = Arc::new(EventBus::default());
    let lifecycle = MatchLifecycle::new(pool.clone(), Arc::clone(&events), MatchingConfig::default());
    (lifecycle, events)
}

/// Claim engine with a fixed seed plus the bus it publishes to.
pub fn claim_engine(pool: &PgPool, seed: u64) -> (ClaimEngine, Arc<EventBus>) {
    let events = Arc::new(EventBus::default());
    let engine = ClaimEngine::with_rng(pool.clone(), Arc::clone(&events), StdRng::seed_from_u64(seed));
    (engine, events)
}
