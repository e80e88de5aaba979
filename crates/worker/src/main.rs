//! One-shot rematch sweep.
//!
//! Re-runs match creation for every active lost item and every available
//! found item, so reports submitted before a threshold change or while the
//! matcher was unavailable still get candidates. Existing pairs are skipped
//! by the lifecycle, so the sweep is safe to repeat.

use std::process::ExitCode;
use std::sync::Arc;

use lostfound_core::item::Polarity;
use lostfound_db::models::status::{FoundItemStatus, LostItemStatus};
use lostfound_db::repositories::{FoundItemRepo, LostItemRepo};
use lostfound_events::{EventBus, EventLog};
use lostfound_matching::{MatchLifecycle, MatchingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lostfound_worker=info,lostfound_matching=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            tracing::error!(error = %message, "Rematch sweep failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), String> {
    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;
    let config = MatchingConfig::from_env().map_err(|e| e.to_string())?;

    let pool = lostfound_db::create_pool(&database_url)
        .await
        .map_err(|e| format!("Failed to connect to database: {e}"))?;
    lostfound_db::health_check(&pool)
        .await
        .map_err(|e| format!("Database health check failed: {e}"))?;
    lostfound_db::run_migrations(&pool)
        .await
        .map_err(|e| format!("Failed to run migrations: {e}"))?;

    let events = Arc::new(EventBus::default());
    let event_log = tokio::spawn(EventLog::run(events.subscribe()));

    tracing::info!(
        similarity_threshold = config.similarity_threshold,
        match_limit = config.match_limit,
        "Rematch sweep starting"
    );

    let lifecycle = MatchLifecycle::new(pool.clone(), Arc::clone(&events), config);

    let lost_ids: Vec<_> = LostItemRepo::list_by_status(&pool, LostItemStatus::Active)
        .await
        .map_err(|e| e.to_string())?
        .into_iter()
        .map(|item| item.id)
        .collect();
    let found_ids: Vec<_> = FoundItemRepo::list_by_status(&pool, FoundItemStatus::Available)
        .await
        .map_err(|e| e.to_string())?
        .into_iter()
        .map(|item| item.id)
        .collect();

    let mut created = 0usize;
    let mut failed = 0usize;
    let work = lost_ids
        .into_iter()
        .map(|id| (Polarity::Lost, id))
        .chain(found_ids.into_iter().map(|id| (Polarity::Found, id)));

    for (polarity, item_id) in work {
        match lifecycle.create_matches_for_item(item_id, polarity).await {
            Ok(rows) => created += rows.len(),
            Err(e) => {
                failed += 1;
                tracing::error!(error = %e, item_id, polarity = %polarity, "Rematch failed for item");
            }
        }
    }

    tracing::info!(created, failed, "Rematch sweep finished");

    drop(lifecycle);
    drop(events);
    if let Err(e) = event_log.await {
        tracing::warn!(error = %e, "Event log task ended abnormally");
    }

    Ok(())
}
