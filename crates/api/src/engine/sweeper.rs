//! Promotion of due `SCHEDULED` articles to `PUBLISHED`.
//!
//! One sweep serves both the background loop and the cron trigger. Each
//! article is promoted by its own conditional update, so concurrent sweeps
//! (or a manual publish racing the sweep) promote an article at most once.

use masthead_core::audit::actions;
use masthead_core::workflow::ArticleStatus;
use masthead_db::repositories::ArticleRepo;
use masthead_db::DbPool;
use masthead_events::{event_types, EventBus, PlatformEvent};
use serde::Serialize;
use serde_json::json;

use super::{record_activity, Actor};

/// Result of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Articles this sweep promoted.
    pub published_count: u64,
    /// Articles whose promotion failed and will be retried next sweep.
    pub failed_count: u64,
}

/// Promote up to `batch_size` due articles.
///
/// Only the due-list query can fail the sweep; per-article failures are
/// logged and skipped.
pub async fn sweep(
    pool: &DbPool,
    bus: &EventBus,
    batch_size: i64,
) -> Result<SweepReport, sqlx::Error> {
    let due = ArticleRepo::list_due_scheduled(pool, batch_size).await?;
    let mut report = SweepReport::default();

    for article in due {
        match ArticleRepo::publish(pool, article.id, ArticleStatus::Scheduled, None).await {
            Ok(Some(published)) => {
                report.published_count += 1;

                record_activity(
                    pool,
                    &Actor::system(),
                    &published,
                    actions::PUBLISHED,
                    None,
                    json!({
                        "scheduled_at": article.scheduled_at,
                        "published_at": published.published_at,
                    }),
                )
                .await;

                bus.publish(
                    PlatformEvent::new(
                        event_types::ARTICLE_PUBLISHED,
                        published.id,
                        published.title.clone(),
                        published.author_id,
                    )
                    .with_payload(json!({ "published_at": published.published_at })),
                );
            }
            Ok(None) => {
                tracing::debug!(article_id = article.id, "Scheduled article already handled");
            }
            Err(e) => {
                report.failed_count += 1;
                tracing::error!(
                    error = %e,
                    article_id = article.id,
                    "Failed to publish scheduled article"
                );
            }
        }
    }

    if report.published_count > 0 || report.failed_count > 0 {
        tracing::info!(
            published = report.published_count,
            failed = report.failed_count,
            "Scheduled publication sweep finished"
        );
    }

    Ok(report)
}
