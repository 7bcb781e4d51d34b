//! Operator schedule control: publish now, schedule, cancel schedule.

use masthead_core::audit::actions;
use masthead_core::publishing::ScheduleCommand;
use masthead_core::types::DbId;
use masthead_db::models::article::Article;
use masthead_db::repositories::ArticleRepo;
use masthead_db::DbPool;
use masthead_events::{event_types, EventBus, PlatformEvent};
use serde_json::json;

use super::{article_status, load_article, record_activity, Actor};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

/// Apply a schedule command to an article.
///
/// A `REJECTED` article is refused before any write.
pub async fn apply(
    pool: &DbPool,
    bus: &EventBus,
    user: &AuthUser,
    article_id: DbId,
    cmd: ScheduleCommand,
) -> AppResult<Article> {
    let article = load_article(pool, article_id).await?;
    let current = article_status(&article)?;
    cmd.validate_from(current)?;

    let updated = match cmd {
        ScheduleCommand::PublishNow { published_at } => {
            ArticleRepo::publish(pool, article_id, current, published_at).await?
        }
        ScheduleCommand::Schedule { at } => {
            ArticleRepo::schedule(pool, article_id, current, at).await?
        }
        ScheduleCommand::CancelSchedule => ArticleRepo::cancel_schedule(pool, article_id).await?,
    }
    .ok_or_else(|| AppError::conflict("Article status changed concurrently; reload and retry"))?;

    tracing::info!(
        article_id,
        from = %current,
        to = %updated.status,
        user_id = user.user_id,
        "Schedule control applied"
    );

    let (action, event_type) = match cmd {
        ScheduleCommand::PublishNow { .. } => {
            (actions::PUBLISHED, Some(event_types::ARTICLE_PUBLISHED))
        }
        ScheduleCommand::Schedule { .. } => {
            (actions::SCHEDULED, Some(event_types::ARTICLE_SCHEDULED))
        }
        ScheduleCommand::CancelSchedule => (actions::SCHEDULE_CANCELLED, None),
    };

    let when = updated.scheduled_at.map(|at| at.to_rfc3339());
    record_activity(
        pool,
        &Actor::from(user),
        &updated,
        action,
        when.as_deref(),
        json!({
            "from": current,
            "scheduled_at": updated.scheduled_at,
            "published_at": updated.published_at,
        }),
    )
    .await;

    if let Some(event_type) = event_type {
        bus.publish(
            PlatformEvent::new(event_type, updated.id, updated.title.clone(), updated.author_id)
                .with_actor(user.user_id)
                .with_payload(json!({
                    "scheduled_at": updated.scheduled_at,
                    "published_at": updated.published_at,
                })),
        );
    }

    Ok(updated)
}
