//! Review queue actions.
//!
//! Ownership is taken through the claim gate in `ReviewRepo::claim`; every
//! other status change is a conditional update keyed on the status the
//! action was planned from. When two editors race, exactly one update
//! matches and the other request receives a conflict.

use masthead_core::audit;
use masthead_core::error::CoreError;
use masthead_core::review::{normalize_feedback, validate_notes, Priority};
use masthead_core::roles::is_editor_capable;
use masthead_core::types::{DbId, Timestamp};
use masthead_core::workflow::{plan, ArticleStatus, Effect, ReviewAction, ReviewStatus};
use masthead_db::models::article::Article;
use masthead_db::models::feedback::CreateFeedback;
use masthead_db::models::review::ReviewRecord;
use masthead_db::repositories::{ArticleRepo, FeedbackRepo, ReviewRepo, UserRepo};
use masthead_db::DbPool;
use masthead_events::{event_types, EventBus, PlatformEvent};
use serde::Serialize;
use serde_json::json;

use super::{article_status, load_actor, load_article, record_activity, Actor};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

/// A parsed review action against one article.
#[derive(Debug, Clone)]
pub struct ReviewCommand {
    pub article_id: DbId,
    pub action: ReviewAction,
    pub feedback: Option<String>,
    pub priority: Option<Priority>,
    /// `None` leaves the deadline alone; `Some(None)` clears it.
    pub deadline: Option<Option<Timestamp>>,
    /// Target editor for `assign`; defaults to the caller.
    pub assignee_id: Option<DbId>,
    pub notes: Option<String>,
}

impl ReviewCommand {
    pub fn new(article_id: DbId, action: ReviewAction) -> Self {
        Self {
            article_id,
            action,
            feedback: None,
            priority: None,
            deadline: None,
            assignee_id: None,
            notes: None,
        }
    }
}

/// The article and review record after a committed action.
#[derive(Debug, Serialize)]
pub struct ReviewOutcome {
    pub post: Article,
    pub review: ReviewRecord,
}

/// Field updates resolved before the transaction opens.
enum FieldUpdate {
    None,
    Priority(Priority),
    Deadline(Option<Timestamp>),
}

/// Apply one review action.
pub async fn apply(
    pool: &DbPool,
    bus: &EventBus,
    user: &AuthUser,
    cmd: ReviewCommand,
) -> AppResult<ReviewOutcome> {
    if let Some(notes) = cmd.notes.as_deref() {
        validate_notes(notes)?;
    }

    let actor = load_actor(pool, user).await?;
    let claimant = resolve_claimant(pool, user, &cmd).await?;

    let article = load_article(pool, cmd.article_id).await?;
    let article_from = article_status(&article)?;
    let review = load_review(pool, &article, article_from).await?;
    let review_from = review_status(&review)?;

    check_ownership(user, cmd.action, &review, review_from, claimant)?;

    let transition = plan(cmd.action, review_from, article_from)?;

    let feedback = match transition.effect {
        Effect::Decide {
            feedback_required, ..
        } => normalize_feedback(cmd.feedback.as_deref(), feedback_required)?,
        _ => None,
    };

    let field = match transition.effect {
        Effect::SetPriority => FieldUpdate::Priority(cmd.priority.ok_or_else(|| {
            AppError::validation("priority is required for set_priority")
        })?),
        Effect::SetDeadline => FieldUpdate::Deadline(cmd.deadline.ok_or_else(|| {
            AppError::validation("deadline is required for set_deadline (null clears it)")
        })?),
        _ => FieldUpdate::None,
    };

    let mut tx = pool.begin().await?;

    let mut updated = match (transition.effect, field) {
        (Effect::Claim, _) => ReviewRepo::claim(
            &mut *tx,
            review.id,
            transition.review_from,
            transition.review_to,
            claimant,
        )
        .await?
        .ok_or_else(|| AppError::conflict("Review was already claimed by another editor"))?,
        (Effect::Decide { .. }, _) => ReviewRepo::decide(
            &mut *tx,
            review.id,
            transition.review_from,
            transition.review_to,
            user.user_id,
            user.is_admin(),
        )
        .await?
        .ok_or_else(|| {
            AppError::conflict("Review changed while the decision was being recorded; reload and retry")
        })?,
        (Effect::SetPriority, FieldUpdate::Priority(priority)) => {
            ReviewRepo::set_priority(&mut *tx, review.id, priority)
                .await?
                .ok_or_else(|| missing_review(article.id))?
        }
        (Effect::SetDeadline, FieldUpdate::Deadline(deadline)) => {
            ReviewRepo::set_deadline(&mut *tx, review.id, deadline)
                .await?
                .ok_or_else(|| missing_review(article.id))?
        }
        (effect, _) => {
            return Err(AppError::InternalError(format!(
                "Unresolved field update for {effect:?}"
            )))
        }
    };

    if let Some(notes) = cmd.notes.as_deref() {
        updated = ReviewRepo::set_notes(&mut *tx, review.id, notes)
            .await?
            .ok_or_else(|| missing_review(article.id))?;
    }

    let post = if transition.changes_article() {
        ArticleRepo::transition(
            &mut *tx,
            article.id,
            transition.article_from,
            transition.article_to,
        )
        .await?
        .ok_or_else(|| AppError::conflict("Article status changed concurrently; reload and retry"))?
    } else {
        article
    };

    if let (Effect::Decide { feedback_type, .. }, Some(content)) =
        (transition.effect, feedback.as_deref())
    {
        FeedbackRepo::create(
            &mut *tx,
            &CreateFeedback {
                review_record_id: updated.id,
                author_id: actor.id,
                author_name: actor.display_name.clone(),
                author_role: actor.role.clone(),
                feedback_type: feedback_type.as_str().to_string(),
                content: content.to_string(),
                review_cycle: updated.cycle,
            },
        )
        .await?;
    }

    tx.commit().await?;

    tracing::info!(
        article_id = post.id,
        review_id = updated.id,
        action = %cmd.action,
        user_id = user.user_id,
        review_status = %updated.status,
        "Review action applied"
    );

    let metadata = json!({
        "review_from": transition.review_from,
        "review_to": transition.review_to,
        "article_from": transition.article_from,
        "article_to": transition.article_to,
        "reviewer_id": updated.reviewer_id,
        "priority": updated.priority,
        "deadline": updated.deadline,
        "cycle": updated.cycle,
        "has_feedback": feedback.is_some(),
        "feedback": feedback,
    });
    let note = match transition.effect {
        Effect::Decide { .. } => feedback.clone(),
        Effect::SetPriority => Some(updated.priority.clone()),
        Effect::SetDeadline => Some(
            updated
                .deadline
                .map_or_else(|| "no deadline".to_string(), |at| at.to_rfc3339()),
        ),
        _ => None,
    };
    record_activity(
        pool,
        &Actor::from(user),
        &post,
        audit::action_for(cmd.action),
        note.as_deref(),
        metadata,
    )
    .await;

    if let Some(event_type) = event_for(cmd.action) {
        bus.publish(
            PlatformEvent::new(event_type, post.id, post.title.clone(), post.author_id)
                .with_actor(user.user_id)
                .with_feedback(feedback)
                .with_payload(json!({
                    "review_id": updated.id,
                    "review_status": updated.status,
                    "reviewer_id": updated.reviewer_id,
                    "cycle": updated.cycle,
                })),
        );
    }

    Ok(ReviewOutcome {
        post,
        review: updated,
    })
}

/// Resolve who takes ownership for claim actions.
///
/// Editors may only assign reviews to themselves; admins may assign any
/// editor-capable user.
async fn resolve_claimant(pool: &DbPool, user: &AuthUser, cmd: &ReviewCommand) -> AppResult<DbId> {
    match (cmd.action, cmd.assignee_id) {
        (ReviewAction::Assign, Some(assignee_id)) if assignee_id != user.user_id => {
            if !user.is_admin() {
                return Err(AppError::forbidden(
                    "Only admins can assign a review to another editor",
                ));
            }
            let assignee = UserRepo::find_by_id(pool, assignee_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "User",
                    id: assignee_id,
                }))?;
            if !is_editor_capable(&assignee.role) {
                return Err(AppError::validation(format!(
                    "User {assignee_id} cannot review articles"
                )));
            }
            Ok(assignee_id)
        }
        _ => Ok(user.user_id),
    }
}

/// Fetch the review record, creating it on first touch of an article that
/// is awaiting review.
async fn load_review(
    pool: &DbPool,
    article: &Article,
    status: ArticleStatus,
) -> AppResult<ReviewRecord> {
    if let Some(review) = ReviewRepo::find_by_article(pool, article.id).await? {
        return Ok(review);
    }
    if status == ArticleStatus::PendingReview {
        return Ok(ReviewRepo::get_or_create(pool, article.id).await?);
    }
    Err(missing_review(article.id))
}

fn review_status(review: &ReviewRecord) -> AppResult<ReviewStatus> {
    review.status.parse::<ReviewStatus>().map_err(|e| {
        AppError::InternalError(format!(
            "Review {} has unreadable status: {e}",
            review.id
        ))
    })
}

/// Reject actions on a review actively owned by someone else.
///
/// Runs before planning so a late claimant sees a conflict rather than a
/// validation error about the state the winner moved the review into.
fn check_ownership(
    user: &AuthUser,
    action: ReviewAction,
    review: &ReviewRecord,
    status: ReviewStatus,
    claimant: DbId,
) -> AppResult<()> {
    let Some(owner) = review.reviewer_id else {
        return Ok(());
    };
    if !matches!(status, ReviewStatus::Assigned | ReviewStatus::InReview) {
        return Ok(());
    }

    match action {
        ReviewAction::Assign | ReviewAction::StartReview if owner != claimant => Err(
            AppError::conflict("Review was already claimed by another editor"),
        ),
        ReviewAction::Approve | ReviewAction::Reject | ReviewAction::RequestChanges
            if owner != user.user_id && !user.is_admin() =>
        {
            Err(AppError::conflict("Review is owned by another editor"))
        }
        _ => Ok(()),
    }
}

fn missing_review(article_id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Review for article",
        id: article_id,
    })
}

/// Event published for a committed action, if any.
fn event_for(action: ReviewAction) -> Option<&'static str> {
    match action {
        ReviewAction::Assign => Some(event_types::REVIEW_ASSIGNED),
        ReviewAction::StartReview => Some(event_types::REVIEW_STARTED),
        ReviewAction::Approve => Some(event_types::REVIEW_APPROVED),
        ReviewAction::Reject => Some(event_types::REVIEW_REJECTED),
        ReviewAction::RequestChanges => Some(event_types::REVIEW_CHANGES_REQUESTED),
        ReviewAction::SetPriority | ReviewAction::SetDeadline => None,
    }
}
