//! Editorial workflow engine.
//!
//! Every mutation follows the same shape: load and validate, apply the
//! conditional updates inside one transaction, commit, then record the
//! activity entry and publish the workflow event. Activity and events are
//! written after commit and never fail the request.
//!
//! - [`review`] -- review queue actions (claim, decide, priority, deadline).
//! - [`authoring`] -- article creation, editing and submission.
//! - [`publishing`] -- operator schedule control.
//! - [`sweeper`] -- promotion of due scheduled articles.

pub mod authoring;
pub mod publishing;
pub mod review;
pub mod sweeper;

use masthead_core::audit;
use masthead_core::error::CoreError;
use masthead_core::roles::ROLE_SYSTEM;
use masthead_core::types::DbId;
use masthead_core::workflow::ArticleStatus;
use masthead_db::models::activity::CreateActivity;
use masthead_db::models::article::Article;
use masthead_db::models::user::User;
use masthead_db::repositories::{ActivityRepo, ArticleRepo, UserRepo};
use masthead_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

/// Who performed a mutation, as recorded in the activity log.
#[derive(Debug, Clone)]
pub struct Actor {
    /// `None` for background jobs.
    pub user_id: Option<DbId>,
    pub role: String,
}

impl Actor {
    /// The scheduled-publication sweep.
    pub fn system() -> Self {
        Self {
            user_id: None,
            role: ROLE_SYSTEM.to_string(),
        }
    }
}

impl From<&AuthUser> for Actor {
    fn from(user: &AuthUser) -> Self {
        Self {
            user_id: Some(user.user_id),
            role: user.role.clone(),
        }
    }
}

/// Load an article or fail with 404.
pub(crate) async fn load_article(pool: &DbPool, id: DbId) -> AppResult<Article> {
    ArticleRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id,
        }))
}

/// Load the calling user's row. A token for a deleted user is unauthorized.
pub(crate) async fn load_actor(pool: &DbPool, user: &AuthUser) -> AppResult<User> {
    UserRepo::find_by_id(pool, user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Unknown user".into())))
}

/// Parse a stored article status.
pub(crate) fn article_status(article: &Article) -> AppResult<ArticleStatus> {
    article.status.parse::<ArticleStatus>().map_err(|e| {
        AppError::InternalError(format!(
            "Article {} has unreadable status: {e}",
            article.id
        ))
    })
}

/// Append an activity entry after commit. Failures are logged, never returned.
///
/// `note` is folded into the human-readable detail (feedback text, new
/// priority, and so on).
pub(crate) async fn record_activity(
    pool: &DbPool,
    actor: &Actor,
    article: &Article,
    action: &'static str,
    note: Option<&str>,
    metadata: serde_json::Value,
) {
    let entry = CreateActivity {
        article_id: Some(article.id),
        user_id: actor.user_id,
        actor_role: actor.role.clone(),
        action: action.to_string(),
        detail: audit::describe(action, &article.title, note),
        metadata,
    };

    if let Err(e) = ActivityRepo::insert(pool, &entry).await {
        tracing::error!(
            error = %e,
            article_id = article.id,
            action,
            "Failed to record activity"
        );
    }
}
