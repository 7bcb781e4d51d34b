//! Handlers for the editorial review queue.
//!
//! Provides the single action endpoint, the queue listing, and the review
//! detail view with feedback history.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use masthead_core::pagination::{PageRequest, Pagination};
use masthead_core::review::Priority;
use masthead_core::types::DbId;
use masthead_core::workflow::{ReviewAction, ReviewStatus};
use masthead_db::models::article::Article;
use masthead_db::models::feedback::FeedbackEntry;
use masthead_db::models::queue::{QueueFilter, QueueItem};
use masthead_db::models::review::ReviewRecord;
use masthead_db::repositories::queue_repo::ALL_STATUSES;
use masthead_db::repositories::{FeedbackRepo, QueueRepo, ReviewRepo};
use serde::{Deserialize, Serialize};

use super::{explicit_null, parse_timestamp};
use crate::engine::authoring;
use crate::engine::review::{self, ReviewCommand, ReviewOutcome};
use crate::error::AppResult;
use crate::middleware::json::AppJson;
use crate::middleware::rbac::{RequireAuth, RequireEditor};
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /review`.
#[derive(Debug, Deserialize)]
pub struct ReviewActionRequest {
    #[serde(alias = "postId")]
    pub post_id: DbId,
    pub action: String,
    pub feedback: Option<String>,
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub deadline: Option<Option<String>>,
    #[serde(alias = "assigneeId")]
    pub assignee_id: Option<DbId>,
    pub notes: Option<String>,
}

impl ReviewActionRequest {
    fn into_command(self) -> AppResult<ReviewCommand> {
        let action: ReviewAction = self.action.parse()?;
        let priority = self
            .priority
            .as_deref()
            .map(str::parse::<Priority>)
            .transpose()?;
        let deadline = match self.deadline {
            None => None,
            Some(None) => Some(None),
            Some(Some(raw)) => Some(Some(parse_timestamp("deadline", &raw)?)),
        };

        Ok(ReviewCommand {
            article_id: self.post_id,
            action,
            feedback: self.feedback,
            priority,
            deadline,
            assignee_id: self.assignee_id,
            notes: self.notes,
        })
    }
}

/// One page of the review queue.
#[derive(Debug, Serialize)]
pub struct QueuePage {
    pub posts: Vec<QueueItem>,
    pub pagination: Pagination,
    /// Count per review status; every status is present.
    pub stats: BTreeMap<&'static str, i64>,
}

/// Review detail with full feedback history (newest first).
#[derive(Debug, Serialize)]
pub struct ReviewDetail {
    pub post: Article,
    pub review: Option<ReviewRecord>,
    pub feedback: Vec<FeedbackEntry>,
}

/// POST /api/v1/review
///
/// Apply a review action. Requires the editor or admin role.
pub async fn apply_action(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    AppJson(input): AppJson<ReviewActionRequest>,
) -> AppResult<Json<DataResponse<ReviewOutcome>>> {
    let cmd = input.into_command()?;
    let outcome = review::apply(&state.pool, &state.event_bus, &user, cmd).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// GET /api/v1/review
///
/// List the review queue ordered by priority, deadline, then submission time.
pub async fn list_queue(
    RequireEditor(_user): RequireEditor,
    State(state): State<AppState>,
    Query(params): Query<QueueFilter>,
) -> AppResult<Json<DataResponse<QueuePage>>> {
    if let Some(status) = params.status.as_deref().filter(|s| *s != ALL_STATUSES) {
        status.parse::<ReviewStatus>()?;
    }
    if let Some(priority) = params.priority.as_deref() {
        priority.parse::<Priority>()?;
    }

    let page = PageRequest::from_params(params.page, params.limit);
    let posts = QueueRepo::list(&state.pool, &params, page.limit, page.offset()).await?;
    let total = QueueRepo::count(&state.pool, &params).await?;
    let counts = QueueRepo::status_counts(&state.pool, &params).await?;

    let mut stats: BTreeMap<&'static str, i64> =
        ReviewStatus::ALL.iter().map(|s| (s.as_str(), 0)).collect();
    for row in counts {
        match row.status.parse::<ReviewStatus>() {
            Ok(status) => {
                stats.insert(status.as_str(), row.count);
            }
            Err(_) => tracing::warn!(status = %row.status, "Unknown review status in queue"),
        }
    }

    Ok(Json(DataResponse {
        data: QueuePage {
            posts,
            pagination: page.paginate(total),
            stats,
        },
    }))
}

/// GET /api/v1/review/{post_id}
///
/// Editors see any article; authors see their own.
pub async fn get_review(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ReviewDetail>>> {
    let post = authoring::find_visible(&state.pool, &user, post_id).await?;
    let review = ReviewRepo::find_by_article(&state.pool, post_id).await?;
    let feedback = match &review {
        Some(r) => FeedbackRepo::list_for_review(&state.pool, r.id).await?,
        None => Vec::new(),
    };

    Ok(Json(DataResponse {
        data: ReviewDetail {
            post,
            review,
            feedback,
        },
    }))
}
