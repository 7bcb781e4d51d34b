//! Handlers for article authoring and schedule control.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use masthead_core::publishing::ScheduleCommand;
use masthead_core::types::DbId;
use masthead_core::workflow::ArticleStatus;
use masthead_db::models::article::{CreateArticleRequest, UpdateArticle};
use serde::Deserialize;

use super::parse_optional_timestamp;
use crate::engine::{authoring, publishing};
use crate::error::AppResult;
use crate::middleware::json::AppJson;
use crate::middleware::rbac::{RequireAuth, RequireEditor};
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `PATCH /posts/{id}`.
#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub status: String,
    #[serde(alias = "scheduledAt")]
    pub scheduled_at: Option<String>,
    #[serde(alias = "publishedAt")]
    pub published_at: Option<String>,
}

impl ScheduleRequest {
    fn into_command(self) -> AppResult<ScheduleCommand> {
        let status: ArticleStatus = self.status.parse()?;
        let scheduled_at = parse_optional_timestamp("scheduled_at", self.scheduled_at.as_deref())?;
        let published_at = parse_optional_timestamp("published_at", self.published_at.as_deref())?;
        Ok(ScheduleCommand::from_patch(
            status,
            scheduled_at,
            published_at,
            Utc::now(),
        )?)
    }
}

/// POST /api/v1/posts
///
/// Create a draft owned by the caller.
pub async fn create_post(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateArticleRequest>,
) -> AppResult<impl IntoResponse> {
    let post = authoring::create(&state.pool, &user, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: post })))
}

/// GET /api/v1/posts/{id}
pub async fn get_post(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let post = authoring::find_visible(&state.pool, &user, id).await?;
    Ok(Json(DataResponse { data: post }))
}

/// PUT /api/v1/posts/{id}
///
/// Edit content while the article is `DRAFT` or `CHANGES_REQUESTED`.
pub async fn update_post(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateArticle>,
) -> AppResult<impl IntoResponse> {
    let post = authoring::update(&state.pool, &user, id, input).await?;
    Ok(Json(DataResponse { data: post }))
}

/// POST /api/v1/posts/{id}/submit
///
/// Submit for review, or resubmit after changes were requested.
pub async fn submit_post(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let outcome = authoring::submit(&state.pool, &state.event_bus, &user, id).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// PATCH /api/v1/posts/{id}
///
/// Publish now, schedule, or cancel a schedule. Requires the editor role.
pub async fn schedule_post(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<ScheduleRequest>,
) -> AppResult<impl IntoResponse> {
    let cmd = input.into_command()?;
    let post = publishing::apply(&state.pool, &state.event_bus, &user, id, cmd).await?;
    Ok(Json(DataResponse { data: post }))
}
