//! Handler for the activity log read.

use axum::extract::{Query, State};
use axum::Json;
use masthead_core::audit::is_known_action;
use masthead_core::pagination::{PageRequest, Pagination};
use masthead_db::models::activity::{
    ActionCount, ActivityLogEntry, ActivityQuery, UserActivityCount,
};
use masthead_db::repositories::ActivityRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireEditor;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ActivityStats {
    pub by_action: Vec<ActionCount>,
    pub by_user: Vec<UserActivityCount>,
}

#[derive(Debug, Serialize)]
pub struct ActivityPage {
    pub activities: Vec<ActivityLogEntry>,
    pub pagination: Pagination,
    pub stats: ActivityStats,
}

/// GET /api/v1/activity
///
/// Filtered, paginated activity with per-action and per-user counts over
/// the same filter.
pub async fn list_activity(
    RequireEditor(_user): RequireEditor,
    State(state): State<AppState>,
    Query(params): Query<ActivityQuery>,
) -> AppResult<Json<DataResponse<ActivityPage>>> {
    if let Some(action) = params.action.as_deref() {
        if !is_known_action(action) {
            return Err(AppError::validation(format!("Unknown activity action '{action}'")));
        }
    }
    if let (Some(start), Some(end)) = (params.start_date, params.end_date) {
        if start > end {
            return Err(AppError::validation("start_date must not be after end_date"));
        }
    }

    let page = PageRequest::from_params(params.page, params.limit);
    let activities = ActivityRepo::query(&state.pool, &params, page.limit, page.offset()).await?;
    let total = ActivityRepo::count(&state.pool, &params).await?;
    let by_action = ActivityRepo::stats_by_action(&state.pool, &params).await?;
    let by_user = ActivityRepo::stats_by_user(&state.pool, &params).await?;

    Ok(Json(DataResponse {
        data: ActivityPage {
            activities,
            pagination: page.paginate(total),
            stats: ActivityStats { by_action, by_user },
        },
    }))
}
