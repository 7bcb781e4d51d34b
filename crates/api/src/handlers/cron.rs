//! Handler for the scheduled-publication trigger.

use axum::extract::State;
use axum::Json;

use crate::engine::sweeper::{self, SweepReport};
use crate::error::AppResult;
use crate::middleware::cron::CronAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/cron/publish-scheduled
///
/// Run one sweep now. Authenticated by `Bearer <CRON_SECRET>`.
pub async fn publish_scheduled(
    _auth: CronAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<SweepReport>>> {
    let report = sweeper::sweep(
        &state.pool,
        &state.event_bus,
        state.config.sweeper.batch_size,
    )
    .await?;
    Ok(Json(DataResponse { data: report }))
}
