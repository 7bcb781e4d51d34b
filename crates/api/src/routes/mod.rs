pub mod activity;
pub mod cron;
pub mod health;
pub mod posts;
pub mod review;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /review                      review queue and actions
/// /posts                       authoring and schedule control
/// /activity                    activity log
/// /cron/publish-scheduled      scheduled-publication trigger
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/review", review::router())
        .nest("/posts", posts::router())
        .nest("/activity", activity::router())
        .nest("/cron", cron::router())
}
