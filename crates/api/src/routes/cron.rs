use axum::routing::post;
use axum::Router;

use crate::handlers::cron;
use crate::state::AppState;

/// ```text
/// POST   /publish-scheduled   publish_scheduled
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/publish-scheduled", post(cron::publish_scheduled))
}
