//! Route definitions for the review queue.

use axum::routing::get;
use axum::Router;

use crate::handlers::review;
use crate::state::AppState;

/// ```text
/// GET    /              list_queue
/// POST   /              apply_action
/// GET    /{post_id}     get_review
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(review::list_queue).post(review::apply_action))
        .route("/{post_id}", get(review::get_review))
}
