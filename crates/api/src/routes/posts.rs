//! Route definitions for articles.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::posts;
use crate::state::AppState;

/// ```text
/// POST   /              create_post
/// GET    /{id}          get_post
/// PUT    /{id}          update_post
/// PATCH  /{id}          schedule_post
/// POST   /{id}/submit   submit_post
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(posts::create_post))
        .route(
            "/{id}",
            get(posts::get_post)
                .put(posts::update_post)
                .patch(posts::schedule_post),
        )
        .route("/{id}/submit", post(posts::submit_post))
}
