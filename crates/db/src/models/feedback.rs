//! Feedback entry models. Feedback is append-only (no `updated_at`).

use masthead_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `feedback_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FeedbackEntry {
    pub id: DbId,
    pub review_record_id: DbId,
    pub author_id: Option<DbId>,
    pub author_name: String,
    pub author_role: String,
    pub feedback_type: String,
    pub content: String,
    pub review_cycle: i32,
    pub created_at: Timestamp,
}

/// DTO for appending a feedback entry.
#[derive(Debug, Clone)]
pub struct CreateFeedback {
    pub review_record_id: DbId,
    pub author_id: DbId,
    pub author_name: String,
    pub author_role: String,
    pub feedback_type: String,
    pub content: String,
    pub review_cycle: i32,
}
