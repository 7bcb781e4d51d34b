//! Review queue read models.

use masthead_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the review queue: an article joined with its review record.
///
/// Articles awaiting review whose record has not been created yet report a
/// `PENDING` review with `NORMAL` priority and no `review_id`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QueueItem {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub status: String,
    pub word_count: i32,
    pub author_id: DbId,
    pub author_name: String,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub review_id: Option<DbId>,
    pub review_status: String,
    pub priority: String,
    pub reviewer_id: Option<DbId>,
    pub reviewer_name: Option<String>,
    pub assigned_at: Option<Timestamp>,
    pub deadline: Option<Timestamp>,
    pub review_cycle: i32,
    pub submitted_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Filter parameters for the review queue.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueueFilter {
    /// Review status literal, or `all`/absent for every status.
    pub status: Option<String>,
    pub category_id: Option<DbId>,
    pub priority: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Row count for one review status.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}
