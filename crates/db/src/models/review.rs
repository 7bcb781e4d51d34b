//! Review record models.

use masthead_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `review_records` table (one per article).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReviewRecord {
    pub id: DbId,
    pub article_id: DbId,
    pub status: String,
    pub priority: String,
    pub reviewer_id: Option<DbId>,
    pub assigned_at: Option<Timestamp>,
    pub reviewed_at: Option<Timestamp>,
    pub deadline: Option<Timestamp>,
    pub notes: Option<String>,
    pub cycle: i32,
    pub submitted_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
