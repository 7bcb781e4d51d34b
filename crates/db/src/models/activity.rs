//! Activity log models and DTOs.
//!
//! Activity entries are immutable once created (no `updated_at`).

use masthead_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A single activity log entry joined with the actor and article names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityLogEntry {
    pub id: DbId,
    pub article_id: Option<DbId>,
    pub article_title: Option<String>,
    pub user_id: Option<DbId>,
    pub user_name: Option<String>,
    pub actor_role: String,
    pub action: String,
    pub detail: String,
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// DTO for appending an activity entry. `user_id` is `None` for the system
/// actor.
#[derive(Debug, Clone)]
pub struct CreateActivity {
    pub article_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub actor_role: String,
    pub action: String,
    pub detail: String,
    pub metadata: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Filter parameters for activity log reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityQuery {
    pub action: Option<String>,
    pub user_id: Option<DbId>,
    pub post_id: Option<DbId>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Entry count for one action.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActionCount {
    pub action: String,
    pub count: i64,
}

/// Entry count for one actor. `user_id` is `None` for the system actor.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserActivityCount {
    pub user_id: Option<DbId>,
    pub user_name: Option<String>,
    pub count: i64,
}
