//! Repository for the append-only `activity_log` table.

use sqlx::PgPool;

use crate::filter::{bind_values, bind_values_scalar, Filter};
use crate::models::activity::{
    ActionCount, ActivityLogEntry, ActivityQuery, CreateActivity, UserActivityCount,
};

/// Column list for joined activity reads.
const COLUMNS: &str = "\
    l.id, l.article_id, a.title AS article_title, l.user_id, \
    u.display_name AS user_name, l.actor_role, l.action, l.detail, \
    l.metadata, l.created_at";

/// Joins shared by every read.
const FROM: &str = "activity_log l \
    LEFT JOIN articles a ON a.id = l.article_id \
    LEFT JOIN users u ON u.id = l.user_id";

/// Provides insert and filtered read operations for the activity log.
pub struct ActivityRepo;

impl ActivityRepo {
    /// Append one entry. Returns the new row id.
    pub async fn insert(pool: &PgPool, input: &CreateActivity) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO activity_log
                (article_id, user_id, actor_role, action, detail, metadata)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(input.article_id)
        .bind(input.user_id)
        .bind(&input.actor_role)
        .bind(&input.action)
        .bind(&input.detail)
        .bind(&input.metadata)
        .fetch_one(pool)
        .await
    }

    /// Query entries with filtering and pagination, newest first.
    pub async fn query(
        pool: &PgPool,
        params: &ActivityQuery,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActivityLogEntry>, sqlx::Error> {
        let filter = build_activity_filter(params);
        let idx = filter.next_index();
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} {} \
             ORDER BY l.created_at DESC, l.id DESC \
             LIMIT ${idx} OFFSET ${}",
            filter.where_clause(),
            idx + 1
        );

        bind_values(sqlx::query_as::<_, ActivityLogEntry>(&query), filter.values())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count entries matching the filter (for pagination metadata).
    pub async fn count(pool: &PgPool, params: &ActivityQuery) -> Result<i64, sqlx::Error> {
        let filter = build_activity_filter(params);
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM {FROM} {}",
            filter.where_clause()
        );

        bind_values_scalar(sqlx::query_scalar::<_, i64>(&query), filter.values())
            .fetch_one(pool)
            .await
    }

    /// Entry counts grouped by action for the same filter.
    pub async fn stats_by_action(
        pool: &PgPool,
        params: &ActivityQuery,
    ) -> Result<Vec<ActionCount>, sqlx::Error> {
        let filter = build_activity_filter(params);
        let query = format!(
            "SELECT l.action, COUNT(*)::BIGINT AS count FROM {FROM} {} \
             GROUP BY l.action \
             ORDER BY count DESC, l.action ASC",
            filter.where_clause()
        );

        bind_values(sqlx::query_as::<_, ActionCount>(&query), filter.values())
            .fetch_all(pool)
            .await
    }

    /// Entry counts grouped by actor for the same filter.
    pub async fn stats_by_user(
        pool: &PgPool,
        params: &ActivityQuery,
    ) -> Result<Vec<UserActivityCount>, sqlx::Error> {
        let filter = build_activity_filter(params);
        let query = format!(
            "SELECT l.user_id, u.display_name AS user_name, COUNT(*)::BIGINT AS count \
             FROM {FROM} {} \
             GROUP BY l.user_id, u.display_name \
             ORDER BY count DESC, l.user_id ASC NULLS FIRST",
            filter.where_clause()
        );

        bind_values(sqlx::query_as::<_, UserActivityCount>(&query), filter.values())
            .fetch_all(pool)
            .await
    }
}

/// Build the `WHERE` clause shared by the listing, count and stats queries.
fn build_activity_filter(params: &ActivityQuery) -> Filter {
    let mut filter = Filter::new();
    filter.eq_text("l.action", params.action.as_deref());
    filter.eq_bigint("l.user_id", params.user_id);
    filter.eq_bigint("l.article_id", params.post_id);
    filter.since("l.created_at", params.start_date);
    filter.until("l.created_at", params.end_date);
    filter
}
