//! Read-side queries for the editorial review queue.
//!
//! Articles awaiting review are listed even before their review record exists
//! (the record is created lazily on the first action), reported as `PENDING`.

use masthead_core::review::Priority;
use sqlx::PgPool;

use crate::filter::{bind_values, bind_values_scalar, contains_pattern, BindValue, Filter};
use crate::models::queue::{QueueFilter, QueueItem, StatusCount};

/// Status filter value meaning "every review status".
pub const ALL_STATUSES: &str = "all";

const REVIEW_STATUS: &str = "COALESCE(r.status, 'PENDING')";
const PRIORITY: &str = "COALESCE(r.priority, 'NORMAL')";

const COLUMNS: &str = "\
    a.id, a.slug, a.title, a.excerpt, a.status, a.word_count, \
    a.author_id, au.display_name AS author_name, \
    a.category_id, c.name AS category_name, \
    r.id AS review_id, COALESCE(r.status, 'PENDING') AS review_status, \
    COALESCE(r.priority, 'NORMAL') AS priority, \
    r.reviewer_id, rv.display_name AS reviewer_name, r.assigned_at, r.deadline, \
    COALESCE(r.cycle, 1) AS review_cycle, \
    COALESCE(r.submitted_at, a.updated_at) AS submitted_at, \
    a.created_at, a.updated_at";

const FROM: &str = "articles a \
    JOIN users au ON au.id = a.author_id \
    LEFT JOIN categories c ON c.id = a.category_id \
    LEFT JOIN review_records r ON r.article_id = a.id \
    LEFT JOIN users rv ON rv.id = r.reviewer_id";

/// Rows that belong in the queue at all.
const IN_QUEUE: &str = "(r.id IS NOT NULL OR a.status = 'PENDING_REVIEW')";

/// Provides read-only queue aggregation.
pub struct QueueRepo;

impl QueueRepo {
    /// One page of the queue: priority first, then earliest deadline
    /// (no deadline last), then submission time.
    pub async fn list(
        pool: &PgPool,
        params: &QueueFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<QueueItem>, sqlx::Error> {
        let filter = build_queue_filter(params, true);
        let idx = filter.next_index();
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} {} \
             ORDER BY {} ASC, r.deadline ASC NULLS LAST, \
                      COALESCE(r.submitted_at, a.updated_at) ASC, a.id ASC \
             LIMIT ${idx} OFFSET ${}",
            filter.where_clause(),
            priority_rank_sql(),
            idx + 1
        );

        bind_values(sqlx::query_as::<_, QueueItem>(&query), filter.values())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count rows matching the filter.
    pub async fn count(pool: &PgPool, params: &QueueFilter) -> Result<i64, sqlx::Error> {
        let filter = build_queue_filter(params, true);
        let query = format!("SELECT COUNT(*)::BIGINT FROM {FROM} {}", filter.where_clause());

        bind_values_scalar(sqlx::query_scalar::<_, i64>(&query), filter.values())
            .fetch_one(pool)
            .await
    }

    /// Counts per review status, honouring every filter except `status`.
    pub async fn status_counts(
        pool: &PgPool,
        params: &QueueFilter,
    ) -> Result<Vec<StatusCount>, sqlx::Error> {
        let filter = build_queue_filter(params, false);
        let query = format!(
            "SELECT {REVIEW_STATUS} AS status, COUNT(*)::BIGINT AS count \
             FROM {FROM} {} \
             GROUP BY 1",
            filter.where_clause()
        );

        bind_values(sqlx::query_as::<_, StatusCount>(&query), filter.values())
            .fetch_all(pool)
            .await
    }
}

/// `CASE` expression ranking priorities, derived from [`Priority::rank`].
fn priority_rank_sql() -> String {
    let arms: String = Priority::ALL
        .iter()
        .map(|p| format!(" WHEN '{}' THEN {}", p.as_str(), p.rank()))
        .collect();
    format!("(CASE {PRIORITY}{arms} ELSE 99 END)")
}

fn build_queue_filter(params: &QueueFilter, with_status: bool) -> Filter {
    let mut filter = Filter::new();
    filter.push_raw(IN_QUEUE);

    if with_status {
        if let Some(status) = params.status.as_deref().filter(|s| *s != ALL_STATUSES) {
            filter.push(
                &format!("{REVIEW_STATUS} = {{}}"),
                BindValue::Text(status.to_string()),
            );
        }
    }

    filter.eq_bigint("a.category_id", params.category_id);

    if let Some(priority) = params.priority.as_deref() {
        filter.push(
            &format!("{PRIORITY} = {{}}"),
            BindValue::Text(priority.to_string()),
        );
    }

    if let Some(search) = params.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        filter.push(
            "(a.title ILIKE {} ESCAPE '\\' OR au.display_name ILIKE {} ESCAPE '\\')",
            BindValue::Text(contains_pattern(search)),
        );
    }

    filter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_rank_puts_urgent_first() {
        let sql = priority_rank_sql();
        assert!(sql.contains("WHEN 'URGENT' THEN 0"));
        assert!(sql.contains("WHEN 'LOW' THEN 3"));
    }

    #[test]
    fn all_status_is_not_filtered() {
        let params = QueueFilter {
            status: Some("all".into()),
            ..Default::default()
        };
        let filter = build_queue_filter(&params, true);
        assert!(filter.values().is_empty());
    }

    #[test]
    fn status_counts_ignore_status_filter() {
        let params = QueueFilter {
            status: Some("IN_REVIEW".into()),
            search: Some("  launch ".into()),
            ..Default::default()
        };
        let with = build_queue_filter(&params, true);
        let without = build_queue_filter(&params, false);
        assert_eq!(with.values().len(), 2);
        assert_eq!(without.values().len(), 1);
        assert!(without.where_clause().contains("ILIKE $1"));
    }
}
