//! Repository for the append-only `feedback_entries` table.

use masthead_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::feedback::{CreateFeedback, FeedbackEntry};

/// Column list for feedback_entries queries.
const COLUMNS: &str = "id, review_record_id, author_id, author_name, author_role, \
    feedback_type, content, review_cycle, created_at";

/// Provides insert and read operations for feedback entries.
pub struct FeedbackRepo;

impl FeedbackRepo {
    /// Append a feedback entry.
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        input: &CreateFeedback,
    ) -> Result<FeedbackEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO feedback_entries
                (review_record_id, author_id, author_name, author_role,
                 feedback_type, content, review_cycle)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FeedbackEntry>(&query)
            .bind(input.review_record_id)
            .bind(input.author_id)
            .bind(&input.author_name)
            .bind(&input.author_role)
            .bind(&input.feedback_type)
            .bind(&input.content)
            .bind(input.review_cycle)
            .fetch_one(executor)
            .await
    }

    /// List every feedback entry for a review record, newest first.
    pub async fn list_for_review(
        pool: &PgPool,
        review_record_id: DbId,
    ) -> Result<Vec<FeedbackEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM feedback_entries
             WHERE review_record_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, FeedbackEntry>(&query)
            .bind(review_record_id)
            .fetch_all(pool)
            .await
    }
}
