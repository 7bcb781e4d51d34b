//! Repository for the `review_records` table.
//!
//! Ownership and status changes go through conditional updates: a claim only
//! matches while the record is unowned (or already owned by the claimant),
//! and every status change is keyed on the status the caller planned from.

use masthead_core::review::Priority;
use masthead_core::types::{DbId, Timestamp};
use masthead_core::workflow::ReviewStatus;
use sqlx::{PgExecutor, PgPool};

use crate::models::review::ReviewRecord;

/// Column list for review_records queries.
const COLUMNS: &str = "id, article_id, status, priority, reviewer_id, assigned_at, \
    reviewed_at, deadline, notes, cycle, submitted_at, created_at, updated_at";

/// Provides conditional operations on review records.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Find the review record for an article.
    pub async fn find_by_article(
        pool: &PgPool,
        article_id: DbId,
    ) -> Result<Option<ReviewRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM review_records WHERE article_id = $1");
        sqlx::query_as::<_, ReviewRecord>(&query)
            .bind(article_id)
            .fetch_optional(pool)
            .await
    }

    /// Return the article's review record, creating a `PENDING` one if none
    /// exists. Concurrent callers converge on the same row.
    pub async fn get_or_create(
        pool: &PgPool,
        article_id: DbId,
    ) -> Result<ReviewRecord, sqlx::Error> {
        sqlx::query(
            "INSERT INTO review_records (article_id) VALUES ($1)
             ON CONFLICT (article_id) DO NOTHING",
        )
        .bind(article_id)
        .execute(pool)
        .await?;

        let query = format!("SELECT {COLUMNS} FROM review_records WHERE article_id = $1");
        sqlx::query_as::<_, ReviewRecord>(&query)
            .bind(article_id)
            .fetch_one(pool)
            .await
    }

    /// Open a review cycle for a submitted article.
    ///
    /// Creates the record on first submission. On resubmission the existing
    /// record is reset in place: the cycle advances, status returns to
    /// `PENDING`, and reviewer and decision stamps are cleared. Priority,
    /// deadline, notes and feedback survive.
    pub async fn open_cycle<'e, E: PgExecutor<'e>>(
        executor: E,
        article_id: DbId,
    ) -> Result<ReviewRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO review_records (article_id) VALUES ($1)
             ON CONFLICT (article_id) DO UPDATE SET
                status = 'PENDING',
                reviewer_id = NULL,
                assigned_at = NULL,
                reviewed_at = NULL,
                cycle = review_records.cycle + 1,
                submitted_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReviewRecord>(&query)
            .bind(article_id)
            .fetch_one(executor)
            .await
    }

    /// Claim gate: set the reviewer and move to `to`, provided the record is
    /// still in `expected` and unowned or owned by `reviewer_id`.
    ///
    /// Under concurrent claims the losing statement re-evaluates the
    /// predicate after the winner commits and matches zero rows.
    pub async fn claim<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
        expected: ReviewStatus,
        to: ReviewStatus,
        reviewer_id: DbId,
    ) -> Result<Option<ReviewRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE review_records SET
                status = $3,
                reviewer_id = $4,
                assigned_at = COALESCE(assigned_at, NOW())
             WHERE id = $1
               AND status = $2
               AND (reviewer_id IS NULL OR reviewer_id = $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReviewRecord>(&query)
            .bind(id)
            .bind(expected.as_str())
            .bind(to.as_str())
            .bind(reviewer_id)
            .fetch_optional(executor)
            .await
    }

    /// Record a decision. The reviewer defaults to the deciding editor;
    /// a record owned by someone else only matches when `override_owner`
    /// is set. `reviewed_at` is stamped for terminal decisions only.
    pub async fn decide<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
        expected: ReviewStatus,
        to: ReviewStatus,
        actor_id: DbId,
        override_owner: bool,
    ) -> Result<Option<ReviewRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE review_records SET
                status = $3,
                reviewer_id = COALESCE(reviewer_id, $4),
                assigned_at = COALESCE(assigned_at, NOW()),
                reviewed_at = CASE WHEN $6 THEN NOW() ELSE NULL END
             WHERE id = $1
               AND status = $2
               AND (reviewer_id IS NULL OR reviewer_id = $4 OR $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReviewRecord>(&query)
            .bind(id)
            .bind(expected.as_str())
            .bind(to.as_str())
            .bind(actor_id)
            .bind(override_owner)
            .bind(to.is_decision())
            .fetch_optional(executor)
            .await
    }

    /// Update the queue priority.
    pub async fn set_priority<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
        priority: Priority,
    ) -> Result<Option<ReviewRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE review_records SET priority = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReviewRecord>(&query)
            .bind(id)
            .bind(priority.as_str())
            .fetch_optional(executor)
            .await
    }

    /// Set or clear the review deadline.
    pub async fn set_deadline<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
        deadline: Option<Timestamp>,
    ) -> Result<Option<ReviewRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE review_records SET deadline = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReviewRecord>(&query)
            .bind(id)
            .bind(deadline)
            .fetch_optional(executor)
            .await
    }

    /// Replace reviewer notes.
    pub async fn set_notes<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
        notes: &str,
    ) -> Result<Option<ReviewRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE review_records SET notes = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReviewRecord>(&query)
            .bind(id)
            .bind(notes)
            .fetch_optional(executor)
            .await
    }
}
