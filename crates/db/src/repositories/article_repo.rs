//! Repository for the `articles` table.
//!
//! Every status change is a single conditional `UPDATE ... WHERE status = $expected`.
//! A `None` return means the row was missing or its status had already moved.

use masthead_core::types::{DbId, Timestamp};
use masthead_core::workflow::ArticleStatus;
use sqlx::{PgExecutor, PgPool};

use crate::models::article::{Article, ArticleContent, CreateArticle};

/// Column list for articles queries.
const COLUMNS: &str = "id, slug, title, body, excerpt, category_id, author_id, status, \
    word_count, scheduled_at, published_at, created_at, updated_at";

/// Provides CRUD and conditional status operations for articles.
pub struct ArticleRepo;

impl ArticleRepo {
    /// Insert a new `DRAFT` article, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateArticle) -> Result<Article, sqlx::Error> {
        let query = format!(
            "INSERT INTO articles
                (slug, title, body, excerpt, category_id, author_id, word_count)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(&input.slug)
            .bind(&input.title)
            .bind(&input.body)
            .bind(&input.excerpt)
            .bind(input.category_id)
            .bind(input.author_id)
            .bind(input.word_count)
            .fetch_one(pool)
            .await
    }

    /// Find an article by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Article>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM articles WHERE id = $1");
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a slug is already taken.
    pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM articles WHERE slug = $1)")
            .bind(slug)
            .fetch_one(pool)
            .await
    }

    /// Replace the editable content of an article still in `expected` status.
    pub async fn update_content(
        pool: &PgPool,
        id: DbId,
        expected: ArticleStatus,
        content: &ArticleContent,
    ) -> Result<Option<Article>, sqlx::Error> {
        let query = format!(
            "UPDATE articles SET
                title = $3,
                body = $4,
                excerpt = $5,
                category_id = $6,
                word_count = $7
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .bind(expected.as_str())
            .bind(&content.title)
            .bind(&content.body)
            .bind(&content.excerpt)
            .bind(content.category_id)
            .bind(content.word_count)
            .fetch_optional(pool)
            .await
    }

    /// Move an article between two workflow statuses that carry no
    /// publication timestamps.
    pub async fn transition<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
        from: ArticleStatus,
        to: ArticleStatus,
    ) -> Result<Option<Article>, sqlx::Error> {
        let query = format!(
            "UPDATE articles SET status = $3
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(executor)
            .await
    }

    /// Promote an article to `PUBLISHED`, clearing any schedule.
    ///
    /// `published_at` defaults to `NOW()`. Used by both manual publish and
    /// the scheduled-publication sweep.
    pub async fn publish<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
        from: ArticleStatus,
        published_at: Option<Timestamp>,
    ) -> Result<Option<Article>, sqlx::Error> {
        let query = format!(
            "UPDATE articles SET
                status = 'PUBLISHED',
                published_at = COALESCE($3, NOW()),
                scheduled_at = NULL
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(published_at)
            .fetch_optional(executor)
            .await
    }

    /// Schedule (or reschedule) publication.
    pub async fn schedule<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
        from: ArticleStatus,
        at: Timestamp,
    ) -> Result<Option<Article>, sqlx::Error> {
        let query = format!(
            "UPDATE articles SET
                status = 'SCHEDULED',
                scheduled_at = $3
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(at)
            .fetch_optional(executor)
            .await
    }

    /// Cancel a pending schedule, reverting the article to `DRAFT`.
    pub async fn cancel_schedule<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Article>, sqlx::Error> {
        let query = format!(
            "UPDATE articles SET
                status = 'DRAFT',
                scheduled_at = NULL
             WHERE id = $1 AND status = 'SCHEDULED'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List `SCHEDULED` articles whose time has come, oldest first.
    pub async fn list_due_scheduled(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<Article>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM articles
             WHERE status = 'SCHEDULED' AND scheduled_at <= NOW()
             ORDER BY scheduled_at ASC, id ASC
             LIMIT $1"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
