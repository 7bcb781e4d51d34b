//! Article models and DTOs.

use masthead_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `articles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Article {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub body: String,
    pub excerpt: Option<String>,
    pub category_id: Option<DbId>,
    pub author_id: DbId,
    pub status: String,
    pub word_count: i32,
    pub scheduled_at: Option<Timestamp>,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new draft. Derived fields are computed by the caller.
#[derive(Debug, Clone)]
pub struct CreateArticle {
    pub slug: String,
    pub title: String,
    pub body: String,
    pub excerpt: Option<String>,
    pub category_id: Option<DbId>,
    pub author_id: DbId,
    pub word_count: i32,
}

/// Request body for `POST /posts`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub category_id: Option<DbId>,
}

/// Request body for `PUT /posts/{id}`. All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateArticle {
    pub title: Option<String>,
    pub body: Option<String>,
    pub excerpt: Option<String>,
    pub category_id: Option<DbId>,
}

/// Resolved content change written by [`ArticleRepo::update_content`].
///
/// [`ArticleRepo::update_content`]: crate::repositories::ArticleRepo::update_content
#[derive(Debug, Clone)]
pub struct ArticleContent {
    pub title: String,
    pub body: String,
    pub excerpt: Option<String>,
    pub category_id: Option<DbId>,
    pub word_count: i32,
}
