//! Article authoring: create, edit, submit for review.

use masthead_core::article::{
    derive_excerpt, slug_with_suffix, slugify, validate_slug, validate_title, word_count,
};
use masthead_core::audit::actions;
use masthead_core::error::CoreError;
use masthead_core::types::DbId;
use masthead_core::workflow::{is_editable, plan_submission, ArticleStatus, Submission};
use masthead_db::models::article::{
    Article, ArticleContent, CreateArticle, CreateArticleRequest, UpdateArticle,
};
use masthead_db::models::review::ReviewRecord;
use masthead_db::repositories::{ArticleRepo, CategoryRepo, ReviewRepo};
use masthead_db::DbPool;
use masthead_events::{event_types, EventBus, PlatformEvent};
use serde::Serialize;
use serde_json::json;

use super::{article_status, load_article, record_activity, Actor};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

/// Derived slugs get numeric suffixes up to this bound.
const MAX_SLUG_ATTEMPTS: u32 = 100;

/// The article and its freshly opened review cycle.
#[derive(Debug, Serialize)]
pub struct SubmissionOutcome {
    pub post: Article,
    pub review: ReviewRecord,
}

/// Create a `DRAFT` article owned by the caller.
pub async fn create(
    pool: &DbPool,
    user: &AuthUser,
    input: CreateArticleRequest,
) -> AppResult<Article> {
    validate_title(&input.title)?;
    if let Some(category_id) = input.category_id {
        ensure_category(pool, category_id).await?;
    }

    let slug = match input.slug.as_deref().map(str::trim) {
        Some(explicit) if !explicit.is_empty() => {
            validate_slug(explicit)?;
            if ArticleRepo::slug_exists(pool, explicit).await? {
                return Err(AppError::conflict(format!("Slug '{explicit}' is already taken")));
            }
            explicit.to_string()
        }
        _ => free_slug(pool, &slugify(&input.title)).await?,
    };

    let excerpt = resolve_excerpt(input.excerpt.as_deref(), &input.body);
    let article = ArticleRepo::create(
        pool,
        &CreateArticle {
            slug,
            title: input.title.trim().to_string(),
            word_count: word_count(&input.body),
            body: input.body,
            excerpt,
            category_id: input.category_id,
            author_id: user.user_id,
        },
    )
    .await?;

    tracing::info!(article_id = article.id, author_id = user.user_id, slug = %article.slug, "Article created");
    record_activity(
        pool,
        &Actor::from(user),
        &article,
        actions::CREATED,
        None,
        json!({ "slug": article.slug }),
    )
    .await;

    Ok(article)
}

/// Load an article the caller may read: their own, or any for editors.
pub async fn find_visible(pool: &DbPool, user: &AuthUser, id: DbId) -> AppResult<Article> {
    let article = load_article(pool, id).await?;
    if article.author_id != user.user_id && !user.is_editor() {
        return Err(AppError::forbidden("You can only view your own articles"));
    }
    Ok(article)
}

/// Replace content of an article the author may still edit.
pub async fn update(
    pool: &DbPool,
    user: &AuthUser,
    id: DbId,
    input: UpdateArticle,
) -> AppResult<Article> {
    let article = load_article(pool, id).await?;
    ensure_author(user, &article)?;

    let status = article_status(&article)?;
    if !is_editable(status) {
        return Err(AppError::validation(format!(
            "Article is {status}; only DRAFT or CHANGES_REQUESTED articles can be edited"
        )));
    }

    if let Some(title) = input.title.as_deref() {
        validate_title(title)?;
    }
    if let Some(category_id) = input.category_id {
        ensure_category(pool, category_id).await?;
    }

    let body_changed = input.body.as_ref().is_some_and(|b| *b != article.body);
    let body = input.body.unwrap_or_else(|| article.body.clone());
    // An unchanged excerpt is re-derived when the body moves under it.
    let excerpt = match input.excerpt.as_deref() {
        Some(explicit) => resolve_excerpt(Some(explicit), &body),
        None if body_changed => resolve_excerpt(None, &body),
        None => article.excerpt.clone(),
    };

    let content = ArticleContent {
        title: input
            .title
            .map(|t| t.trim().to_string())
            .unwrap_or_else(|| article.title.clone()),
        word_count: word_count(&body),
        body,
        excerpt,
        category_id: input.category_id.or(article.category_id),
    };

    let updated = ArticleRepo::update_content(pool, id, status, &content)
        .await?
        .ok_or_else(|| AppError::conflict("Article status changed concurrently; reload and retry"))?;

    record_activity(
        pool,
        &Actor::from(user),
        &updated,
        actions::UPDATED,
        None,
        json!({ "word_count": updated.word_count }),
    )
    .await;

    Ok(updated)
}

/// Submit (or resubmit) an article for review.
///
/// The status change and the review cycle are written in one transaction.
pub async fn submit(
    pool: &DbPool,
    bus: &EventBus,
    user: &AuthUser,
    id: DbId,
) -> AppResult<SubmissionOutcome> {
    let article = load_article(pool, id).await?;
    ensure_author(user, &article)?;

    let status = article_status(&article)?;
    let submission = plan_submission(status)?;

    let mut tx = pool.begin().await?;
    let post = ArticleRepo::transition(&mut *tx, id, status, ArticleStatus::PendingReview)
        .await?
        .ok_or_else(|| AppError::conflict("Article status changed concurrently; reload and retry"))?;
    let review = ReviewRepo::open_cycle(&mut *tx, id).await?;
    tx.commit().await?;

    let resubmission = submission == Submission::Resubmission;
    tracing::info!(
        article_id = id,
        cycle = review.cycle,
        resubmission,
        "Article submitted for review"
    );

    record_activity(
        pool,
        &Actor::from(user),
        &post,
        actions::SUBMITTED,
        None,
        json!({ "cycle": review.cycle, "resubmission": resubmission }),
    )
    .await;

    bus.publish(
        PlatformEvent::new(
            event_types::ARTICLE_SUBMITTED,
            post.id,
            post.title.clone(),
            post.author_id,
        )
        .with_actor(user.user_id)
        .with_payload(json!({ "review_id": review.id, "cycle": review.cycle })),
    );

    Ok(SubmissionOutcome { post, review })
}

fn ensure_author(user: &AuthUser, article: &Article) -> AppResult<()> {
    if article.author_id == user.user_id || user.is_admin() {
        Ok(())
    } else {
        Err(AppError::forbidden("Only the author can modify this article"))
    }
}

async fn ensure_category(pool: &DbPool, id: DbId) -> AppResult<()> {
    CategoryRepo::find_by_id(pool, id)
        .await?
        .map(|_| ())
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))
}

/// First free slug among `base`, `base-2`, `base-3`, ...
async fn free_slug(pool: &DbPool, base: &str) -> AppResult<String> {
    for n in 1..=MAX_SLUG_ATTEMPTS {
        let candidate = slug_with_suffix(base, n);
        if !ArticleRepo::slug_exists(pool, &candidate).await? {
            return Ok(candidate);
        }
    }
    Err(AppError::conflict(format!(
        "No free slug found for '{base}'; supply one explicitly"
    )))
}

/// A blank or missing excerpt is derived from the body.
fn resolve_excerpt(explicit: Option<&str>, body: &str) -> Option<String> {
    match explicit.map(str::trim) {
        Some(text) if !text.is_empty() => Some(text.to_string()),
        _ => {
            let derived = derive_excerpt(body);
            (!derived.is_empty()).then_some(derived)
        }
    }
}
