//! Schedule control and the scheduled-publication cron trigger.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{
    activity_count, body_json, create_post, create_user, get_auth, patch_json_auth, post_bearer,
    review_action, submitted_post, token_for, CRON_SECRET,
};
use masthead_api::engine::sweeper;
use masthead_events::EventBus;
use serde_json::json;
use sqlx::PgPool;

async fn approved_post(app: &axum::Router, writer: &str, editor: &str, title: &str) -> i64 {
    let id = submitted_post(app, writer, title).await;
    let response = review_action(app, editor, json!({ "post_id": id, "action": "approve" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    id
}

/// Schedule an approved article one minute in the past so the next sweep
/// picks it up.
async fn schedule_due(app: &axum::Router, editor: &str, post_id: i64) {
    let response = patch_json_auth(
        app.clone(),
        &format!("/api/v1/posts/{post_id}"),
        json!({ "status": "SCHEDULED", "scheduled_at": (Utc::now() - Duration::minutes(1)).to_rfc3339() }),
        editor,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

async fn article_status(pool: &PgPool, post_id: i64) -> String {
    sqlx::query_scalar("SELECT status FROM articles WHERE id = $1")
        .bind(post_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Scheduling and the sweep
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn due_schedule_is_published_once_by_cron(pool: PgPool) {
    let writer = create_user(&pool, "wendy", "writer").await;
    let editor = create_user(&pool, "eddie", "editor").await;
    let app = common::build_test_app_with_cron(pool.clone());
    let editor_token = token_for(&editor);

    let post_id = approved_post(&app, &token_for(&writer), &editor_token, "Morning edition").await;

    let scheduled_at = (Utc::now() - Duration::minutes(1)).to_rfc3339();
    let response = patch_json_auth(
        app.clone(),
        &format!("/api/v1/posts/{post_id}"),
        json!({ "status": "SCHEDULED", "scheduledAt": scheduled_at }),
        &editor_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "SCHEDULED");
    assert!(json["data"]["scheduled_at"].is_string());

    let response = post_bearer(
        app.clone(),
        "/api/v1/cron/publish-scheduled",
        Some(CRON_SECRET),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["published_count"], 1);
    assert_eq!(json["data"]["failed_count"], 0);

    let response = post_bearer(
        app.clone(),
        "/api/v1/cron/publish-scheduled",
        Some(CRON_SECRET),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["published_count"], 0);

    let response = get_auth(app, &format!("/api/v1/posts/{post_id}"), &editor_token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "PUBLISHED");
    assert!(json["data"]["published_at"].is_string());
    assert!(json["data"]["scheduled_at"].is_null());

    let (user_id, actor_role): (Option<i64>, String) = sqlx::query_as(
        "SELECT user_id, actor_role FROM activity_log \
         WHERE article_id = $1 AND action = 'PUBLISHED'",
    )
    .bind(post_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(user_id, None);
    assert_eq!(actor_role, "system");
    assert_eq!(activity_count(&pool, post_id, "SCHEDULED").await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn future_schedule_is_left_alone(pool: PgPool) {
    let writer = create_user(&pool, "wendy", "writer").await;
    let editor = create_user(&pool, "eddie", "editor").await;
    let app = common::build_test_app_with_cron(pool);
    let editor_token = token_for(&editor);

    let post_id = approved_post(&app, &token_for(&writer), &editor_token, "Next week").await;
    let scheduled_at = (Utc::now() + Duration::days(7)).to_rfc3339();
    let response = patch_json_auth(
        app.clone(),
        &format!("/api/v1/posts/{post_id}"),
        json!({ "status": "SCHEDULED", "scheduled_at": scheduled_at }),
        &editor_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_bearer(app, "/api/v1/cron/publish-scheduled", Some(CRON_SECRET)).await;
    assert_eq!(body_json(response).await["data"]["published_count"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn publish_now_and_cancel_schedule(pool: PgPool) {
    let writer = create_user(&pool, "wendy", "writer").await;
    let editor = create_user(&pool, "eddie", "editor").await;
    let app = common::build_test_app(pool.clone());
    let writer_token = token_for(&writer);
    let editor_token = token_for(&editor);

    // Cancel: SCHEDULED -> DRAFT clears the schedule.
    let scheduled = approved_post(&app, &writer_token, &editor_token, "Maybe later").await;
    let at = (Utc::now() + Duration::hours(2)).to_rfc3339();
    patch_json_auth(
        app.clone(),
        &format!("/api/v1/posts/{scheduled}"),
        json!({ "status": "SCHEDULED", "scheduled_at": at }),
        &editor_token,
    )
    .await;
    let response = patch_json_auth(
        app.clone(),
        &format!("/api/v1/posts/{scheduled}"),
        json!({ "status": "DRAFT" }),
        &editor_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "DRAFT");
    assert!(json["data"]["scheduled_at"].is_null());
    assert_eq!(activity_count(&pool, scheduled, "SCHEDULE_CANCELLED").await, 1);

    // Publish now.
    let live = approved_post(&app, &writer_token, &editor_token, "Right now").await;
    let response = patch_json_auth(
        app.clone(),
        &format!("/api/v1/posts/{live}"),
        json!({ "status": "PUBLISHED" }),
        &editor_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "PUBLISHED");
    assert!(json["data"]["published_at"].is_string());

    // Cancelling something that is not scheduled is refused.
    let response = patch_json_auth(
        app,
        &format!("/api/v1/posts/{live}"),
        json!({ "status": "DRAFT" }),
        &editor_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_sweeps_publish_once(pool: PgPool) {
    let writer = create_user(&pool, "wendy", "writer").await;
    let editor = create_user(&pool, "eddie", "editor").await;
    let app = common::build_test_app(pool.clone());
    let editor_token = token_for(&editor);

    let post_id = approved_post(&app, &token_for(&writer), &editor_token, "Race day").await;
    schedule_due(&app, &editor_token, post_id).await;

    let bus = EventBus::default();
    let mut events = bus.subscribe();
    let (a, b) = tokio::join!(
        sweeper::sweep(&pool, &bus, 50),
        sweeper::sweep(&pool, &bus, 50),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.published_count + b.published_count, 1);
    assert_eq!(a.failed_count + b.failed_count, 0);
    assert_eq!(article_status(&pool, post_id).await, "PUBLISHED");
    assert_eq!(activity_count(&pool, post_id, "PUBLISHED").await, 1);

    let event = events.try_recv().unwrap();
    assert_eq!(event.article_id, post_id);
    assert!(events.try_recv().is_err(), "only one publication event");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sweep_after_manual_publish_does_nothing(pool: PgPool) {
    let writer = create_user(&pool, "wendy", "writer").await;
    let editor = create_user(&pool, "eddie", "editor").await;
    let app = common::build_test_app(pool.clone());
    let editor_token = token_for(&editor);

    let post_id = approved_post(&app, &token_for(&writer), &editor_token, "Beat the clock").await;
    schedule_due(&app, &editor_token, post_id).await;

    let response = patch_json_auth(
        app,
        &format!("/api/v1/posts/{post_id}"),
        json!({ "status": "PUBLISHED" }),
        &editor_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let report = sweeper::sweep(&pool, &EventBus::default(), 50).await.unwrap();
    assert_eq!(report, sweeper::SweepReport::default());
    assert_eq!(activity_count(&pool, post_id, "PUBLISHED").await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failing_article_does_not_block_the_rest(pool: PgPool) {
    let writer = create_user(&pool, "wendy", "writer").await;
    let editor = create_user(&pool, "eddie", "editor").await;
    let app = common::build_test_app(pool.clone());
    let writer_token = token_for(&writer);
    let editor_token = token_for(&editor);

    let broken = approved_post(&app, &writer_token, &editor_token, "Cursed").await;
    let healthy = approved_post(&app, &writer_token, &editor_token, "Fine").await;
    schedule_due(&app, &editor_token, broken).await;
    schedule_due(&app, &editor_token, healthy).await;

    sqlx::query(
        "CREATE FUNCTION refuse_cursed() RETURNS trigger AS $$
         BEGIN
             IF NEW.title = 'Cursed' AND NEW.status = 'PUBLISHED' THEN
                 RAISE EXCEPTION 'cursed article';
             END IF;
             RETURN NEW;
         END;
         $$ LANGUAGE plpgsql",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "CREATE TRIGGER refuse_cursed BEFORE UPDATE ON articles \
         FOR EACH ROW EXECUTE FUNCTION refuse_cursed()",
    )
    .execute(&pool)
    .await
    .unwrap();

    let report = sweeper::sweep(&pool, &EventBus::default(), 50).await.unwrap();
    assert_eq!(report.published_count, 1);
    assert_eq!(report.failed_count, 1);
    assert_eq!(article_status(&pool, broken).await, "SCHEDULED");
    assert_eq!(article_status(&pool, healthy).await, "PUBLISHED");
    assert_eq!(activity_count(&pool, broken, "PUBLISHED").await, 0);
    assert_eq!(activity_count(&pool, healthy, "PUBLISHED").await, 1);

    // The broken article stays due and fails again on the next sweep.
    let report = sweeper::sweep(&pool, &EventBus::default(), 50).await.unwrap();
    assert_eq!(report.published_count, 0);
    assert_eq!(report.failed_count, 1);
}

// ---------------------------------------------------------------------------
// Guards
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn rejected_article_cannot_be_scheduled(pool: PgPool) {
    let writer = create_user(&pool, "wendy", "writer").await;
    let editor = create_user(&pool, "eddie", "editor").await;
    let app = common::build_test_app(pool.clone());
    let editor_token = token_for(&editor);

    let post_id = submitted_post(&app, &token_for(&writer), "Off brand").await;
    let response = review_action(
        &app,
        &editor_token,
        json!({ "post_id": post_id, "action": "reject", "feedback": "Not for us" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    for body in [
        json!({ "status": "SCHEDULED", "scheduled_at": Utc::now().to_rfc3339() }),
        json!({ "status": "PUBLISHED" }),
    ] {
        let response = patch_json_auth(
            app.clone(),
            &format!("/api/v1/posts/{post_id}"),
            body,
            &editor_token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("rejected in review"));
    }

    assert_eq!(activity_count(&pool, post_id, "SCHEDULED").await, 0);
    assert_eq!(activity_count(&pool, post_id, "PUBLISHED").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn schedule_requires_timestamp_and_editor(pool: PgPool) {
    let writer = create_user(&pool, "wendy", "writer").await;
    let editor = create_user(&pool, "eddie", "editor").await;
    let app = common::build_test_app(pool);
    let writer_token = token_for(&writer);

    let post_id = create_post(&app, &writer_token, "Draft").await;

    let response = patch_json_auth(
        app.clone(),
        &format!("/api/v1/posts/{post_id}"),
        json!({ "status": "SCHEDULED", "scheduled_at": Utc::now().to_rfc3339() }),
        &writer_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = patch_json_auth(
        app.clone(),
        &format!("/api/v1/posts/{post_id}"),
        json!({ "status": "SCHEDULED" }),
        &token_for(&editor),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = patch_json_auth(
        app,
        &format!("/api/v1/posts/{post_id}"),
        json!({ "status": "SCHEDULED", "scheduled_at": "next tuesday" }),
        &token_for(&editor),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("ISO-8601"));
}

// ---------------------------------------------------------------------------
// Cron authentication
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn cron_rejects_wrong_or_missing_secret(pool: PgPool) {
    let app = common::build_test_app_with_cron(pool.clone());

    let response = post_bearer(app.clone(), "/api/v1/cron/publish-scheduled", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response =
        post_bearer(app, "/api/v1/cron/publish-scheduled", Some("not-the-secret")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cron_disabled_without_configured_secret(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response =
        post_bearer(app, "/api/v1/cron/publish-scheduled", Some(CRON_SECRET)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
