#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use masthead_api::auth::jwt::{generate_access_token, JwtConfig};
use masthead_api::config::{ServerConfig, SweeperConfig};
use masthead_api::router::build_app_router;
use masthead_api::state::AppState;
use masthead_db::models::user::{CreateUser, User};
use masthead_db::repositories::UserRepo;
use masthead_events::EventBus;

pub const CRON_SECRET: &str = "test-cron-secret";

/// Build a test `ServerConfig` with safe defaults and no cron secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        jwt: JwtConfig {
            secret: "masthead-integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
        cron_secret: None,
        sweeper: SweeperConfig {
            enabled: false,
            ..SweeperConfig::default()
        },
        notification_timeout_secs: 1,
    }
}

pub fn test_state(pool: PgPool, config: ServerConfig) -> AppState {
    AppState {
        pool,
        config: Arc::new(config),
        event_bus: Arc::new(EventBus::default()),
    }
}

/// The full application router, with the same middleware stack as
/// production.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    build_app_router(test_state(pool, config.clone()), &config)
}

/// Router whose cron trigger accepts [`CRON_SECRET`].
pub fn build_test_app_with_cron(pool: PgPool) -> Router {
    let config = ServerConfig {
        cron_secret: Some(CRON_SECRET.to_string()),
        ..test_config()
    };
    build_app_router(test_state(pool, config.clone()), &config)
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

pub async fn create_user(pool: &PgPool, name: &str, role: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: format!("{name}@example.com"),
            display_name: name.to_string(),
            role: role.to_string(),
        },
    )
    .await
    .expect("user creation should succeed")
}

pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, &test_config().jwt)
        .expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

/// POST with no body and an arbitrary bearer value.
pub async fn post_bearer(app: Router, uri: &str, bearer: Option<&str>) -> Response<Body> {
    send(app, Method::POST, uri, bearer, None).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Workflow shortcuts
// ---------------------------------------------------------------------------

/// Create a draft through the API and return its id.
pub async fn create_post(app: &Router, token: &str, title: &str) -> i64 {
    let response = post_json_auth(
        app.clone(),
        "/api/v1/posts",
        serde_json::json!({ "title": title, "body": "<p>Some body text for review.</p>" }),
        token,
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create and submit a draft, returning its id.
pub async fn submitted_post(app: &Router, token: &str, title: &str) -> i64 {
    let id = create_post(app, token, title).await;
    let response = post_bearer(
        app.clone(),
        &format!("/api/v1/posts/{id}/submit"),
        Some(token),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    id
}

pub async fn review_action(
    app: &Router,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    post_json_auth(app.clone(), "/api/v1/review", body, token).await
}

/// Count activity rows for an article and action.
pub async fn activity_count(pool: &PgPool, article_id: i64, action: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*)::BIGINT FROM activity_log WHERE article_id = $1 AND action = $2",
    )
    .bind(article_id)
    .bind(action)
    .fetch_one(pool)
    .await
    .unwrap()
}
