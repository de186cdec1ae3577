//! REST tests for the chat history endpoint.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use pourpal_config::{AuthConfig, DatabaseConfig};
use pourpal_database::{
    initialize_database, HangoutRepository, MessageRepository, SessionRepository, UserRepository,
};
use pourpal_gateway::{create_router, GatewayState};
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    pool: SqlitePool,
    _db_dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        let db_dir = TempDir::new().expect("create temp dir");
        let db_path = db_dir.path().join("pourpal-test.db");

        let config = DatabaseConfig {
            url: format!("sqlite:{}", db_path.display()),
            max_connections: 5,
        };

        let pool = initialize_database(&config).await.expect("initialize database");
        let state = GatewayState::new(pool.clone(), &AuthConfig::default());
        let router = create_router(state);

        Self {
            router,
            pool,
            _db_dir: db_dir,
        }
    }

    async fn seed_user(&self, email: &str, first_name: Option<&str>) -> (i64, String) {
        let users = UserRepository::new(self.pool.clone());
        let sessions = SessionRepository::new(self.pool.clone());

        let user = users.create(email, first_name, None).await.unwrap();
        let token = cuid2::cuid();
        let expires = (Utc::now() + Duration::days(1)).to_rfc3339();
        sessions.create(user.id, &token, &expires).await.unwrap();

        (user.id, token)
    }

    async fn seed_hangout(&self, creator_id: i64, participants: &[i64]) -> i64 {
        let hangouts = HangoutRepository::new(self.pool.clone());
        let hangout = hangouts
            .create("Tasting", "Cellar Door", "2026-09-12T19:00:00+00:00", creator_id)
            .await
            .unwrap();
        for user_id in participants {
            hangouts.add_participant(hangout.id, *user_id).await.unwrap();
        }
        hangout.id
    }

    async fn get_history(&self, hangout_id: i64, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(Method::GET)
            .uri(format!("/api/chat/{hangout_id}/messages"));

        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("sessionid={token}"));
        }

        let request = builder.body(Body::empty()).expect("build request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("send request");

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }
}

#[tokio::test]
async fn history_requires_authentication() {
    let app = TestApp::new().await;
    let (creator_id, _token) = app.seed_user("kim@example.com", Some("Kim")).await;
    let hangout_id = app.seed_hangout(creator_id, &[creator_id]).await;

    let (status, _body) = app.get_history(hangout_id, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _body) = app.get_history(hangout_id, Some("bogus-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn history_requires_participation() {
    let app = TestApp::new().await;
    let (creator_id, _creator_token) = app.seed_user("kim@example.com", Some("Kim")).await;
    let (_outsider_id, outsider_token) = app.seed_user("lee@example.com", Some("Lee")).await;
    let hangout_id = app.seed_hangout(creator_id, &[creator_id]).await;

    let (status, _body) = app.get_history(hangout_id, Some(&outsider_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn missing_hangout_is_forbidden() {
    let app = TestApp::new().await;
    let (_user_id, token) = app.seed_user("kim@example.com", Some("Kim")).await;

    let (status, _body) = app.get_history(404404, Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn participant_reads_messages_oldest_first() {
    let app = TestApp::new().await;
    let (kim_id, kim_token) = app.seed_user("kim@example.com", Some("Kim")).await;
    let (lee_id, _lee_token) = app.seed_user("lee@example.com", None).await;
    let hangout_id = app.seed_hangout(kim_id, &[kim_id, lee_id]).await;

    let messages = MessageRepository::new(app.pool.clone());
    messages.append(hangout_id, kim_id, "first").await.unwrap();
    messages.append(hangout_id, lee_id, "second").await.unwrap();

    let (status, body) = app.get_history(hangout_id, Some(&kim_token)).await;
    assert_eq!(status, StatusCode::OK);

    let entries = body.as_array().expect("array body");
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0]["message_text"], "first");
    assert_eq!(entries[0]["user_id"], kim_id);
    assert_eq!(entries[0]["user_name"], "Kim");
    assert_eq!(entries[0]["user_photo"], Value::Null);
    assert_eq!(entries[0]["hangout_id"], hangout_id);

    // No first name stored, so the email local part is displayed.
    assert_eq!(entries[1]["message_text"], "second");
    assert_eq!(entries[1]["user_name"], "lee");
}

#[tokio::test]
async fn history_timestamps_match_persisted_rows() {
    let app = TestApp::new().await;
    let (kim_id, kim_token) = app.seed_user("kim@example.com", Some("Kim")).await;
    let hangout_id = app.seed_hangout(kim_id, &[kim_id]).await;

    let messages = MessageRepository::new(app.pool.clone());
    let stored = messages.append(hangout_id, kim_id, "clocked").await.unwrap();

    let (status, body) = app.get_history(hangout_id, Some(&kim_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["timestamp"], stored.created_at);
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
}
