use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use sea_orm::DatabaseConnection;
use tower::ServiceExt;
use uuid::Uuid;

use firmq_auth_types::token::SessionKey;
use firmq_frontend::infra::notify::{EMAIL_CHANNEL, NotificationQueue, Notifier, SMS_CHANNEL};
use firmq_frontend::router::build_router;
use firmq_frontend::state::AppState;
use firmq_testing::auth::{MockBearer, TEST_SECRET};

use crate::helpers::ttl;

/// Router over a disconnected store: only paths that finish before the first
/// query can succeed.
fn app() -> Router {
    let (email, _) = NotificationQueue::bounded(EMAIL_CHANNEL, 1, Duration::from_millis(10));
    let (sms, _) = NotificationQueue::bounded(SMS_CHANNEL, 1, Duration::from_millis(10));
    build_router(AppState {
        db: DatabaseConnection::Disconnected,
        session_key: SessionKey::new(TEST_SECRET),
        notifier: Notifier { email, sms },
        ttl: ttl(),
    })
}

async fn json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> axum::http::request::Builder {
    Request::builder().method("GET").uri(uri)
}

#[tokio::test]
async fn should_answer_liveness() {
    let resp = app()
        .oneshot(get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json(resp).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["status"], "OK");
}

#[tokio::test]
async fn should_report_not_ready_without_database() {
    let resp = app()
        .oneshot(get("/readyz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json(resp).await["ok"], false);
}

#[tokio::test]
async fn should_echo_request_id() {
    let resp = app()
        .oneshot(
            get("/healthz")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.headers()["x-request-id"], "req-123");
}

#[tokio::test]
async fn should_reject_missing_bearer() {
    let resp = app()
        .oneshot(get("/v1/user").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = json(resp).await;
    assert_eq!(body["status"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn should_reject_expired_and_foreign_tokens_alike() {
    let expired = MockBearer::new(Uuid::new_v4()).expired();
    let foreign = MockBearer::new(Uuid::new_v4()).signed_with("another-secret");

    for bearer in [expired, foreign] {
        let mut req = get("/v1/entity").body(Body::empty()).unwrap();
        req.headers_mut().extend(bearer.headers());
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json(resp).await["error"], "authentication required");
    }
}

#[tokio::test]
async fn should_reject_malformed_login_body_in_envelope() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"email\":"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json(resp).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["status"], "INVALID_INPUT");
}

#[tokio::test]
async fn should_hide_store_failure_behind_internal_error() {
    let bearer = MockBearer::new(Uuid::new_v4()).admin();
    let mut req = get("/v1/user").body(Body::empty()).unwrap();
    req.headers_mut().extend(bearer.headers());

    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json(resp).await;
    assert_eq!(body["status"], "INTERNAL");
    assert_eq!(body["error"], "internal error");
}
