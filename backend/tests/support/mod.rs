#![allow(dead_code)] // each test binary uses its own subset of helpers

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use keygate_backend::config::Config;
use keygate_backend::models::user::User;
use keygate_backend::repositories::{MemoryStore, UserStore};
use keygate_backend::state::AppState;
use keygate_backend::utils::hashing::hash_login_key;
use keygate_backend::utils::jwt::{create_access_token, ROLE_ADMIN, ROLE_USER};

pub const JWT_SECRET: &str = "integration-test-secret";
pub const ADMIN_PASSWORD: &str = "panel-password";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        admin_password: ADMIN_PASSWORD.to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        jwt_expiration_hours: 24,
        admin_jwt_expiration_hours: 1,
        port: 0,
        cookie_secure: false,
    }
}

/// Builds the real router over a fresh in-memory store.
pub fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(test_config(), store.clone(), store.clone(), store.clone());
    TestApp {
        router: keygate_backend::app(state),
        store,
    }
}

/// Inserts a user whose login key is `login_key` and returns their id.
pub async fn seed_user(store: &MemoryStore, login_key: &str) -> String {
    let user = User::new(hash_login_key(login_key).expect("hash login key"));
    store.insert(&user).await.expect("insert user");
    user.id
}

pub fn user_token(user_id: &str) -> String {
    create_access_token(user_id.to_string(), ROLE_USER.to_string(), JWT_SECRET, 1)
        .expect("create user token")
}

pub fn admin_token() -> String {
    create_access_token(ROLE_ADMIN.to_string(), ROLE_ADMIN.to_string(), JWT_SECRET, 1)
        .expect("create admin token")
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router call");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}

pub async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request");
    send(router, request).await
}

pub async fn post_json_auth(
    router: &Router,
    uri: &str,
    body: Value,
    token: &str,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .expect("build request");
    send(router, request).await
}

pub async fn post_auth(router: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("build request");
    send(router, request).await
}

pub async fn get_auth(router: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("build request");
    send(router, request).await
}

pub async fn get_plain(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request");
    send(router, request).await
}

pub async fn put_json_auth(
    router: &Router,
    uri: &str,
    body: Value,
    token: &str,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .expect("build request");
    send(router, request).await
}
