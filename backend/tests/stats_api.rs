mod support;

use axum::http::StatusCode;
use serde_json::json;

use keygate_backend::repositories::SessionKeyStore;
use support::{get_auth, get_plain, post_auth, post_json, seed_user, spawn_app, user_token};

#[tokio::test]
async fn report_rejects_missing_fields() {
    let app = spawn_app();

    let (status, body) = post_json(
        &app.router,
        "/api/stats/report",
        json!({ "sessionKey": "abc" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing sessionKey or eventType.");
}

#[tokio::test]
async fn report_rejects_unknown_key() {
    let app = spawn_app();

    let (status, body) = post_json(
        &app.router,
        "/api/stats/report",
        json!({ "sessionKey": "0".repeat(36), "eventType": "execution" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Invalid or inactive session key.");
}

#[tokio::test]
async fn report_rejects_deactivated_key_indistinguishably_from_unknown() {
    let app = spawn_app();
    let user_id = seed_user(&app.store, &"0f".repeat(26)).await;
    let token = user_token(&user_id);

    let (_, body) = post_auth(&app.router, "/api/keys/generate", &token).await;
    let session_key = body["sessionKey"].as_str().unwrap().to_string();

    let key = app
        .store
        .find_by_value(&session_key)
        .await
        .unwrap()
        .unwrap();
    app.store.set_active(&key.id, false).await.unwrap();

    let (status, body) = post_json(
        &app.router,
        "/api/stats/report",
        json!({ "sessionKey": session_key, "eventType": "execution" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Invalid or inactive session key.");
}

#[tokio::test]
async fn reported_events_show_up_in_the_dashboard_stats() {
    let app = spawn_app();
    let user_id = seed_user(&app.store, &"0f".repeat(26)).await;
    let token = user_token(&user_id);

    let (_, body) = post_auth(&app.router, "/api/keys/generate", &token).await;
    let session_key = body["sessionKey"].as_str().unwrap().to_string();

    post_json(
        &app.router,
        "/api/keys/claim",
        json!({ "sessionKey": session_key, "hwid": "HW-A" }),
    )
    .await;

    let (status, body) = post_json(
        &app.router,
        "/api/stats/report",
        json!({
            "sessionKey": session_key,
            "eventType": "execution",
            "metadata": { "version": "1.4.2" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    post_json(
        &app.router,
        "/api/stats/report",
        json!({ "sessionKey": session_key, "eventType": "execution" }),
    )
    .await;

    let (status, body) = get_auth(&app.router, "/api/stats/get", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_executions"], 2);
    assert_eq!(body["active_keys"], 1);
    assert_eq!(body["locked_keys"], 1);
    assert!(body["last_used"].is_string());
}

#[tokio::test]
async fn stats_require_authentication() {
    let app = spawn_app();
    let (status, _) = get_plain(&app.router, "/api/stats/get").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
