mod common;

use chrono::{Duration, Utc};
use serde_json::Value;

#[tokio::test]
async fn test_new_guest_gets_session_token() {
    let t = common::create_test_app();
    let server = common::server(t.state.clone());

    let response = server.get("/api/v1/url/history").await;
    response.assert_status_ok();

    let token = common::session_token(&response);
    assert_eq!(token.len(), 43);
    assert!(
        t.state
            .identity_service
            .find_session(&token)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_session_token_is_reused_and_expiry_slides() {
    let t = common::create_test_app();
    let server = common::server(t.state.clone());

    let first = server.get("/api/v1/url/history").await;
    let token = common::session_token(&first);
    let before = t
        .state
        .identity_service
        .find_session(&token)
        .await
        .unwrap()
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let second = server
        .get("/api/v1/url/history")
        .add_header(common::SESSION_HEADER, token.as_str())
        .await;
    assert_eq!(common::session_token(&second), token);

    let after = t
        .state
        .identity_service
        .find_session(&token)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.id, before.id);
    assert!(after.expires_at > before.expires_at);
    assert!(after.last_accessed >= before.last_accessed);
}

#[tokio::test]
async fn test_unknown_session_token_gets_replaced() {
    let t = common::create_test_app();
    let server = common::server(t.state);

    let response = server
        .get("/api/v1/url/history")
        .add_header(common::SESSION_HEADER, "abc")
        .await;
    response.assert_status_ok();

    let token = common::session_token(&response);
    assert!(!token.is_empty());
    assert_ne!(token, "abc");
}

#[tokio::test]
async fn test_expired_session_token_gets_replaced() {
    let t = common::create_test_app();
    let server = common::server(t.state.clone());
    let expired = t
        .repos
        .sessions
        .create(
            &t.state.identity_service.hash_token("abc"),
            Utc::now() - Duration::hours(1),
        )
        .await
        .unwrap();

    let response = server
        .get("/api/v1/url/history")
        .add_header(common::SESSION_HEADER, "abc")
        .await;
    response.assert_status_ok();

    let token = common::session_token(&response);
    assert_ne!(token, "abc");
    let session = t
        .state
        .identity_service
        .find_session(&token)
        .await
        .unwrap()
        .expect("a fresh session is stored");
    assert_ne!(session.id, expired.id);

    let stale = t
        .state
        .identity_service
        .find_session("abc")
        .await
        .unwrap()
        .unwrap();
    assert!(stale.expires_at < Utc::now());
}

#[tokio::test]
async fn test_invalid_bearer_falls_back_to_guest() {
    let t = common::create_test_app();
    let server = common::server(t.state);

    let response = server
        .post("/api/v1/url/shorten")
        .authorization_bearer("definitely-not-a-jwt")
        .json(&serde_json::json!({ "original_url": "https://example.com" }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    assert!(!common::session_token(&response).is_empty());
}

#[tokio::test]
async fn test_user_gets_no_session_token() {
    let t = common::create_test_app();
    let server = common::server(t.state);
    let access = common::login_user(&server, "ann@example.com").await;

    let response = server
        .get("/api/v1/url/history")
        .authorization_bearer(&access)
        .await;
    response.assert_status_ok();
    assert!(response.maybe_header(common::SESSION_HEADER).is_none());
    assert_eq!(response.json::<Value>()["data"]["history"], Value::Array(vec![]));
}

#[tokio::test]
async fn test_error_responses_still_echo_session_token() {
    let t = common::create_test_app();
    let server = common::server(t.state);

    let response = server.get("/api/v1/url/redirect/missing1").await;
    response.assert_status_not_found();
    assert!(!common::session_token(&response).is_empty());
}
