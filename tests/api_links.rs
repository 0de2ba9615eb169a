mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use snaplink::domain::repositories::{ClickRepository, LinkRepository};
use snaplink::infrastructure::cache::CacheService;

#[tokio::test]
async fn test_shorten_then_redirect() {
    let t = common::create_test_app();
    let server = common::server(t.state.clone());

    let response = server
        .post("/api/v1/url/shorten")
        .json(&json!({ "original_url": "https://example.com/landing?x=1" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["status"], true);
    let code = body["data"]["short_code"].as_str().unwrap();
    assert_eq!(code.len(), 8);
    assert_eq!(
        body["data"]["short_url"],
        format!("http://sl.test/r/{code}")
    );

    let redirect = server.get(&format!("/api/v1/url/redirect/{code}")).await;
    redirect.assert_status(StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        redirect.header("location"),
        "https://example.com/landing?x=1"
    );
}

#[tokio::test]
async fn test_redirect_queues_click_with_origin() {
    let mut t = common::create_test_app();
    let server = common::server(t.state.clone());
    let (code, _) = common::shorten(&server, "https://example.com", None).await;

    server
        .get(&format!("/api/v1/url/redirect/{code}"))
        .add_header("User-Agent", "TestBot/1.0")
        .await
        .assert_status(StatusCode::MOVED_PERMANENTLY);

    let event = t.click_rx.try_recv().unwrap();
    assert_eq!(event.code, code);
    assert_eq!(event.ip.as_deref(), Some("127.0.0.1"));
    assert_eq!(event.user_agent.as_deref(), Some("TestBot/1.0"));

    let link = t.repos.links.find_by_code(&code).await.unwrap().unwrap();
    assert_eq!(link.click_count, 1);
}

#[tokio::test]
async fn test_shorten_rejects_invalid_url() {
    let t = common::create_test_app();
    let server = common::server(t.state);

    for url in [
        "not a url",
        "ftp://example.com/file",
        "/relative/path",
        "https://example.com/a\nb",
    ] {
        let response = server
            .post("/api/v1/url/shorten")
            .json(&json!({ "original_url": url }))
            .await;
        response.assert_status_bad_request();
        assert_eq!(response.json::<Value>()["message"], "Invalid URL format");
    }
}

#[tokio::test]
async fn test_shorten_rejects_missing_url_and_bad_json() {
    let t = common::create_test_app();
    let server = common::server(t.state);

    server
        .post("/api/v1/url/shorten")
        .json(&json!({}))
        .await
        .assert_status_bad_request();

    server
        .post("/api/v1/url/shorten")
        .text("{not json")
        .content_type("application/json")
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_shorten_with_future_expiry_is_listed() {
    let t = common::create_test_app();
    let server = common::server(t.state);
    let expires_at = Utc::now() + Duration::days(1);

    let response = server
        .post("/api/v1/url/shorten")
        .json(&json!({ "original_url": "https://example.com", "expires_at": expires_at }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let token = common::session_token(&response);

    let history = server
        .get("/api/v1/url/history")
        .add_header(common::SESSION_HEADER, token.as_str())
        .await
        .json::<Value>();
    assert!(history["data"]["history"][0]["expires_at"].is_string());

    server
        .post("/api/v1/url/shorten")
        .json(&json!({
            "original_url": "https://example.com",
            "expires_at": Utc::now() - Duration::minutes(1)
        }))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_unknown_code_is_not_found() {
    let t = common::create_test_app();
    let server = common::server(t.state);

    let response = server.get("/api/v1/url/redirect/nope1234").await;
    response.assert_status_not_found();

    let body = response.json::<Value>();
    assert_eq!(body["status"], false);
    assert_eq!(body["message"], "URL not found");
}

#[tokio::test]
async fn test_expired_link_is_gone_and_not_counted() {
    let mut t = common::create_test_app();
    let server = common::server(t.state.clone());
    let link = common::insert_link(
        &t.repos,
        "expired1",
        "https://example.com/old",
        Some(Utc::now() - Duration::hours(1)),
    )
    .await;

    let response = server.get("/api/v1/url/redirect/expired1").await;
    response.assert_status(StatusCode::GONE);
    assert_eq!(response.json::<Value>()["message"], "URL expired");

    let stored = t.repos.links.find_by_code("expired1").await.unwrap().unwrap();
    assert_eq!(stored.click_count, 0);
    assert!(t.click_rx.try_recv().is_err());
    assert!(t.repos.clicks.list_by_link(link.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_history_pages_newest_first() {
    let t = common::create_test_app();
    let server = common::server(t.state);

    let (_, token) = common::shorten(&server, "https://example.com/0", None).await;
    for i in 1..15 {
        common::shorten(&server, &format!("https://example.com/{i}"), Some(&token)).await;
    }

    let first = server
        .get("/api/v1/url/history")
        .add_query_param("page", 1)
        .add_query_param("limit", 10)
        .add_header(common::SESSION_HEADER, token.as_str())
        .await;
    first.assert_status_ok();
    let first = first.json::<Value>();
    let items = first["data"]["history"].as_array().unwrap();
    assert_eq!(items.len(), 10);
    assert_eq!(items[0]["original_url"], "https://example.com/14");
    assert_eq!(first["data"]["meta"], json!({ "page": 1, "limit": 10, "count": 10 }));

    let second = server
        .get("/api/v1/url/history")
        .add_query_param("page", 2)
        .add_query_param("limit", 10)
        .add_header(common::SESSION_HEADER, token.as_str())
        .await
        .json::<Value>();
    let items = second["data"]["history"].as_array().unwrap();
    assert_eq!(items.len(), 5);
    assert_eq!(items[4]["original_url"], "https://example.com/0");
}

#[tokio::test]
async fn test_history_bad_paging_falls_back_to_defaults() {
    let t = common::create_test_app();
    let server = common::server(t.state);
    let (_, token) = common::shorten(&server, "https://example.com", None).await;

    let body = server
        .get("/api/v1/url/history?page=0&limit=-1")
        .add_header(common::SESSION_HEADER, token.as_str())
        .await
        .json::<Value>();
    assert_eq!(body["data"]["meta"]["page"], 1);
    assert_eq!(body["data"]["meta"]["limit"], 10);

    let body = server
        .get("/api/v1/url/history?page=abc&limit=xyz")
        .add_header(common::SESSION_HEADER, token.as_str())
        .await
        .json::<Value>();
    assert_eq!(body["data"]["meta"]["page"], 1);
    assert_eq!(body["data"]["meta"]["limit"], 10);
}

#[tokio::test]
async fn test_history_is_scoped_to_caller() {
    let t = common::create_test_app();
    let server = common::server(t.state);
    let (_, alice) = common::shorten(&server, "https://alice.example.com", None).await;
    let (_, bob) = common::shorten(&server, "https://bob.example.com", None).await;
    assert_ne!(alice, bob);

    let body = server
        .get("/api/v1/url/history")
        .add_header(common::SESSION_HEADER, bob.as_str())
        .await
        .json::<Value>();
    let items = body["data"]["history"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["original_url"], "https://bob.example.com");
}

#[tokio::test]
async fn test_redirect_with_unsendable_destination_is_server_error() {
    let t = common::create_test_app();
    let server = common::server(t.state);
    common::insert_link(&t.repos, "ctrlchar", "https://example.com/a\nb", None).await;

    let response = server.get("/api/v1/url/redirect/ctrlchar").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.maybe_header("location").is_none());
}

#[tokio::test]
async fn test_delete_by_non_owner_is_not_found() {
    let t = common::create_test_app();
    let server = common::server(t.state);
    let (code, _) = common::shorten(&server, "https://example.com", None).await;

    let response = server.delete(&format!("/api/v1/url/{code}")).await;
    response.assert_status_not_found();

    let missing = server.delete("/api/v1/url/nosuchcd").await;
    missing.assert_status_not_found();
    assert_eq!(response.json::<Value>(), missing.json::<Value>());

    server
        .get(&format!("/api/v1/url/redirect/{code}"))
        .await
        .assert_status(StatusCode::MOVED_PERMANENTLY);
}

#[tokio::test]
async fn test_delete_removes_link_and_clicks() {
    let t = common::create_test_app();
    let server = common::server(t.state.clone());
    let (code, token) = common::shorten(&server, "https://example.com", None).await;
    let link = t.repos.links.find_by_code(&code).await.unwrap().unwrap();

    t.repos
        .clicks
        .record_click(snaplink::domain::entities::NewClick {
            link_id: link.id,
            ip: None,
            user_agent: None,
            clicked_at: Utc::now(),
        })
        .await
        .unwrap();

    // Warm the cache so deletion must evict it.
    server
        .get(&format!("/api/v1/url/redirect/{code}"))
        .await
        .assert_status(StatusCode::MOVED_PERMANENTLY);

    let response = server
        .delete(&format!("/api/v1/url/{code}"))
        .add_header(common::SESSION_HEADER, token.as_str())
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["message"],
        "URL deleted successfully"
    );

    assert!(t.repos.links.find_by_code(&code).await.unwrap().is_none());
    assert!(t.repos.clicks.list_by_link(link.id).await.unwrap().is_empty());
    assert!(t.state.cache.get_url(&code).await.unwrap().is_none());

    server
        .get(&format!("/api/v1/url/redirect/{code}"))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_delete_blank_code_is_bad_request() {
    let t = common::create_test_app();
    let server = common::server(t.state);

    server
        .delete("/api/v1/url/%20")
        .await
        .assert_status_bad_request();
}
