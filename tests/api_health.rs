mod common;

use serde_json::Value;

#[tokio::test]
async fn test_health_reports_every_dependency() {
    let t = common::create_test_app();
    let server = common::server(t.state);

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["storage"]["status"], "healthy");
    assert_eq!(body["checks"]["cache"]["backend"], "memory");
    assert_eq!(body["checks"]["click_queue"]["status"], "healthy");
}

#[tokio::test]
async fn test_health_degrades_when_click_queue_closes() {
    let t = common::create_test_app();
    drop(t.click_rx);
    let server = common::server(t.state);

    let response = server.get("/health").await;
    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<Value>()["checks"]["click_queue"]["status"], "unhealthy");
}

#[tokio::test]
async fn test_ping() {
    let t = common::create_test_app();
    let server = common::server(t.state);

    let response = server.get("/api/v1/test/ping").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["message"], "pong");
}
