mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn liveness_probe_is_ok() {
    let (app, _db) = common::test_app().await;

    let (status, body) = common::get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(v["status"].as_str(), Some("ok"));
}

#[tokio::test]
async fn detailed_health_reports_database() {
    let (app, _db) = common::test_app().await;

    let (status, body) = common::get(&app, "/api/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(v["status"].as_str(), Some("ok"));
    assert_eq!(v["database"].as_str(), Some("connected"));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (app, _db) = common::test_app().await;

    let (status, _) = common::get(&app, "/api/v1/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
