mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn manager_can_create_field() {
    let (app, db) = common::test_app().await;
    let (token, user_id) = common::signup_manager(&app, &db, "fd1").await;

    let (status, body) = common::post_json_with_auth(
        &app,
        "/api/v1/fields",
        &json!({
            "name": "Stadtpark Court",
            "latitude": 48.2082,
            "longitude": 16.3738,
            "isManaged": true,
        }),
        &token,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(v["name"].as_str(), Some("Stadtpark Court"));
    assert_eq!(v["isManaged"].as_bool(), Some(true));
    assert_eq!(v["managerId"].as_str(), Some(user_id.as_str()));
}

#[tokio::test]
async fn unmanaged_field_has_no_manager() {
    let (app, db) = common::test_app().await;
    let (token, _) = common::signup_manager(&app, &db, "fd2").await;

    let (status, body) = common::post_json_with_auth(
        &app,
        "/api/v1/fields",
        &json!({
            "name": "Open Pitch",
            "latitude": 48.0,
            "longitude": 16.0,
        }),
        &token,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(v["isManaged"].as_bool(), Some(false));
    assert!(v["managerId"].is_null());
}

#[tokio::test]
async fn plain_user_cannot_create_field() {
    let (app, _db) = common::test_app().await;
    let (token, _) = common::signup(&app, "fd3").await;

    let (status, _) = common::post_json_with_auth(
        &app,
        "/api/v1/fields",
        &json!({
            "name": "Nope",
            "latitude": 48.0,
            "longitude": 16.0,
        }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_field_validates_coordinates() {
    let (app, db) = common::test_app().await;
    let (token, _) = common::signup_manager(&app, &db, "fd4").await;

    let (status, _) = common::post_json_with_auth(
        &app,
        "/api/v1/fields",
        &json!({
            "name": "Off the Map",
            "latitude": 123.0,
            "longitude": 16.0,
        }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_and_get_fields() {
    let (app, db) = common::test_app().await;
    let (token, _) = common::signup_manager(&app, &db, "fd5").await;

    let (_, body) = common::post_json_with_auth(
        &app,
        "/api/v1/fields",
        &json!({
            "name": "Riverside",
            "latitude": 48.0,
            "longitude": 16.0,
        }),
        &token,
    )
    .await;
    let created: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let field_id = created["id"].as_str().unwrap_or_default();

    let (status, body) = common::get(&app, "/api/v1/fields").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let list: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    let (status, body) = common::get(&app, &format!("/api/v1/fields/{field_id}")).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(v["name"].as_str(), Some("Riverside"));
}

#[tokio::test]
async fn get_unknown_field_is_404() {
    let (app, _db) = common::test_app().await;

    let (status, _) =
        common::get(&app, &format!("/api/v1/fields/{}", uuid::Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
