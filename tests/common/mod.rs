#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait};
use serde_json::json;
use tower::ServiceExt;

use pickup_api::config::{BookingConfig, Config, Environment};
use pickup_api::entities::user;
use pickup_api::state::AppState;

/// Build an app backed by a fresh in-memory database.
pub async fn test_app() -> (Router, DatabaseConnection) {
    let db = sea_orm::Database::connect("sqlite::memory:")
        .await
        .unwrap_or_default();
    Migrator::up(&db, None).await.unwrap_or_default();

    let state = AppState {
        db: db.clone(),
        config: Config {
            database_url: String::new(),
            server_host: std::net::IpAddr::from([127, 0, 0, 1]),
            server_port: 0,
            environment: Environment::Development,
            log_level: "warn".to_string(),
            jwt_secret: "test-secret-key-for-testing-only-32chars".to_string(),
            jwt_access_expiration_secs: 900,
            jwt_refresh_expiration_secs: 604_800,
            frontend_url: "http://localhost:3001".to_string(),
            booking: BookingConfig::default(),
        },
    };

    (pickup_api::routes::router().with_state(state), db)
}

/// Sign up a new user and return (`access_token`, `user_id`).
pub async fn signup(app: &Router, suffix: &str) -> (String, String) {
    let (status, body) = post_json(
        app,
        "/api/v1/auth/signup/email",
        &json!({
            "email": format!("player{suffix}@example.com"),
            "username": format!("player{suffix}"),
            "password": "SecurePass123!",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let token = v["token"].as_str().unwrap_or_default().to_string();
    let user_id = v["user"]["id"].as_str().unwrap_or_default().to_string();
    (token, user_id)
}

/// Give a user the manager role directly in the database, then sign in
/// again so the returned token carries the manager role claim.
pub async fn signup_manager(
    app: &Router,
    db: &DatabaseConnection,
    suffix: &str,
) -> (String, String) {
    let (_, user_id) = signup(app, suffix).await;

    let uid = uuid::Uuid::parse_str(&user_id).unwrap_or_default();
    if let Ok(Some(u)) = user::Entity::find_by_id(uid).one(db).await {
        let mut active: user::ActiveModel = u.into();
        active.role = Set("manager".to_string());
        let _ = active.update(db).await;
    }

    let (status, body) = post_json(
        app,
        "/api/v1/auth/signin/email",
        &json!({
            "email": format!("player{suffix}@example.com"),
            "password": "SecurePass123!",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "signin failed: {body}");
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let token = v["token"].as_str().unwrap_or_default().to_string();
    (token, user_id)
}

/// Test helper: send a request and return (status, body string).
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap_or_default();

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .unwrap_or_default();
    let body_str = String::from_utf8(body.to_vec()).unwrap_or_default();

    (status, body_str)
}

fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap_or_default()
}

fn json_request_with_auth(
    method: &str,
    uri: &str,
    body: &serde_json::Value,
    token: &str,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap_or_default()
}

/// Send a GET request.
pub async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap_or_default();
    send(app, request).await
}

/// Send an authenticated GET request.
pub async fn get_with_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap_or_default();
    send(app, request).await
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: &Router, uri: &str, body: &serde_json::Value) -> (StatusCode, String) {
    send(app, json_request("POST", uri, body)).await
}

/// Send an authenticated POST request with a JSON body.
pub async fn post_json_with_auth(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
    token: &str,
) -> (StatusCode, String) {
    send(app, json_request_with_auth("POST", uri, body, token)).await
}

/// Send an authenticated POST request with no body.
pub async fn post_with_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap_or_default();
    send(app, request).await
}

/// Send an authenticated PATCH request with a JSON body.
pub async fn patch_json_with_auth(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
    token: &str,
) -> (StatusCode, String) {
    send(app, json_request_with_auth("PATCH", uri, body, token)).await
}

/// Send an authenticated DELETE request.
pub async fn delete_with_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap_or_default();
    send(app, request).await
}
