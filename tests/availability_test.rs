mod common;

use axum::Router;
use axum::http::StatusCode;
use sea_orm::DatabaseConnection;
use serde_json::json;

// ─────────────────────────────────────────────────────────────────────────────
// Test Infrastructure
// ─────────────────────────────────────────────────────────────────────────────

/// Create a field via the API and return its ID.
async fn create_field(app: &Router, token: &str, name: &str, managed: bool) -> String {
    let (status, body) = common::post_json_with_auth(
        app,
        "/api/v1/fields",
        &json!({
            "name": name,
            "latitude": 52.52,
            "longitude": 13.405,
            "isManaged": managed,
        }),
        token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create field failed: {body}");
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    v["id"].as_str().unwrap_or_default().to_string()
}

/// Book a game on the field and return its ID.
async fn create_game(app: &Router, token: &str, field_id: &str, start: &str, end: &str) -> String {
    let (status, body) = common::post_json_with_auth(
        app,
        "/api/v1/games",
        &json!({
            "gameType": "football",
            "fieldId": field_id,
            "startDate": start,
            "endDate": end,
            "maxParticipants": 10,
        }),
        token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create game failed: {body}");
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    v["id"].as_str().unwrap_or_default().to_string()
}

/// Sign up a manager and create an open (unmanaged) field.
async fn setup_field(app: &Router, db: &DatabaseConnection, suffix: &str) -> (String, String) {
    let (token, _) = common::signup_manager(app, db, suffix).await;
    let field_id = create_field(app, &token, &format!("Field {suffix}"), false).await;
    (token, field_id)
}

fn slots(body: &str) -> Vec<String> {
    let v: serde_json::Value = serde_json::from_str(body).unwrap_or_default();
    v["slots"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .map(|s| s.as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn end_times(body: &str) -> Vec<String> {
    let v: serde_json::Value = serde_json::from_str(body).unwrap_or_default();
    v["endTimes"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .map(|s| s.as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}

// ─────────────────────────────────────────────────────────────────────────────
// Start slots
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_field_offers_full_grid() {
    let (app, db) = common::test_app().await;
    let (_token, field_id) = setup_field(&app, &db, "av1").await;

    let (status, body) = common::get(
        &app,
        &format!("/api/v1/fields/{field_id}/availability?date=2025-06-01&tzOffset=0"),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    let slots = slots(&body);
    assert_eq!(slots.len(), 48);
    assert_eq!(slots.first().map(String::as_str), Some("00:00"));
    assert_eq!(slots.last().map(String::as_str), Some("23:30"));
}

#[tokio::test]
async fn booked_game_blocks_its_slots() {
    let (app, db) = common::test_app().await;
    let (token, field_id) = setup_field(&app, &db, "av2").await;
    create_game(
        &app,
        &token,
        &field_id,
        "2025-06-01T10:00:00Z",
        "2025-06-01T12:00:00Z",
    )
    .await;

    let (status, body) = common::get(
        &app,
        &format!("/api/v1/fields/{field_id}/availability?date=2025-06-01&tzOffset=0"),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    let slots = slots(&body);
    assert!(slots.contains(&"09:30".to_string()));
    assert!(!slots.contains(&"10:00".to_string()));
    assert!(!slots.contains(&"10:30".to_string()));
    assert!(!slots.contains(&"11:30".to_string()));
    // A game ending exactly at 12:00 does not block the 12:00 slot.
    assert!(slots.contains(&"12:00".to_string()));
}

#[tokio::test]
async fn availability_is_idempotent() {
    let (app, db) = common::test_app().await;
    let (token, field_id) = setup_field(&app, &db, "av3").await;
    create_game(
        &app,
        &token,
        &field_id,
        "2025-06-01T08:00:00Z",
        "2025-06-01T09:00:00Z",
    )
    .await;

    let uri = format!("/api/v1/fields/{field_id}/availability?date=2025-06-01&tzOffset=0");
    let (_, first) = common::get(&app, &uri).await;
    let (_, second) = common::get(&app, &uri).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn midnight_spanning_game_blocks_both_dates() {
    let (app, db) = common::test_app().await;
    let (token, field_id) = setup_field(&app, &db, "av4").await;
    create_game(
        &app,
        &token,
        &field_id,
        "2025-06-01T23:00:00Z",
        "2025-06-02T01:00:00Z",
    )
    .await;

    let (_, day_one) = common::get(
        &app,
        &format!("/api/v1/fields/{field_id}/availability?date=2025-06-01&tzOffset=0"),
    )
    .await;
    let day_one = slots(&day_one);
    assert!(!day_one.contains(&"23:00".to_string()));
    assert!(!day_one.contains(&"23:30".to_string()));
    assert!(day_one.contains(&"22:30".to_string()));

    let (_, day_two) = common::get(
        &app,
        &format!("/api/v1/fields/{field_id}/availability?date=2025-06-02&tzOffset=0"),
    )
    .await;
    let day_two = slots(&day_two);
    assert!(!day_two.contains(&"00:00".to_string()));
    assert!(!day_two.contains(&"00:30".to_string()));
    assert!(day_two.contains(&"01:00".to_string()));
}

#[tokio::test]
async fn timezone_offset_shifts_labels() {
    let (app, db) = common::test_app().await;
    let (token, field_id) = setup_field(&app, &db, "av5").await;
    // 10:00-11:00 UTC is 12:00-13:00 at UTC+2.
    create_game(
        &app,
        &token,
        &field_id,
        "2025-06-01T10:00:00Z",
        "2025-06-01T11:00:00Z",
    )
    .await;

    let (_, body) = common::get(
        &app,
        &format!("/api/v1/fields/{field_id}/availability?date=2025-06-01&tzOffset=2"),
    )
    .await;
    let slots = slots(&body);
    assert!(!slots.contains(&"12:00".to_string()));
    assert!(!slots.contains(&"12:30".to_string()));
    assert!(slots.contains(&"11:30".to_string()));
    assert!(slots.contains(&"13:00".to_string()));
}

#[tokio::test]
async fn availability_unknown_field_is_404() {
    let (app, _db) = common::test_app().await;
    let fake_id = uuid::Uuid::new_v4();

    let (status, _) = common::get(
        &app,
        &format!("/api/v1/fields/{fake_id}/availability?date=2025-06-01&tzOffset=0"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn availability_bad_date_is_400() {
    let (app, db) = common::test_app().await;
    let (_token, field_id) = setup_field(&app, &db, "av6").await;

    let (status, _) = common::get(
        &app,
        &format!("/api/v1/fields/{field_id}/availability?date=junk&tzOffset=0"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ─────────────────────────────────────────────────────────────────────────────
// End times
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn end_times_extend_until_next_booking() {
    let (app, db) = common::test_app().await;
    let (token, field_id) = setup_field(&app, &db, "et1").await;
    create_game(
        &app,
        &token,
        &field_id,
        "2025-06-01T12:00:00Z",
        "2025-06-01T13:00:00Z",
    )
    .await;

    let (status, body) = common::get(
        &app,
        &format!(
            "/api/v1/fields/{field_id}/availability/end-times?date=2025-06-01&tzOffset=0&start=10:00"
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    // Free run 10:00..12:00 yields end boundaries 10:30, 11:00, 11:30, 12:00.
    assert_eq!(end_times(&body), vec!["10:30", "11:00", "11:30", "12:00"]);
}

#[tokio::test]
async fn end_times_run_to_window_close() {
    let (app, db) = common::test_app().await;
    let (_token, field_id) = setup_field(&app, &db, "et2").await;

    let (status, body) = common::get(
        &app,
        &format!(
            "/api/v1/fields/{field_id}/availability/end-times?date=2025-06-01&tzOffset=0&start=23:00"
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(end_times(&body), vec!["23:30", "24:00"]);
}

#[tokio::test]
async fn end_times_for_booked_start_is_400() {
    let (app, db) = common::test_app().await;
    let (token, field_id) = setup_field(&app, &db, "et3").await;
    create_game(
        &app,
        &token,
        &field_id,
        "2025-06-01T10:00:00Z",
        "2025-06-01T11:00:00Z",
    )
    .await;

    let (status, _) = common::get(
        &app,
        &format!(
            "/api/v1/fields/{field_id}/availability/end-times?date=2025-06-01&tzOffset=0&start=10:00"
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn end_times_malformed_start_is_400() {
    let (app, db) = common::test_app().await;
    let (_token, field_id) = setup_field(&app, &db, "et4").await;

    let (status, _) = common::get(
        &app,
        &format!(
            "/api/v1/fields/{field_id}/availability/end-times?date=2025-06-01&tzOffset=0&start=10am"
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
