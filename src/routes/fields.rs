use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::middleware::ManagerUser;
use crate::entities::field;
use crate::error::AppError;
use crate::services::availability::AvailabilityService;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the field route group: `/fields/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_fields).post(create_field))
        .route("/{id}", get(get_field))
        .route("/{id}/availability", get(get_availability))
        .route("/{id}/availability/end-times", get(get_end_times))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateFieldRequest {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    is_managed: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldResponse {
    id: Uuid,
    name: String,
    latitude: f64,
    longitude: f64,
    is_managed: bool,
    manager_id: Option<Uuid>,
    created_at: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AvailabilityQuery {
    date: String,
    #[serde(default)]
    tz_offset: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EndTimesQuery {
    date: String,
    #[serde(default)]
    tz_offset: i32,
    start: String,
}

#[derive(Serialize)]
struct SlotsResponse {
    slots: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EndTimesResponse {
    end_times: Vec<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn field_response(f: &field::Model) -> FieldResponse {
    FieldResponse {
        id: f.id,
        name: f.name.clone(),
        latitude: f.latitude,
        longitude: f.longitude,
        is_managed: f.is_managed,
        manager_id: f.manager_id,
        created_at: f.created_at.to_rfc3339(),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("date must be formatted as YYYY-MM-DD".to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `POST /api/v1/fields` — register a field (managers and admins only).
///
/// A managed field records the creating manager as its approver.
async fn create_field(
    State(state): State<AppState>,
    ManagerUser(manager): ManagerUser,
    Json(body): Json<CreateFieldRequest>,
) -> Result<impl IntoResponse, AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required.".to_string()));
    }
    if !(-90.0..=90.0).contains(&body.latitude) || !(-180.0..=180.0).contains(&body.longitude) {
        return Err(AppError::BadRequest(
            "latitude/longitude out of range.".to_string(),
        ));
    }

    let new_field = field::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(body.name.trim().to_string()),
        latitude: Set(body.latitude),
        longitude: Set(body.longitude),
        is_managed: Set(body.is_managed),
        manager_id: Set(body.is_managed.then_some(manager.id)),
        created_at: Set(Utc::now().fixed_offset()),
    };
    let field_model = new_field.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(field_response(&field_model))))
}

/// `GET /api/v1/fields`
async fn list_fields(State(state): State<AppState>) -> Result<Json<Vec<FieldResponse>>, AppError> {
    let fields = field::Entity::find()
        .order_by_asc(field::Column::Name)
        .all(&state.db)
        .await?;

    Ok(Json(fields.iter().map(field_response).collect()))
}

/// `GET /api/v1/fields/:id`
async fn get_field(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FieldResponse>, AppError> {
    let field_model = field::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Field not found.".to_string()))?;

    Ok(Json(field_response(&field_model)))
}

/// `GET /api/v1/fields/:id/availability?date=YYYY-MM-DD&tzOffset=H`
///
/// Free 30-minute start slots for the field on the given local date.
async fn get_availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let date = parse_date(&query.date)?;

    let slots = AvailabilityService::free_slots(
        &state.db,
        &state.config.booking,
        id,
        date,
        query.tz_offset,
    )
    .await?;

    Ok(Json(SlotsResponse { slots }))
}

/// `GET /api/v1/fields/:id/availability/end-times?date&tzOffset&start=HH:MM`
///
/// Valid end boundaries for a booking beginning at `start`, following the
/// contiguous run of free slots.
async fn get_end_times(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<EndTimesQuery>,
) -> Result<Json<EndTimesResponse>, AppError> {
    let date = parse_date(&query.date)?;

    let end_times = AvailabilityService::end_times(
        &state.db,
        &state.config.booking,
        id,
        date,
        query.tz_offset,
        &query.start,
    )
    .await?;

    Ok(Json(EndTimesResponse { end_times }))
}
