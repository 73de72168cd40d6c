use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::entities::status::{GameType, ParticipantStatus};
use crate::entities::{field, game, game_participant};
use crate::error::AppError;
use crate::services::booking::{BookingService, CreateGameParams, WeatherSnapshot};
use crate::services::roster::RosterService;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the game route group: `/games/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_games).post(create_game))
        .route("/{id}", get(get_game))
        .route("/{id}/join", post(join_game))
        .route("/{id}/invite", post(invite_to_game))
        .route("/{id}/leave", post(leave_game))
        .route(
            "/{id}/participants",
            get(list_participants),
        )
        .route(
            "/{id}/participants/{user_id}",
            axum::routing::patch(set_participant_status),
        )
        .route("/{id}/approve", post(approve_game))
        .route("/{id}/reject", post(reject_game))
}

// ─────────────────────────────────────────────────────────────────────────────
// Request / Response Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateGameRequest {
    game_type: String,
    field_id: Uuid,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    max_participants: i32,
    price: Option<f64>,
    weather: Option<WeatherSnapshot>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InviteRequest {
    user_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct SetStatusRequest {
    status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListGamesQuery {
    field_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GameResponse {
    id: Uuid,
    game_type: String,
    field_id: Uuid,
    creator_id: Uuid,
    start_date: String,
    end_date: String,
    max_participants: i32,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    weather: Option<WeatherResponse>,
    created_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WeatherResponse {
    temperature: f32,
    condition: String,
    icon: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GameDetailResponse {
    #[serde(flatten)]
    game: GameResponse,
    approved_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ParticipantResponse {
    id: Uuid,
    game_id: Uuid,
    user_id: Uuid,
    status: String,
    is_creator: bool,
    created_at: String,
    updated_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ParticipantsListResponse {
    participants: Vec<ParticipantResponse>,
    count: usize,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn game_response(g: &game::Model) -> GameResponse {
    let weather = match (&g.weather_temperature, &g.weather_condition, &g.weather_icon) {
        (Some(temperature), Some(condition), Some(icon)) => Some(WeatherResponse {
            temperature: *temperature,
            condition: condition.clone(),
            icon: icon.clone(),
        }),
        _ => None,
    };

    GameResponse {
        id: g.id,
        game_type: g.game_type.clone(),
        field_id: g.field_id,
        creator_id: g.creator_id,
        start_date: g.starts_at.to_rfc3339(),
        end_date: g.ends_at.to_rfc3339(),
        max_participants: g.max_participants,
        status: g.status.clone(),
        price: g.price,
        weather,
        created_at: g.created_at.to_rfc3339(),
    }
}

fn participant_response(p: &game_participant::Model, creator_id: Uuid) -> ParticipantResponse {
    ParticipantResponse {
        id: p.id,
        game_id: p.game_id,
        user_id: p.user_id,
        status: p.status.clone(),
        is_creator: p.user_id == creator_id,
        created_at: p.created_at.to_rfc3339(),
        updated_at: p.updated_at.to_rfc3339(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `POST /api/v1/games` — book a game; the creator joins as APPROVED.
async fn create_game(
    State(state): State<AppState>,
    AuthUser(user_model): AuthUser,
    Json(req): Json<CreateGameRequest>,
) -> Result<impl IntoResponse, AppError> {
    let game_type = GameType::from_str(&req.game_type)
        .ok_or_else(|| AppError::BadRequest("Unknown game type.".to_string()))?;

    let (game_model, _creator_row) = BookingService::create_game(
        &state.db,
        CreateGameParams {
            game_type,
            field_id: req.field_id,
            creator_id: user_model.id,
            starts_at: req.start_date,
            ends_at: req.end_date,
            max_participants: req.max_participants,
            price: req.price,
            weather: req.weather,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(game_response(&game_model))))
}

/// `GET /api/v1/games?fieldId=...`
async fn list_games(
    State(state): State<AppState>,
    Query(query): Query<ListGamesQuery>,
) -> Result<Json<Vec<GameResponse>>, AppError> {
    let mut select = game::Entity::find().order_by_asc(game::Column::StartsAt);
    if let Some(field_id) = query.field_id {
        select = select.filter(game::Column::FieldId.eq(field_id));
    }

    let games = select.all(&state.db).await?;
    Ok(Json(games.iter().map(game_response).collect()))
}

/// `GET /api/v1/games/:id`
async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GameDetailResponse>, AppError> {
    let game_model = game::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Game not found.".to_string()))?;

    let approved_count = RosterService::approved_count(&state.db, id).await?;

    Ok(Json(GameDetailResponse {
        game: game_response(&game_model),
        approved_count,
    }))
}

/// `GET /api/v1/games/:id/participants`
async fn list_participants(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ParticipantsListResponse>, AppError> {
    let game_model = game::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Game not found.".to_string()))?;

    let rows = game_participant::Entity::find()
        .filter(game_participant::Column::GameId.eq(id))
        .order_by_asc(game_participant::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let participants: Vec<ParticipantResponse> = rows
        .iter()
        .map(|p| participant_response(p, game_model.creator_id))
        .collect();
    let count = participants.len();

    Ok(Json(ParticipantsListResponse {
        participants,
        count,
    }))
}

/// `POST /api/v1/games/:id/join` — self-initiated join.
async fn join_game(
    State(state): State<AppState>,
    AuthUser(user_model): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let row = RosterService::join(&state.db, id, user_model.id).await?;

    let game_model = game::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Game not found.".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(participant_response(&row, game_model.creator_id)),
    ))
}

/// `POST /api/v1/games/:id/invite` — invite another user.
///
/// The creator's invites land APPROVED; anyone else's land PENDING.
async fn invite_to_game(
    State(state): State<AppState>,
    AuthUser(user_model): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<InviteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let row = RosterService::invite(&state.db, id, user_model.id, req.user_id).await?;

    let game_model = game::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Game not found.".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(participant_response(&row, game_model.creator_id)),
    ))
}

/// `PATCH /api/v1/games/:id/participants/:user_id` — status upsert.
///
/// Permitted to the game creator, the field manager, and the target user
/// (accepting or declining their own invitation).
async fn set_participant_status(
    State(state): State<AppState>,
    AuthUser(acting): AuthUser,
    Path((id, target_user_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<SetStatusRequest>,
) -> Result<Json<ParticipantResponse>, AppError> {
    let new_status = ParticipantStatus::from_str(&req.status)
        .ok_or_else(|| AppError::BadRequest("Unknown participant status.".to_string()))?;

    let game_model = game::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Game not found.".to_string()))?;

    let field_model = field::Entity::find_by_id(game_model.field_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Field not found.".to_string()))?;

    let is_creator = game_model.creator_id == acting.id;
    let is_manager = field_model.manager_id == Some(acting.id);
    let is_target = target_user_id == acting.id;
    if !is_creator && !is_manager && !is_target {
        return Err(AppError::Forbidden(
            "Not allowed to change this participant's status.".to_string(),
        ));
    }

    let row = RosterService::set_status(&state.db, id, target_user_id, new_status).await?;
    Ok(Json(participant_response(&row, game_model.creator_id)))
}

/// `POST /api/v1/games/:id/leave`
async fn leave_game(
    State(state): State<AppState>,
    AuthUser(user_model): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    RosterService::leave(&state.db, id, user_model.id).await?;

    Ok(Json(MessageResponse {
        message: "You have left the game.".to_string(),
    }))
}

/// `POST /api/v1/games/:id/approve` — field manager approves the booking.
async fn approve_game(
    State(state): State<AppState>,
    AuthUser(user_model): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<GameResponse>, AppError> {
    let updated = BookingService::approve(&state.db, id, &user_model).await?;
    Ok(Json(game_response(&updated)))
}

/// `POST /api/v1/games/:id/reject` — field manager rejects the booking,
/// removing the game and freeing its slot.
async fn reject_game(
    State(state): State<AppState>,
    AuthUser(user_model): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    BookingService::reject(&state.db, id, &user_model).await?;

    Ok(Json(MessageResponse {
        message: "Booking rejected.".to_string(),
    }))
}
