use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::entities::user;
use crate::error::AppError;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the user route group: `/users/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me).patch(update_me))
        .route("/{username}", get(get_public_profile))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MeResponse {
    id: Uuid,
    email: String,
    username: String,
    display_name: Option<String>,
    role: String,
    created_at: String,
    updated_at: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateMeRequest {
    display_name: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PublicProfileResponse {
    id: Uuid,
    username: String,
    display_name: Option<String>,
    created_at: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

fn me_response(u: &user::Model) -> MeResponse {
    MeResponse {
        id: u.id,
        email: u.email.clone(),
        username: u.username.clone(),
        display_name: u.display_name.clone(),
        role: u.role.clone(),
        created_at: u.created_at.to_rfc3339(),
        updated_at: u.updated_at.to_rfc3339(),
    }
}

/// `GET /api/v1/users/me`
async fn get_me(AuthUser(user_model): AuthUser) -> Json<MeResponse> {
    Json(me_response(&user_model))
}

/// `PATCH /api/v1/users/me`
async fn update_me(
    State(state): State<AppState>,
    AuthUser(user_model): AuthUser,
    Json(body): Json<UpdateMeRequest>,
) -> Result<Json<MeResponse>, AppError> {
    let mut active: user::ActiveModel = user_model.into();
    if let Some(display_name) = body.display_name {
        let trimmed = display_name.trim();
        if trimmed.is_empty() {
            active.display_name = Set(None);
        } else {
            active.display_name = Set(Some(trimmed.to_string()));
        }
    }
    active.updated_at = Set(Utc::now().fixed_offset());

    let updated = active.update(&state.db).await?;
    Ok(Json(me_response(&updated)))
}

/// `GET /api/v1/users/:username` — public profile.
async fn get_public_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<PublicProfileResponse>, AppError> {
    let user_model = user::Entity::find()
        .filter(user::Column::Username.eq(&username))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

    Ok(Json(PublicProfileResponse {
        id: user_model.id,
        username: user_model.username,
        display_name: user_model.display_name,
        created_at: user_model.created_at.to_rfc3339(),
    }))
}
