use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{jwt, password};
use crate::entities::{refresh_token, user};
use crate::error::AppError;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the auth route group: `/auth/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup/email", post(signup_email))
        .route("/signin/email", post(signin_email))
        .route("/refresh", post(refresh_token_handler))
        .route("/signout", post(signout))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignupEmailRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct SigninEmailRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub display_name: Option<String>,
    pub role: String,
    pub created_at: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequestBody {
    pub refresh_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub token: String,
    pub refresh_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignoutRequestBody {
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn user_response(u: &user::Model) -> UserResponse {
    UserResponse {
        id: u.id,
        email: u.email.clone(),
        username: u.username.clone(),
        display_name: u.display_name.clone(),
        role: u.role.clone(),
        created_at: u.created_at.to_rfc3339(),
    }
}

/// Store a new refresh token record in the database.
async fn store_refresh_token(
    db: &sea_orm::DatabaseConnection,
    user_id: Uuid,
    token_pair: &jwt::TokenPair,
) -> Result<(), AppError> {
    let now = Utc::now().fixed_offset();

    let record = refresh_token::ActiveModel {
        id: Set(token_pair.refresh_jti),
        user_id: Set(user_id),
        expires_at: Set(token_pair.refresh_expires_at.fixed_offset()),
        revoked_at: Set(None),
        created_at: Set(now),
    };

    record
        .insert(db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `POST /api/v1/auth/signup/email`
async fn signup_email(
    State(state): State<AppState>,
    Json(body): Json<SignupEmailRequest>,
) -> Result<Response, AppError> {
    let email = body.email.trim().to_lowercase();
    let username = body.username.trim().to_string();

    password::validate_email(&email).map_err(AppError::BadRequest)?;
    password::validate_username(&username).map_err(AppError::BadRequest)?;
    password::validate_password(&body.password).map_err(AppError::BadRequest)?;

    let email_taken = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await?;
    if email_taken.is_some() {
        return Err(AppError::Conflict("Email is already registered.".to_string()));
    }

    let username_taken = user::Entity::find()
        .filter(user::Column::Username.eq(&username))
        .one(&state.db)
        .await?;
    if username_taken.is_some() {
        return Err(AppError::Conflict("Username is already taken.".to_string()));
    }

    let password_hash = password::hash_password(&body.password)?;
    let now = Utc::now().fixed_offset();
    let user_id = Uuid::new_v4();

    let new_user = user::ActiveModel {
        id: Set(user_id),
        email: Set(email),
        username: Set(username),
        password_hash: Set(password_hash),
        display_name: Set(None),
        role: Set("user".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let user_model = new_user.insert(&state.db).await?;

    let token_pair = jwt::generate_token_pair(user_model.id, &user_model.role, &state.config)?;
    store_refresh_token(&state.db, user_model.id, &token_pair).await?;

    tracing::info!(user_id = %user_model.id, "user signed up");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user_response(&user_model),
            token: token_pair.access_token,
            refresh_token: token_pair.refresh_token,
        }),
    )
        .into_response())
}

/// `POST /api/v1/auth/signin/email`
async fn signin_email(
    State(state): State<AppState>,
    Json(body): Json<SigninEmailRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = body.email.trim().to_lowercase();

    let user_model = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password.".to_string()))?;

    let valid = password::verify_password(&body.password, &user_model.password_hash)?;
    if !valid {
        return Err(AppError::Unauthorized(
            "Invalid email or password.".to_string(),
        ));
    }

    let token_pair = jwt::generate_token_pair(user_model.id, &user_model.role, &state.config)?;
    store_refresh_token(&state.db, user_model.id, &token_pair).await?;

    Ok(Json(AuthResponse {
        user: user_response(&user_model),
        token: token_pair.access_token,
        refresh_token: token_pair.refresh_token,
    }))
}

/// `POST /api/v1/auth/refresh` — rotate a refresh token into a new pair.
async fn refresh_token_handler(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequestBody>,
) -> Result<Json<RefreshResponse>, AppError> {
    let claims = jwt::validate_refresh_token(&body.refresh_token, &state.config.jwt_secret)
        .map_err(|_| AppError::Unauthorized("Invalid or expired refresh token.".to_string()))?;

    let jti: Uuid = claims
        .jti
        .parse()
        .map_err(|_| AppError::Unauthorized("Invalid refresh token.".to_string()))?;
    let user_id: Uuid = claims
        .sub
        .parse()
        .map_err(|_| AppError::Unauthorized("Invalid refresh token.".to_string()))?;

    let record = refresh_token::Entity::find_by_id(jti)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Refresh token not recognized.".to_string()))?;

    if record.revoked_at.is_some() {
        return Err(AppError::Unauthorized(
            "Refresh token has been revoked.".to_string(),
        ));
    }

    let user_model = user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found.".to_string()))?;

    // Rotation: revoke the presented token before issuing the replacement.
    let now = Utc::now().fixed_offset();
    let mut active_record: refresh_token::ActiveModel = record.into();
    active_record.revoked_at = Set(Some(now));
    active_record.update(&state.db).await?;

    let token_pair = jwt::generate_token_pair(user_model.id, &user_model.role, &state.config)?;
    store_refresh_token(&state.db, user_model.id, &token_pair).await?;

    Ok(Json(RefreshResponse {
        token: token_pair.access_token,
        refresh_token: token_pair.refresh_token,
    }))
}

/// `POST /api/v1/auth/signout` — revoke the presented refresh token.
async fn signout(
    State(state): State<AppState>,
    Json(body): Json<SignoutRequestBody>,
) -> Result<Json<MessageResponse>, AppError> {
    let claims = jwt::validate_refresh_token(&body.refresh_token, &state.config.jwt_secret)
        .map_err(|_| AppError::Unauthorized("Invalid refresh token.".to_string()))?;

    let jti: Uuid = claims
        .jti
        .parse()
        .map_err(|_| AppError::Unauthorized("Invalid refresh token.".to_string()))?;

    if let Some(record) = refresh_token::Entity::find_by_id(jti).one(&state.db).await? {
        let now = Utc::now().fixed_offset();
        let mut active_record: refresh_token::ActiveModel = record.into();
        active_record.revoked_at = Set(Some(now));
        active_record.update(&state.db).await?;
    }

    Ok(Json(MessageResponse {
        message: "Signed out.".to_string(),
    }))
}
