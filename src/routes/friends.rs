use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::entities::status::FriendStatus;
use crate::entities::{friend_relation, user};
use crate::error::AppError;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the friends route group: `/friends/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_friends))
        .route("/requests", get(list_requests).post(send_request))
        .route("/requests/{id}/accept", post(accept_request))
        .route("/requests/{id}/reject", post(reject_request))
        .route("/{user_id}", delete(remove_friend))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendRequestBody {
    user_id: Uuid,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FriendResponse {
    relation_id: Uuid,
    user: FriendUserInfo,
    status: String,
    since: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FriendUserInfo {
    id: Uuid,
    username: String,
    display_name: Option<String>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Find the relation covering the unordered (a, b) pair, if any.
async fn find_pair(
    db: &DatabaseConnection,
    a: Uuid,
    b: Uuid,
) -> Result<Option<friend_relation::Model>, AppError> {
    let relation = friend_relation::Entity::find()
        .filter(
            Condition::any()
                .add(
                    Condition::all()
                        .add(friend_relation::Column::RequesterId.eq(a))
                        .add(friend_relation::Column::RecipientId.eq(b)),
                )
                .add(
                    Condition::all()
                        .add(friend_relation::Column::RequesterId.eq(b))
                        .add(friend_relation::Column::RecipientId.eq(a)),
                ),
        )
        .one(db)
        .await?;
    Ok(relation)
}

/// Resolve the "other side" users of a batch of relations in one query.
async fn friend_responses(
    db: &DatabaseConnection,
    me: Uuid,
    relations: Vec<friend_relation::Model>,
) -> Result<Vec<FriendResponse>, AppError> {
    let other_ids: Vec<Uuid> = relations
        .iter()
        .map(|r| {
            if r.requester_id == me {
                r.recipient_id
            } else {
                r.requester_id
            }
        })
        .collect();

    let users = user::Entity::find()
        .filter(user::Column::Id.is_in(other_ids))
        .all(db)
        .await?;

    Ok(relations
        .into_iter()
        .filter_map(|r| {
            let other_id = if r.requester_id == me {
                r.recipient_id
            } else {
                r.requester_id
            };
            users.iter().find(|u| u.id == other_id).map(|u| FriendResponse {
                relation_id: r.id,
                user: FriendUserInfo {
                    id: u.id,
                    username: u.username.clone(),
                    display_name: u.display_name.clone(),
                },
                status: r.status.clone(),
                since: r.created_at.to_rfc3339(),
            })
        })
        .collect())
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `POST /api/v1/friends/requests` — send a friend request.
async fn send_request(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Json(body): Json<SendRequestBody>,
) -> Result<impl IntoResponse, AppError> {
    if body.user_id == me.id {
        return Err(AppError::BadRequest(
            "Cannot send a friend request to yourself.".to_string(),
        ));
    }

    let recipient = user::Entity::find_by_id(body.user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

    // Uniqueness over the unordered pair.
    if find_pair(&state.db, me.id, recipient.id).await?.is_some() {
        return Err(AppError::Conflict(
            "A friend relation already exists with this user.".to_string(),
        ));
    }

    let relation = friend_relation::ActiveModel {
        id: Set(Uuid::new_v4()),
        requester_id: Set(me.id),
        recipient_id: Set(recipient.id),
        status: Set(FriendStatus::Pending.as_str().to_string()),
        created_at: Set(Utc::now().fixed_offset()),
    };
    let relation = relation.insert(&state.db).await?;

    let responses = friend_responses(&state.db, me.id, vec![relation]).await?;
    let response = responses
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Relation without counterpart user")))?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /api/v1/friends` — approved friends of the acting user.
async fn list_friends(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
) -> Result<Json<Vec<FriendResponse>>, AppError> {
    let relations = friend_relation::Entity::find()
        .filter(
            Condition::any()
                .add(friend_relation::Column::RequesterId.eq(me.id))
                .add(friend_relation::Column::RecipientId.eq(me.id)),
        )
        .filter(friend_relation::Column::Status.eq(FriendStatus::Approved.as_str()))
        .all(&state.db)
        .await?;

    Ok(Json(friend_responses(&state.db, me.id, relations).await?))
}

/// `GET /api/v1/friends/requests` — pending requests addressed to the acting user.
async fn list_requests(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
) -> Result<Json<Vec<FriendResponse>>, AppError> {
    let relations = friend_relation::Entity::find()
        .filter(friend_relation::Column::RecipientId.eq(me.id))
        .filter(friend_relation::Column::Status.eq(FriendStatus::Pending.as_str()))
        .all(&state.db)
        .await?;

    Ok(Json(friend_responses(&state.db, me.id, relations).await?))
}

/// `POST /api/v1/friends/requests/:id/accept` — recipient approves.
async fn accept_request(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let relation = friend_relation::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Friend request not found.".to_string()))?;

    if relation.recipient_id != me.id {
        return Err(AppError::Forbidden(
            "Only the recipient may accept a friend request.".to_string(),
        ));
    }
    if relation.status != FriendStatus::Pending.as_str() {
        return Err(AppError::Conflict("Request is not pending.".to_string()));
    }

    let mut active: friend_relation::ActiveModel = relation.into();
    active.status = Set(FriendStatus::Approved.as_str().to_string());
    active.update(&state.db).await?;

    Ok(Json(MessageResponse {
        message: "Friend request accepted.".to_string(),
    }))
}

/// `POST /api/v1/friends/requests/:id/reject` — recipient rejects.
///
/// Rejection deletes the row, so the pair may re-request later; no rejected
/// history is kept.
async fn reject_request(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let relation = friend_relation::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Friend request not found.".to_string()))?;

    if relation.recipient_id != me.id {
        return Err(AppError::Forbidden(
            "Only the recipient may reject a friend request.".to_string(),
        ));
    }

    relation.delete(&state.db).await?;

    Ok(Json(MessageResponse {
        message: "Friend request rejected.".to_string(),
    }))
}

/// `DELETE /api/v1/friends/:user_id` — remove the relation with a user.
async fn remove_friend(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let relation = find_pair(&state.db, me.id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No friend relation with this user.".to_string()))?;

    relation.delete(&state.db).await?;

    Ok(Json(MessageResponse {
        message: "Friend removed.".to_string(),
    }))
}
