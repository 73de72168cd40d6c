use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IsolationLevel, ModelTrait, PaginatorTrait, QueryFilter, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::status::ParticipantStatus;
use crate::entities::{field, game, game_participant, user};
use crate::error::AppError;
use crate::services::notifier;

/// Roster state machine for a single game.
///
/// States per (game, user) pair: PENDING, APPROVED, DECLINED, REJECTED; no
/// row means "not associated". Only APPROVED rows count against capacity.
/// All failures are synchronous caller errors; nothing is retried here, and
/// every operation either fully applies or raises before mutating.
pub struct RosterService;

impl RosterService {
    /// Self-initiated join.
    ///
    /// The desired status depends on the field: APPROVED on open fields,
    /// PENDING on managed fields (the join waits for confirmation).
    ///
    /// # Errors
    ///
    /// `NotFound` (game missing), `Conflict` (already participating),
    /// `BadRequest` (game full).
    pub async fn join(
        db: &DatabaseConnection,
        game_id: Uuid,
        user_id: Uuid,
    ) -> Result<game_participant::Model, AppError> {
        let game_model = Self::find_game(db, game_id).await?;

        let field_model = field::Entity::find_by_id(game_model.field_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Field not found.".to_string()))?;

        let desired = if field_model.is_managed {
            ParticipantStatus::Pending
        } else {
            ParticipantStatus::Approved
        };

        Self::insert_participant(db, &game_model, user_id, desired).await
    }

    /// Invite another user to a game.
    ///
    /// Delegates to the join path with the status determined by the inviter:
    /// the creator's invites are APPROVED immediately (bypassing the waiting
    /// list), anyone else's are PENDING until the invitee confirms.
    ///
    /// # Errors
    ///
    /// Inherits join's failures; additionally `NotFound` if the invitee does
    /// not resolve.
    pub async fn invite(
        db: &DatabaseConnection,
        game_id: Uuid,
        inviter_id: Uuid,
        invitee_id: Uuid,
    ) -> Result<game_participant::Model, AppError> {
        let game_model = Self::find_game(db, game_id).await?;

        user::Entity::find_by_id(invitee_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

        let desired = if game_model.creator_id == inviter_id {
            ParticipantStatus::Approved
        } else {
            ParticipantStatus::Pending
        };

        Self::insert_participant(db, &game_model, invitee_id, desired).await
    }

    /// Idempotent status upsert: creates the row if absent, overwrites its
    /// status if present. Any status may follow any other; capacity is only
    /// enforced on the join/invite path.
    ///
    /// # Errors
    ///
    /// `NotFound` if the game or user does not resolve.
    pub async fn set_status(
        db: &DatabaseConnection,
        game_id: Uuid,
        user_id: Uuid,
        new_status: ParticipantStatus,
    ) -> Result<game_participant::Model, AppError> {
        Self::find_game(db, game_id).await?;

        user::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

        let existing = Self::find_participant(db, game_id, user_id).await?;
        let now = Utc::now().fixed_offset();

        let updated = if let Some(row) = existing {
            let mut active: game_participant::ActiveModel = row.into();
            active.status = Set(new_status.as_str().to_string());
            active.updated_at = Set(now);
            active.update(db).await?
        } else {
            let row = game_participant::ActiveModel {
                id: Set(Uuid::new_v4()),
                game_id: Set(game_id),
                user_id: Set(user_id),
                status: Set(new_status.as_str().to_string()),
                created_at: Set(now),
                updated_at: Set(now),
            };
            row.insert(db).await?
        };

        notifier::participant_status_changed(game_id, user_id, new_status.as_str());
        Ok(updated)
    }

    /// Remove a user from a game's roster.
    ///
    /// The creator may not abandon a populated game: they either stay, or the
    /// game collapses when they are the last participant (the game row is
    /// deleted together with theirs).
    ///
    /// # Errors
    ///
    /// `NotFound` (game missing), `Conflict` (no participation row, or the
    /// creator leaving while others remain).
    pub async fn leave(
        db: &DatabaseConnection,
        game_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        let game_model = Self::find_game(db, game_id).await?;

        let row = Self::find_participant(db, game_id, user_id)
            .await?
            .ok_or_else(|| {
                AppError::Conflict("User is not participating in this game.".to_string())
            })?;

        if game_model.creator_id == user_id {
            let roster_size = game_participant::Entity::find()
                .filter(game_participant::Column::GameId.eq(game_id))
                .count(db)
                .await?;

            if roster_size > 1 {
                return Err(AppError::Conflict(
                    "The creator may not leave a game with other participants.".to_string(),
                ));
            }

            // Sole participant: the game collapses with the creator's row.
            let txn = db.begin().await?;
            row.delete(&txn).await?;
            game_model.delete(&txn).await?;
            txn.commit().await?;
            return Ok(());
        }

        row.delete(db).await?;
        Ok(())
    }

    /// Number of APPROVED participants, the only rows that consume capacity.
    ///
    /// # Errors
    ///
    /// Returns `Internal` on database failure.
    pub async fn approved_count<C: ConnectionTrait>(
        conn: &C,
        game_id: Uuid,
    ) -> Result<u64, AppError> {
        let count = game_participant::Entity::find()
            .filter(game_participant::Column::GameId.eq(game_id))
            .filter(
                game_participant::Column::Status.eq(ParticipantStatus::Approved.as_str()),
            )
            .count(conn)
            .await?;
        Ok(count)
    }

    /// Shared insert path for join and invite: duplicate check, capacity
    /// check, then the new row.
    ///
    /// All three statements run in one serializable transaction so that the
    /// capacity check and the insert observe the same snapshot. Without it,
    /// two concurrent joins could both see a free seat and both take it.
    async fn insert_participant(
        db: &DatabaseConnection,
        game_model: &game::Model,
        user_id: Uuid,
        status: ParticipantStatus,
    ) -> Result<game_participant::Model, AppError> {
        let txn = db
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await?;

        let existing = Self::find_participant(&txn, game_model.id, user_id).await?;
        if existing.is_some() {
            return Err(AppError::Conflict(
                "User is already participating in this game.".to_string(),
            ));
        }

        let approved = Self::approved_count(&txn, game_model.id).await?;
        if approved >= u64::try_from(game_model.max_participants).unwrap_or(0) {
            return Err(AppError::BadRequest("Game is full.".to_string()));
        }

        let now = Utc::now().fixed_offset();
        let row = game_participant::ActiveModel {
            id: Set(Uuid::new_v4()),
            game_id: Set(game_model.id),
            user_id: Set(user_id),
            status: Set(status.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let inserted = row.insert(&txn).await?;

        txn.commit().await?;

        notifier::participant_status_changed(game_model.id, user_id, status.as_str());
        Ok(inserted)
    }

    async fn find_game(db: &DatabaseConnection, game_id: Uuid) -> Result<game::Model, AppError> {
        game::Entity::find_by_id(game_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Game not found.".to_string()))
    }

    async fn find_participant<C: ConnectionTrait>(
        conn: &C,
        game_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<game_participant::Model>, AppError> {
        let row = game_participant::Entity::find()
            .filter(game_participant::Column::GameId.eq(game_id))
            .filter(game_participant::Column::UserId.eq(user_id))
            .one(conn)
            .await?;
        Ok(row)
    }
}
