use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    TransactionTrait,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::entities::status::{GameStatus, GameType, ParticipantStatus};
use crate::entities::{field, game, game_participant, user};
use crate::error::AppError;
use crate::services::notifier;

/// Weather at the field, captured once at creation time and stored verbatim.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub temperature: f32,
    pub condition: String,
    pub icon: String,
}

/// Inputs for creating a game booking.
#[derive(Debug)]
pub struct CreateGameParams {
    pub game_type: GameType,
    pub field_id: Uuid,
    pub creator_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub max_participants: i32,
    pub price: Option<f64>,
    pub weather: Option<WeatherSnapshot>,
}

pub struct BookingService;

impl BookingService {
    /// Create a game and auto-join its creator as an APPROVED participant.
    ///
    /// Both rows are inserted in one transaction: there is no window where
    /// the game exists without its creator on the roster. The game starts
    /// APPROVED unless the field is managed, in which case it stays PENDING
    /// until the field's manager acts.
    ///
    /// # Errors
    ///
    /// `NotFound` if the field does not resolve, `BadRequest` for structural
    /// violations (end before start, non-positive capacity), `Conflict` if
    /// the requested interval overlaps an existing booking on the field.
    pub async fn create_game(
        db: &DatabaseConnection,
        params: CreateGameParams,
    ) -> Result<(game::Model, game_participant::Model), AppError> {
        if params.ends_at <= params.starts_at {
            return Err(AppError::BadRequest(
                "endDate must be after startDate.".to_string(),
            ));
        }
        if params.max_participants <= 0 {
            return Err(AppError::BadRequest(
                "maxParticipants must be greater than zero.".to_string(),
            ));
        }

        let field_model = field::Entity::find_by_id(params.field_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Field not found.".to_string()))?;

        // Double-booking guard: half-open interval overlap on the same field.
        let overlapping = game::Entity::find()
            .filter(game::Column::FieldId.eq(params.field_id))
            .filter(game::Column::StartsAt.lt(params.ends_at))
            .filter(game::Column::EndsAt.gt(params.starts_at))
            .one(db)
            .await?;
        if overlapping.is_some() {
            return Err(AppError::Conflict(
                "The field is already booked for this time.".to_string(),
            ));
        }

        let status = if field_model.is_managed {
            GameStatus::Pending
        } else {
            GameStatus::Approved
        };

        let now = Utc::now().fixed_offset();
        let game_id = Uuid::new_v4();

        let txn = db.begin().await?;

        let new_game = game::ActiveModel {
            id: Set(game_id),
            game_type: Set(params.game_type.as_str().to_string()),
            field_id: Set(params.field_id),
            creator_id: Set(params.creator_id),
            starts_at: Set(params.starts_at.fixed_offset()),
            ends_at: Set(params.ends_at.fixed_offset()),
            max_participants: Set(params.max_participants),
            status: Set(status.as_str().to_string()),
            price: Set(params.price),
            weather_temperature: Set(params.weather.as_ref().map(|w| w.temperature)),
            weather_condition: Set(params.weather.as_ref().map(|w| w.condition.clone())),
            weather_icon: Set(params.weather.as_ref().map(|w| w.icon.clone())),
            created_at: Set(now),
        };
        let game_model = new_game.insert(&txn).await?;

        let creator_row = game_participant::ActiveModel {
            id: Set(Uuid::new_v4()),
            game_id: Set(game_id),
            user_id: Set(params.creator_id),
            status: Set(ParticipantStatus::Approved.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let participant_model = creator_row.insert(&txn).await?;

        txn.commit().await?;

        Ok((game_model, participant_model))
    }

    /// Approve a pending booking. Restricted to the field's manager.
    ///
    /// # Errors
    ///
    /// `NotFound` if the game does not exist, `Forbidden` if the caller does
    /// not manage the field.
    pub async fn approve(
        db: &DatabaseConnection,
        game_id: Uuid,
        acting: &user::Model,
    ) -> Result<game::Model, AppError> {
        let game_model = Self::managed_game(db, game_id, acting).await?;

        let mut active: game::ActiveModel = game_model.into();
        active.status = Set(GameStatus::Approved.as_str().to_string());
        let updated = active.update(db).await?;

        notifier::booking_decided(game_id, true);
        Ok(updated)
    }

    /// Reject a booking: the game and its roster are removed, freeing the
    /// slot. Restricted to the field's manager.
    ///
    /// # Errors
    ///
    /// `NotFound` if the game does not exist, `Forbidden` if the caller does
    /// not manage the field.
    pub async fn reject(
        db: &DatabaseConnection,
        game_id: Uuid,
        acting: &user::Model,
    ) -> Result<(), AppError> {
        let game_model = Self::managed_game(db, game_id, acting).await?;

        let txn = db.begin().await?;
        game_participant::Entity::delete_many()
            .filter(game_participant::Column::GameId.eq(game_id))
            .exec(&txn)
            .await?;
        game_model.delete(&txn).await?;
        txn.commit().await?;

        notifier::booking_decided(game_id, false);
        Ok(())
    }

    /// Resolve a game and verify the acting user manages its field.
    async fn managed_game(
        db: &DatabaseConnection,
        game_id: Uuid,
        acting: &user::Model,
    ) -> Result<game::Model, AppError> {
        let game_model = game::Entity::find_by_id(game_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Game not found.".to_string()))?;

        let field_model = field::Entity::find_by_id(game_model.field_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Field not found.".to_string()))?;

        if field_model.manager_id != Some(acting.id) {
            return Err(AppError::Forbidden(
                "Only the field manager may act on this booking.".to_string(),
            ));
        }

        Ok(game_model)
    }
}
