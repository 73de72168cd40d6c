use sea_orm_migration::prelude::*;

/// Creates the `game` table for scheduled bookings.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Game {
    Table,
    Id,
    GameType,
    FieldId,
    CreatorId,
    StartsAt,
    EndsAt,
    MaxParticipants,
    Status,
    Price,
    WeatherTemperature,
    WeatherCondition,
    WeatherIcon,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Field {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Game::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Game::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Game::GameType).string_len(20).not_null())
                    .col(ColumnDef::new(Game::FieldId).uuid().not_null())
                    .col(ColumnDef::new(Game::CreatorId).uuid().not_null())
                    .col(
                        ColumnDef::new(Game::StartsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Game::EndsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Game::MaxParticipants).integer().not_null())
                    .col(
                        ColumnDef::new(Game::Status)
                            .string_len(20)
                            .not_null()
                            .default("approved"),
                    )
                    .col(ColumnDef::new(Game::Price).double().null())
                    .col(ColumnDef::new(Game::WeatherTemperature).float().null())
                    .col(ColumnDef::new(Game::WeatherCondition).string_len(100).null())
                    .col(ColumnDef::new(Game::WeatherIcon).string_len(100).null())
                    .col(
                        ColumnDef::new(Game::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_field_id")
                            .from(Game::Table, Game::FieldId)
                            .to(Field::Table, Field::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_creator_id")
                            .from(Game::Table, Game::CreatorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Availability scans filter by field and time window.
        manager
            .create_index(
                Index::create()
                    .name("idx_game_field_starts_at")
                    .table(Game::Table)
                    .col(Game::FieldId)
                    .col(Game::StartsAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Game::Table).to_owned())
            .await
    }
}
