use sea_orm_migration::prelude::*;

/// Creates the `game_participant` table.
///
/// The unique (game_id, user_id) index is the persistence-layer guarantee
/// that at most one roster row exists per pair, even under concurrent joins.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum GameParticipant {
    Table,
    Id,
    GameId,
    UserId,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Game {
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
                    .table(GameParticipant::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameParticipant::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GameParticipant::GameId).uuid().not_null())
                    .col(ColumnDef::new(GameParticipant::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(GameParticipant::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(GameParticipant::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameParticipant::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_participant_game_id")
                            .from(GameParticipant::Table, GameParticipant::GameId)
                            .to(Game::Table, Game::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_participant_user_id")
                            .from(GameParticipant::Table, GameParticipant::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_game_participant_game_user")
                    .table(GameParticipant::Table)
                    .col(GameParticipant::GameId)
                    .col(GameParticipant::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GameParticipant::Table).to_owned())
            .await
    }
}
