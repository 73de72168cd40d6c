use sea_orm_migration::prelude::*;

/// Creates the `friend_relation` table.
///
/// Uniqueness over the unordered user pair is completed at the application
/// layer, which checks both orders before inserting; the index below covers
/// the ordered pair.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum FriendRelation {
    Table,
    Id,
    RequesterId,
    RecipientId,
    Status,
    CreatedAt,
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
                    .table(FriendRelation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FriendRelation::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FriendRelation::RequesterId).uuid().not_null())
                    .col(ColumnDef::new(FriendRelation::RecipientId).uuid().not_null())
                    .col(
                        ColumnDef::new(FriendRelation::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(FriendRelation::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_friend_relation_requester_id")
                            .from(FriendRelation::Table, FriendRelation::RequesterId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_friend_relation_recipient_id")
                            .from(FriendRelation::Table, FriendRelation::RecipientId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_friend_relation_pair")
                    .table(FriendRelation::Table)
                    .col(FriendRelation::RequesterId)
                    .col(FriendRelation::RecipientId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FriendRelation::Table).to_owned())
            .await
    }
}
