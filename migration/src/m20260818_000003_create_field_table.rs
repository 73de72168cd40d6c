use sea_orm_migration::prelude::*;

/// Creates the `field` table for sports fields.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Field {
    Table,
    Id,
    Name,
    Latitude,
    Longitude,
    IsManaged,
    ManagerId,
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
                    .table(Field::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Field::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Field::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Field::Latitude).double().not_null())
                    .col(ColumnDef::new(Field::Longitude).double().not_null())
                    .col(
                        ColumnDef::new(Field::IsManaged)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Field::ManagerId).uuid().null())
                    .col(
                        ColumnDef::new(Field::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_field_manager_id")
                            .from(Field::Table, Field::ManagerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Field::Table).to_owned())
            .await
    }
}
