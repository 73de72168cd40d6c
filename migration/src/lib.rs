pub use sea_orm_migration::prelude::*;

mod m20260818_000001_create_user_table;
mod m20260818_000002_create_refresh_token_table;
mod m20260818_000003_create_field_table;
mod m20260819_000001_create_game_table;
mod m20260819_000002_create_game_participant_table;
mod m20260819_000003_create_friend_relation_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260818_000001_create_user_table::Migration),
            Box::new(m20260818_000002_create_refresh_token_table::Migration),
            Box::new(m20260818_000003_create_field_table::Migration),
            Box::new(m20260819_000001_create_game_table::Migration),
            Box::new(m20260819_000002_create_game_participant_table::Migration),
            Box::new(m20260819_000003_create_friend_relation_table::Migration),
        ]
    }
}
