//! SeaORM entities for the Pickup data model.

pub mod field;
pub mod friend_relation;
pub mod game;
pub mod game_participant;
pub mod refresh_token;
pub mod status;
pub mod user;
