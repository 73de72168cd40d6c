mod auth;
mod fields;
mod friends;
mod games;
mod health;
mod users;

use axum::Router;

use crate::state::AppState;

/// Build the complete application router.
///
/// Structure:
/// - `GET /health` — lightweight health check (used by the deploy platform)
/// - `/api/v1/auth/...` — signup, signin, token refresh, signout
/// - `/api/v1/users/...` — profiles
/// - `/api/v1/fields/...` — fields and slot availability
/// - `/api/v1/games/...` — bookings and rosters
/// - `/api/v1/friends/...` — friend relations
pub fn router() -> Router<AppState> {
    let api_v1 = Router::new()
        .merge(health::api_router())
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/fields", fields::router())
        .nest("/games", games::router())
        .nest("/friends", friends::router());

    Router::new()
        .merge(health::root_router())
        .nest("/api/v1", api_v1)
}
