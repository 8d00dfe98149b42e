mod error;
mod sessions;
mod users;

use axum::{Router, middleware};
use std::sync::Arc;

use crate::auth::require_auth;
use crate::db::Database;
use crate::jwt::JwtConfig;

pub use sessions::REFRESH_RENEWAL_WINDOW_SECS;

/// Create the API router.
pub fn create_api_router(db: Database, jwt: Arc<JwtConfig>) -> Router {
    let sessions_state = sessions::SessionsState {
        db: db.clone(),
        jwt: jwt.clone(),
    };

    let users_state = users::UsersState { db };

    Router::new()
        .merge(sessions::router(sessions_state.clone()))
        .nest("/web", sessions::web_router(sessions_state))
        .merge(
            users::router(users_state).layer(middleware::from_fn_with_state(jwt, require_auth)),
        )
}
