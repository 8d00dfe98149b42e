//! User record CRUD endpoints. All routes sit behind the auth gate.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use tracing::error;

use super::error::{ApiError, ResultExt};
use crate::db::{Database, NewUser, User, UserChanges};

#[derive(Clone)]
pub struct UsersState {
    pub db: Database,
}

pub fn router(state: UsersState) -> Router {
    Router::new()
        .route("/users/", get(list_users).put(create_user).patch(update_user))
        .route("/users/{user_id}", get(get_user).delete(delete_user))
        .with_state(state)
}

async fn list_users(State(state): State<UsersState>) -> Result<impl IntoResponse, ApiError> {
    let users = state.db.users().all().await.db_err("Failed to list users")?;
    Ok(Json(users))
}

async fn get_user(
    State(state): State<UsersState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .users()
        .get(user_id)
        .await
        .db_err("Failed to get user")?
        .ok_or_else(|| ApiError::bad_request("Unknown user"))?;

    Ok(Json(user))
}

#[derive(Deserialize)]
struct CreateUserRequest {
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    #[serde(default)]
    is_admin: bool,
}

async fn create_user(
    State(state): State<UsersState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let hash = hash_password(&req.password)?;

    let new_user = NewUser {
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        password: hash,
        is_admin: req.is_admin,
    };

    let id = state
        .db
        .users()
        .insert(&new_user)
        .await
        .db_err("Failed to create user")?;

    let user = User {
        id,
        first_name: new_user.first_name,
        last_name: new_user.last_name,
        email: new_user.email,
        password: new_user.password,
        is_admin: new_user.is_admin,
    };

    Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Deserialize)]
struct UpdateUserRequest {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    /// New password in the clear; empty or absent keeps the stored hash.
    #[serde(default)]
    password: String,
    #[serde(default)]
    is_admin: bool,
}

async fn update_user(
    State(state): State<UsersState>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let password = if req.password.is_empty() {
        None
    } else {
        Some(hash_password(&req.password)?)
    };

    let changes = UserChanges {
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        is_admin: req.is_admin,
        password,
    };

    state
        .db
        .users()
        .update(req.id, &changes)
        .await
        .db_err("Failed to update user")?;

    Ok(StatusCode::NO_CONTENT)
}

async fn delete_user(
    State(state): State<UsersState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .db
        .users()
        .delete(user_id)
        .await
        .db_err("Failed to delete user")?;

    Ok(StatusCode::NO_CONTENT)
}

fn hash_password(password: &str) -> Result<String, ApiError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| {
        error!(error = %e, "Failed to hash password");
        ApiError::internal("Failed to hash password")
    })
}
