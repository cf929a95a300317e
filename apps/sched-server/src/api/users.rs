//! User API endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use entities::{User, UserPatch};
use schedule_store::ScheduleStore;

use super::decode;
use crate::error::ServerResult;
use crate::state::AppState;

/// Creates a user.
pub async fn create_user<S: ScheduleStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<User>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<User>)> {
    let user = state.coordinator.create_user(decode(payload)?).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Lists users.
pub async fn list_users<S: ScheduleStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<Vec<User>>> {
    Ok(Json(state.coordinator.list_users().await?))
}

/// Gets a user by username.
pub async fn get_user<S: ScheduleStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(username): Path<String>,
) -> ServerResult<Json<User>> {
    Ok(Json(state.coordinator.get_user(&username).await?))
}

/// Updates a user.
pub async fn update_user<S: ScheduleStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(username): Path<String>,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> ServerResult<Json<User>> {
    let patch = decode(payload)?;
    Ok(Json(state.coordinator.update_user(&username, patch).await?))
}

/// Deletes a user.
pub async fn delete_user<S: ScheduleStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(username): Path<String>,
) -> ServerResult<StatusCode> {
    state.coordinator.delete_user(&username).await?;
    Ok(StatusCode::NO_CONTENT)
}
