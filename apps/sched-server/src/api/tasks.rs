//! Task API endpoints.
//!
//! Task payloads carry their times as strings. They are read as wall-clock
//! values in the server's configured zone and answered as UTC instants.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use entities::{Task, TaskPatchRequest, TaskRequest};
use schedule_store::ScheduleStore;

use super::{decode, parse_id};
use crate::error::ServerResult;
use crate::state::AppState;

/// Creates a task.
pub async fn create_task<S: ScheduleStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<TaskRequest>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<Task>)> {
    let task = state.coordinator.create_task(decode(payload)?).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Lists tasks.
pub async fn list_tasks<S: ScheduleStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<Vec<Task>>> {
    Ok(Json(state.coordinator.list_tasks().await?))
}

/// Gets a task by ID.
pub async fn get_task<S: ScheduleStore>(
    State(state): State<Arc<AppState<S>>>,
    id: Result<Path<i64>, PathRejection>,
) -> ServerResult<Json<Task>> {
    let id = parse_id(id)?;
    Ok(Json(state.coordinator.get_task(id).await?))
}

/// Updates a task's times and/or event.
pub async fn update_task<S: ScheduleStore>(
    State(state): State<Arc<AppState<S>>>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TaskPatchRequest>, JsonRejection>,
) -> ServerResult<Json<Task>> {
    let id = parse_id(id)?;
    let request = decode(payload)?;
    Ok(Json(state.coordinator.update_task(id, request).await?))
}

/// Deletes a task.
pub async fn delete_task<S: ScheduleStore>(
    State(state): State<Arc<AppState<S>>>,
    id: Result<Path<i64>, PathRejection>,
) -> ServerResult<StatusCode> {
    state.coordinator.delete_task(parse_id(id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
