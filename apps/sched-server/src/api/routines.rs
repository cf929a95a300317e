//! Routine API endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use entities::{NewRoutine, Routine, RoutinePatch};
use schedule_store::ScheduleStore;

use super::{decode, parse_id};
use crate::error::ServerResult;
use crate::state::AppState;

/// Creates a routine.
pub async fn create_routine<S: ScheduleStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<NewRoutine>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<Routine>)> {
    let routine = state.coordinator.create_routine(decode(payload)?).await?;
    Ok((StatusCode::CREATED, Json(routine)))
}

/// Lists routines.
pub async fn list_routines<S: ScheduleStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<Vec<Routine>>> {
    Ok(Json(state.coordinator.list_routines().await?))
}

/// Gets a routine.
pub async fn get_routine<S: ScheduleStore>(
    State(state): State<Arc<AppState<S>>>,
    id: Result<Path<i64>, PathRejection>,
) -> ServerResult<Json<Routine>> {
    let id = parse_id(id)?;
    Ok(Json(state.coordinator.get_routine(id).await?))
}

/// Updates a routine.
pub async fn update_routine<S: ScheduleStore>(
    State(state): State<Arc<AppState<S>>>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<RoutinePatch>, JsonRejection>,
) -> ServerResult<Json<Routine>> {
    let id = parse_id(id)?;
    let patch = decode(payload)?;
    Ok(Json(state.coordinator.update_routine(id, patch).await?))
}

/// Deletes a routine.
pub async fn delete_routine<S: ScheduleStore>(
    State(state): State<Arc<AppState<S>>>,
    id: Result<Path<i64>, PathRejection>,
) -> ServerResult<StatusCode> {
    state.coordinator.delete_routine(parse_id(id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
