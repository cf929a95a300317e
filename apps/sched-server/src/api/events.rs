//! Event API endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use entities::{Event, EventPatch, NewEvent};
use schedule_store::ScheduleStore;

use super::{decode, parse_id};
use crate::error::ServerResult;
use crate::state::AppState;

/// Creates an event.
pub async fn create_event<S: ScheduleStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<NewEvent>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<Event>)> {
    let event = state.coordinator.create_event(decode(payload)?).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Lists events.
pub async fn list_events<S: ScheduleStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<Vec<Event>>> {
    Ok(Json(state.coordinator.list_events().await?))
}

/// Gets an event by ID.
pub async fn get_event<S: ScheduleStore>(
    State(state): State<Arc<AppState<S>>>,
    id: Result<Path<i64>, PathRejection>,
) -> ServerResult<Json<Event>> {
    let id = parse_id(id)?;
    Ok(Json(state.coordinator.get_event(id).await?))
}

/// Updates an event.
pub async fn update_event<S: ScheduleStore>(
    State(state): State<Arc<AppState<S>>>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<EventPatch>, JsonRejection>,
) -> ServerResult<Json<Event>> {
    let id = parse_id(id)?;
    let patch = decode(payload)?;
    Ok(Json(state.coordinator.update_event(id, patch).await?))
}

/// Deletes an event.
pub async fn delete_event<S: ScheduleStore>(
    State(state): State<Arc<AppState<S>>>,
    id: Result<Path<i64>, PathRejection>,
) -> ServerResult<StatusCode> {
    state.coordinator.delete_event(parse_id(id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
