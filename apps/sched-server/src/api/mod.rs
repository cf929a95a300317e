//! API endpoints.

pub mod events;
pub mod routines;
pub mod tasks;
pub mod users;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path,
        rejection::{JsonRejection, PathRejection},
    },
    routing::get,
};
use schedule_store::ScheduleStore;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router<S: ScheduleStore + 'static>() -> Router<Arc<AppState<S>>> {
    Router::new()
        // User endpoints
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{username}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        // Event endpoints
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        // Task endpoints
        .route("/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/tasks/{id}",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        // Routine endpoints
        .route(
            "/routines",
            get(routines::list_routines).post(routines::create_routine),
        )
        .route(
            "/routines/{id}",
            get(routines::get_routine)
                .put(routines::update_routine)
                .delete(routines::delete_routine),
        )
        // Health check
        .route("/health", get(health_check))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

/// Unwraps a JSON body, reporting decode failures as malformed payloads.
pub(crate) fn decode<T>(payload: Result<Json<T>, JsonRejection>) -> ServerResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ServerError::MalformedPayload(rejection.body_text()))
}

/// Unwraps a numeric path id.
pub(crate) fn parse_id(id: Result<Path<i64>, PathRejection>) -> ServerResult<i64> {
    id.map(|Path(id)| id)
        .map_err(|rejection| ServerError::MalformedPayload(rejection.body_text()))
}
